pub mod client;

use crate::error::SearchResult;
use async_trait::async_trait;
use serde::Deserialize;

/// Sentiment class assigned to a tweet by the backend.
///
/// The set is closed: any other string in a response is a decode error,
/// so counts can never silently drift from the number of tweets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Positive, Label::Negative, Label::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tweet {
    pub text: String,
    pub label: Label,
}

/// A term and its signed weight. The sign is the polarity, the magnitude
/// the strength. On the wire this is a `[term, score]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, f64)")]
pub struct FrequencyEntry {
    pub term: String,
    pub score: f64,
}

impl From<(String, f64)> for FrequencyEntry {
    fn from((term, score): (String, f64)) -> Self {
        Self { term, score }
    }
}

impl FrequencyEntry {
    pub fn new(term: impl Into<String>, score: f64) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }

    /// Zero counts as not positive.
    pub fn is_positive(&self) -> bool {
        self.score > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub tweets: Vec<Tweet>,
    #[serde(default)]
    pub most_frequent: Option<Vec<FrequencyEntry>>,
}

impl SearchResponse {
    pub fn from_json(body: &str) -> SearchResult<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Per-label tallies of one rendered batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl Counts {
    pub fn tally<'a>(tweets: impl IntoIterator<Item = &'a Tweet>) -> Self {
        let mut counts = Counts::default();
        for tweet in tweets {
            counts.increment(tweet.label);
        }
        counts
    }

    pub fn increment(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
            Label::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
            Label::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Anything that can answer a query with a batch of labelled tweets.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> SearchResult<SearchResponse>;
}
