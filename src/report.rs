use crate::search::{Counts, FrequencyEntry, Label, SearchResponse};
use crate::ui::widgets::statistics::build_slices;
use crate::ui::widgets::summary::rank;
use std::fmt::Write;

/// Plain-text rendering of one search, for `--print`.
pub fn format_report(query: &str, response: &SearchResponse) -> String {
    let mut out = String::new();
    let counts = Counts::tally(&response.tweets);

    let _ = writeln!(out, "query: {}", query);
    let _ = writeln!(out, "tweets: {}", counts.total());
    out.push('\n');

    for tweet in &response.tweets {
        let _ = writeln!(out, "[{:<8}] {}", tweet.label, tweet.text.replace('\n', " "));
    }
    if !response.tweets.is_empty() {
        out.push('\n');
    }

    let slices = build_slices(&counts);
    for label in Label::ALL {
        let percent = slices
            .iter()
            .find(|slice| slice.label == label)
            .map(|slice| slice.percent.as_str())
            .unwrap_or("-");
        let _ = writeln!(out, "{:<9}{:>5}  {}", label.as_str(), counts.get(label), percent);
    }

    if let Some(freqs) = &response.most_frequent {
        out.push('\n');
        let ranked = rank(freqs.clone());
        let (positive, negative): (Vec<_>, Vec<_>) =
            ranked.iter().partition(|entry| entry.is_positive());
        let _ = writeln!(out, "positive terms: {}", join_terms(&positive));
        let _ = writeln!(out, "negative terms: {}", join_terms(&negative));
    }

    out
}

fn join_terms(entries: &[&FrequencyEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.term, e.score))
        .collect::<Vec<_>>()
        .join(", ")
}
