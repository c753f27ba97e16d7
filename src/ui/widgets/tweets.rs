use crate::search::{Counts, Label, Tweet};
use crate::ui::widgets::{label_color, ResultPanel};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TweetList {
    tweets: Vec<Tweet>,
    list_state: ListState,
}

impl Default for TweetList {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetList {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            tweets: Vec::new(),
            list_state,
        }
    }

    /// Replace the shown batch and return its per-label counts.
    pub fn render_tweets(&mut self, tweets: Vec<Tweet>) -> Counts {
        self.tweets.clear();
        let mut counts = Counts::default();
        for tweet in tweets {
            counts.increment(tweet.label);
            self.tweets.push(tweet);
        }
        self.list_state
            .select(if self.tweets.is_empty() { None } else { Some(0) });
        counts
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn scroll_up(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected > 0 {
                self.list_state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected < self.tweets.len().saturating_sub(1) {
                self.list_state.select(Some(selected + 1));
            }
        }
    }

    fn tweet_item(tweet: &Tweet, width: usize) -> ListItem<'static> {
        let color = label_color(tweet.label);
        let marker = match tweet.label {
            Label::Positive => "+",
            Label::Negative => "-",
            Label::Neutral => "~",
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("{} {}", marker, tweet.label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        for wrapped in textwrap::wrap(&tweet.text, width.max(10)) {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(color)),
                Span::styled(wrapped.into_owned(), Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::from(""));
        ListItem::new(lines)
    }
}

impl ResultPanel for TweetList {
    fn title(&self) -> String {
        format!("Tweets ({})", self.tweets.len())
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);

        if self.tweets.is_empty() {
            let empty = Paragraph::new("No tweets matched this query")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // Two columns for borders and two for the "│ " gutter.
        let text_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .tweets
            .iter()
            .map(|tweet| Self::tweet_item(tweet, text_width))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(0x2c, 0x3e, 0x50)));

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(text: &str, label: Label) -> Tweet {
        Tweet {
            text: text.to_string(),
            label,
        }
    }

    #[test]
    fn test_render_tweets_counts_every_tweet() {
        let mut list = TweetList::new();
        let counts = list.render_tweets(vec![
            tweet("a", Label::Positive),
            tweet("b", Label::Negative),
            tweet("c", Label::Positive),
            tweet("d", Label::Neutral),
        ]);
        assert_eq!(
            counts,
            Counts {
                positive: 2,
                negative: 1,
                neutral: 1
            }
        );
        assert_eq!(counts.total(), list.tweets().len());
    }

    #[test]
    fn test_render_tweets_replaces_previous_batch_in_order() {
        let mut list = TweetList::new();
        list.render_tweets(vec![tweet("old", Label::Neutral)]);
        list.render_tweets(vec![
            tweet("same", Label::Positive),
            tweet("same", Label::Positive),
            tweet("last", Label::Negative),
        ]);
        let texts: Vec<&str> = list.tweets().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["same", "same", "last"]);
    }

    #[test]
    fn test_empty_batch_clears_selection() {
        let mut list = TweetList::new();
        let counts = list.render_tweets(Vec::new());
        assert_eq!(counts.total(), 0);
        assert_eq!(list.selected(), None);
        list.scroll_down();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut list = TweetList::new();
        list.render_tweets(vec![tweet("a", Label::Positive), tweet("b", Label::Neutral)]);
        list.scroll_up();
        assert_eq!(list.selected(), Some(0));
        list.scroll_down();
        list.scroll_down();
        assert_eq!(list.selected(), Some(1));
    }
}
