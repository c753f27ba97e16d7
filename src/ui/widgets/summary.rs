use crate::config::SummaryStyle;
use crate::search::FrequencyEntry;
use crate::ui::widgets::cloud::{self, CloudWord, PlacedWord};
use crate::ui::widgets::{negative_color, positive_color, ResultPanel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::cmp::Ordering;

/// Font size range the summary scale maps onto.
pub const MIN_FONT_SIZE: f64 = 10.0;
pub const MAX_FONT_SIZE: f64 = 40.0;

/// Logarithmic mapping from `|score|` onto `[MIN_FONT_SIZE, MAX_FONT_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    /// Fit the domain to the smallest and largest non-zero magnitude in
    /// `entries`.
    pub fn fit(entries: &[FrequencyEntry]) -> Self {
        let magnitudes = entries
            .iter()
            .map(|e| e.score.abs())
            .filter(|m| m.is_finite() && *m > 0.0);
        let (lo, hi) = magnitudes.fold((f64::INFINITY, 0.0f64), |(lo, hi), m| {
            (lo.min(m), hi.max(m))
        });
        let domain = if lo.is_finite() { (lo, hi) } else { (1.0, 1.0) };

        Self {
            domain,
            range: (MIN_FONT_SIZE, MAX_FONT_SIZE),
        }
    }

    pub fn size(&self, score: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let magnitude = score.abs();
        if magnitude.is_nan() || magnitude <= 0.0 {
            return r0;
        }
        // A single distinct magnitude gets the largest size.
        if d1 <= d0 {
            return r1;
        }
        let t = (magnitude.ln() - d0.ln()) / (d1.ln() - d0.ln());
        r0 + t.clamp(0.0, 1.0) * (r1 - r0)
    }
}

/// Emphasis tier 0..=3 for a font size; terminals can't scale glyphs.
pub fn emphasis_tier(size: f64) -> u8 {
    let t = ((size - MIN_FONT_SIZE) / (MAX_FONT_SIZE - MIN_FONT_SIZE)).clamp(0.0, 1.0);
    (t * 3.0).round() as u8
}

fn emphasis_style(size: f64) -> Style {
    match emphasis_tier(size) {
        0 => Style::default().add_modifier(Modifier::DIM),
        1 => Style::default(),
        2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    }
}

fn word_style(score: f64, size: f64) -> Style {
    let color = if score > 0.0 {
        positive_color()
    } else {
        negative_color()
    };
    emphasis_style(size).fg(color)
}

fn sign(score: f64) -> i8 {
    if score > 0.0 {
        1
    } else if score < 0.0 {
        -1
    } else {
        0
    }
}

/// Order by sign (positive first), then by magnitude, largest first.
pub fn compare_entries(a: &FrequencyEntry, b: &FrequencyEntry) -> Ordering {
    sign(b.score)
        .cmp(&sign(a.score))
        .then_with(|| b.score.abs().total_cmp(&a.score.abs()))
}

pub fn rank(mut entries: Vec<FrequencyEntry>) -> Vec<FrequencyEntry> {
    entries.sort_by(compare_entries);
    entries
}

/// Work order for the off-thread cloud layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutJob {
    pub generation: u64,
    pub words: Vec<CloudWord>,
}

impl LayoutJob {
    pub fn run(self) -> Vec<PlacedWord> {
        cloud::layout(self.words)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CloudState {
    Idle,
    Pending,
    Ready(Vec<PlacedWord>),
}

#[derive(Debug, Clone)]
pub struct Summary {
    style: SummaryStyle,
    entries: Vec<FrequencyEntry>,
    scale: LogScale,
    has_data: bool,
    generation: u64,
    cloud: CloudState,
}

impl Summary {
    pub fn new(style: SummaryStyle) -> Self {
        Self {
            style,
            entries: Vec::new(),
            scale: LogScale::fit(&[]),
            has_data: false,
            generation: 0,
            cloud: CloudState::Idle,
        }
    }

    pub fn style(&self) -> SummaryStyle {
        self.style
    }

    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Ranked entries of the current batch.
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn is_layout_pending(&self) -> bool {
        self.cloud == CloudState::Pending
    }

    pub fn placed_words(&self) -> Option<&[PlacedWord]> {
        match &self.cloud {
            CloudState::Ready(words) => Some(words),
            _ => None,
        }
    }

    /// Replace the summary with a new batch. In cloud style the caller gets
    /// a layout job to run; its result comes back through
    /// [`Summary::finish_layout`].
    pub fn render_summary(&mut self, freqs: Vec<FrequencyEntry>) -> Option<LayoutJob> {
        self.scale = LogScale::fit(&freqs);
        self.entries = rank(freqs);
        self.has_data = true;
        self.generation += 1;
        self.cloud = CloudState::Idle;
        self.request_layout()
    }

    /// Switch between ranked and cloud; may need a fresh layout.
    pub fn set_style(&mut self, style: SummaryStyle) -> Option<LayoutJob> {
        self.style = style;
        if self.cloud == CloudState::Idle {
            self.request_layout()
        } else {
            None
        }
    }

    /// Apply a finished layout. Returns `false` when a newer batch has
    /// superseded the job and the words were dropped.
    pub fn finish_layout(&mut self, generation: u64, words: Vec<PlacedWord>) -> bool {
        if generation != self.generation || self.cloud != CloudState::Pending {
            return false;
        }
        self.cloud = CloudState::Ready(words);
        true
    }

    fn request_layout(&mut self) -> Option<LayoutJob> {
        if self.style != SummaryStyle::Cloud || !self.has_data {
            return None;
        }
        self.cloud = CloudState::Pending;
        let words = self
            .entries
            .iter()
            .map(|entry| CloudWord {
                text: entry.term.clone(),
                size: self.scale.size(entry.score),
                score: entry.score,
            })
            .collect();
        Some(LayoutJob {
            generation: self.generation,
            words,
        })
    }

    fn column<'a>(&self, entries: impl Iterator<Item = &'a FrequencyEntry>) -> Vec<Line<'a>> {
        let mut spans = Vec::new();
        for entry in entries {
            let size = self.scale.size(entry.score);
            spans.push(Span::styled(entry.term.as_str(), word_style(entry.score, size)));
            spans.push(Span::raw("  "));
        }
        vec![Line::from(spans)]
    }

    fn render_ranked(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let positive = self.column(self.entries.iter().filter(|e| e.is_positive()));
        let negative = self.column(self.entries.iter().filter(|e| !e.is_positive()));

        let left = Paragraph::new(positive)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                " Positive ",
                Style::default().fg(positive_color()),
            )));
        let right = Paragraph::new(negative)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                " Negative ",
                Style::default().fg(negative_color()),
            )));

        frame.render_widget(left, chunks[0]);
        frame.render_widget(right, chunks[1]);
    }

    fn render_cloud(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(words) = self.placed_words() else {
            let waiting = Paragraph::new("Laying out word cloud...").alignment(Alignment::Center);
            frame.render_widget(waiting, inner);
            return;
        };

        let lines = cloud_lines(words);
        let width = (cloud::CANVAS_WIDTH as u16).min(inner.width);
        let height = (cloud::CANVAS_HEIGHT as u16).min(inner.height);
        let target = Rect::new(
            inner.x + (inner.width - width) / 2,
            inner.y + (inner.height - height) / 2,
            width,
            height,
        );
        // Clip the canvas symmetrically when the panel is smaller.
        let scroll_x = (cloud::CANVAS_WIDTH as u16 - width) / 2;
        let scroll_y = (cloud::CANVAS_HEIGHT as u16 - height) / 2;

        let paragraph = Paragraph::new(lines).scroll((scroll_y, scroll_x));
        frame.render_widget(paragraph, target);
    }
}

#[derive(Debug, Clone, Copy)]
enum Cell {
    Blank,
    Glyph(char, Style),
    /// Right half of a wide glyph.
    Covered,
}

/// Rasterize placed words into styled lines exactly `CANVAS_WIDTH` columns
/// wide.
fn cloud_lines(words: &[PlacedWord]) -> Vec<Line<'static>> {
    let mut grid = vec![vec![Cell::Blank; cloud::CANVAS_WIDTH]; cloud::CANVAS_HEIGHT];

    for word in words {
        let style = word_style(word.score, word.size);
        for glyph in word.glyphs() {
            if glyph.x + glyph.width > cloud::CANVAS_WIDTH || glyph.y >= cloud::CANVAS_HEIGHT {
                continue;
            }
            let row = &mut grid[glyph.y];
            row[glyph.x] = Cell::Glyph(glyph.ch, style);
            for cell in &mut row[glyph.x + 1..glyph.x + glyph.width] {
                *cell = Cell::Covered;
            }
        }
    }

    grid.into_iter()
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            for cell in row {
                let (ch, style) = match cell {
                    Cell::Blank => (' ', Style::default()),
                    Cell::Glyph(ch, style) => (ch, style),
                    Cell::Covered => continue,
                };
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            Line::from(spans)
        })
        .collect()
}

impl ResultPanel for Summary {
    fn title(&self) -> String {
        match self.style {
            SummaryStyle::Ranked => "Summary".to_string(),
            SummaryStyle::Cloud => "Word cloud".to_string(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.has_data {
            let empty = Paragraph::new("No frequency data in this response")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        match self.style {
            SummaryStyle::Ranked => self.render_ranked(frame, area),
            SummaryStyle::Cloud => self.render_cloud(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::cloud::Rotation;

    fn entries(pairs: &[(&str, f64)]) -> Vec<FrequencyEntry> {
        pairs
            .iter()
            .map(|(term, score)| FrequencyEntry::new(*term, *score))
            .collect()
    }

    fn terms(entries: &[FrequencyEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.term.as_str()).collect()
    }

    #[test]
    fn test_rank_positive_first_then_magnitude() {
        let ranked = rank(entries(&[("good", 5.0), ("bad", -3.0), ("ok", 2.0)]));
        assert_eq!(terms(&ranked), vec!["good", "ok", "bad"]);
    }

    #[test]
    fn test_rank_negative_by_magnitude_and_zero_in_between() {
        let ranked = rank(entries(&[
            ("meh", -1.0),
            ("awful", -9.0),
            ("flat", 0.0),
            ("fine", 1.0),
        ]));
        assert_eq!(terms(&ranked), vec!["fine", "flat", "awful", "meh"]);
    }

    #[test]
    fn test_log_scale_maps_domain_onto_range() {
        let scale = LogScale::fit(&entries(&[("a", 1.0), ("b", -100.0), ("c", 10.0)]));
        assert_eq!(scale.size(1.0), MIN_FONT_SIZE);
        assert_eq!(scale.size(-100.0), MAX_FONT_SIZE);
        assert!((scale.size(10.0) - 25.0).abs() < 1e-9);
        assert_eq!(scale.size(0.0), MIN_FONT_SIZE);
    }

    #[test]
    fn test_log_scale_single_magnitude() {
        let scale = LogScale::fit(&entries(&[("a", 4.0), ("b", -4.0)]));
        assert_eq!(scale.size(4.0), MAX_FONT_SIZE);
        assert_eq!(LogScale::fit(&[]).size(3.0), MAX_FONT_SIZE);
    }

    #[test]
    fn test_emphasis_tiers() {
        assert_eq!(emphasis_tier(MIN_FONT_SIZE), 0);
        assert_eq!(emphasis_tier(20.0), 1);
        assert_eq!(emphasis_tier(30.0), 2);
        assert_eq!(emphasis_tier(MAX_FONT_SIZE), 3);
    }

    #[test]
    fn test_ranked_style_needs_no_layout() {
        let mut summary = Summary::new(SummaryStyle::Ranked);
        assert!(summary
            .render_summary(entries(&[("good", 5.0)]))
            .is_none());
        assert!(summary.has_data());
        assert!(!summary.is_layout_pending());
    }

    #[test]
    fn test_cloud_layout_round_trip() {
        let mut summary = Summary::new(SummaryStyle::Cloud);
        let job = summary
            .render_summary(entries(&[("good", 5.0), ("bad", -3.0)]))
            .unwrap();
        assert!(summary.is_layout_pending());
        assert_eq!(job.words.len(), 2);

        let generation = job.generation;
        let placed = job.run();
        assert!(summary.finish_layout(generation, placed));
        assert_eq!(summary.placed_words().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_stale_layout_is_dropped() {
        let mut summary = Summary::new(SummaryStyle::Cloud);
        let old = summary.render_summary(entries(&[("old", 1.0)])).unwrap();
        let new = summary.render_summary(entries(&[("new", 1.0)])).unwrap();

        let old_generation = old.generation;
        assert!(!summary.finish_layout(old_generation, old.run()));
        assert!(summary.is_layout_pending());

        let new_generation = new.generation;
        assert!(summary.finish_layout(new_generation, new.run()));
        assert_eq!(summary.placed_words().unwrap()[0].text, "new");
    }

    #[test]
    fn test_toggle_to_cloud_requests_layout_once() {
        let mut summary = Summary::new(SummaryStyle::Ranked);
        assert!(summary.set_style(SummaryStyle::Cloud).is_none());

        summary.set_style(SummaryStyle::Ranked);
        summary.render_summary(entries(&[("good", 5.0)]));
        let job = summary.set_style(SummaryStyle::Cloud).unwrap();
        assert!(summary.set_style(SummaryStyle::Cloud).is_none());

        let generation = job.generation;
        summary.finish_layout(generation, job.run());
        assert!(summary.set_style(SummaryStyle::Ranked).is_none());
        assert!(summary.set_style(SummaryStyle::Cloud).is_none());
        assert!(summary.placed_words().is_some());
    }

    #[test]
    fn test_cloud_lines_colour_by_sign() {
        let placed = vec![
            PlacedWord {
                text: "up".to_string(),
                size: MAX_FONT_SIZE,
                score: 2.0,
                x: 0,
                y: 0,
                rotation: Rotation::Horizontal,
            },
            PlacedWord {
                text: "zero".to_string(),
                size: MIN_FONT_SIZE,
                score: 0.0,
                x: 5,
                y: 1,
                rotation: Rotation::Vertical,
            },
        ];
        let lines = cloud_lines(&placed);
        assert_eq!(lines.len(), cloud::CANVAS_HEIGHT);
        assert_eq!(lines[0].spans[0].content, "up");
        assert_eq!(lines[0].spans[0].style.fg, Some(positive_color()));

        let zero_cell = lines[1]
            .spans
            .iter()
            .find(|span| span.content == "z")
            .unwrap();
        assert_eq!(zero_cell.style.fg, Some(negative_color()));
    }

    #[test]
    fn test_cloud_lines_keep_canvas_width_with_wide_characters() {
        let words = vec![
            CloudWord {
                text: "日本語テスト".to_string(),
                size: MAX_FONT_SIZE,
                score: 3.0,
            },
            CloudWord {
                text: "🎉🎉".to_string(),
                size: 30.0,
                score: -2.0,
            },
            CloudWord {
                text: "ascii".to_string(),
                size: 20.0,
                score: 1.0,
            },
        ];
        let placed = cloud::layout(words);
        assert_eq!(placed.len(), 3);

        let lines = cloud_lines(&placed);
        assert_eq!(lines.len(), cloud::CANVAS_HEIGHT);
        for line in &lines {
            assert_eq!(line.width(), cloud::CANVAS_WIDTH);
        }
        let text: String = lines
            .iter()
            .flat_map(|line| line.spans.iter().map(|span| span.content.to_string()))
            .collect();
        assert!(text.contains("日本語テスト"));
        assert!(text.contains("🎉🎉"));
    }
}
