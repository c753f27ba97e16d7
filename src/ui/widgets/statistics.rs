use crate::search::{Counts, Label};
use crate::ui::widgets::{label_color, ResultPanel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Points},
    widgets::{Block, Borders, Paragraph},
};
use std::f64::consts::TAU;

/// One pie wedge. Angles are in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: Label,
    pub color: Color,
    pub value: usize,
    /// Share of the total, e.g. `"75.00%"`.
    pub percent: String,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Slice {
    fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }

    fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Build the wedges for `counts`.
///
/// Labels with a zero count get no wedge, and an all-zero tally yields no
/// wedges at all. Wedges come back in label order (positive, negative,
/// neutral) but their angles are laid out largest first.
pub fn build_slices(counts: &Counts) -> Vec<Slice> {
    let sum = counts.total();
    if sum == 0 {
        return Vec::new();
    }

    let mut slices: Vec<Slice> = Label::ALL
        .iter()
        .filter(|label| counts.get(**label) > 0)
        .map(|&label| {
            let value = counts.get(label);
            Slice {
                label,
                color: label_color(label),
                value,
                percent: format!("{:.2}%", 100.0 * value as f64 / sum as f64),
                start_angle: 0.0,
                end_angle: 0.0,
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..slices.len()).collect();
    order.sort_by(|a, b| slices[*b].value.cmp(&slices[*a].value));

    let mut angle = 0.0;
    for idx in order {
        let slice = &mut slices[idx];
        slice.start_angle = angle;
        angle += TAU * slice.value as f64 / sum as f64;
        slice.end_angle = angle;
    }
    // Close the circle exactly so float drift leaves no uncoloured gap.
    if let Some(last) = slices
        .iter_mut()
        .max_by(|a, b| a.end_angle.total_cmp(&b.end_angle))
    {
        last.end_angle = TAU;
    }

    slices
}

#[derive(Debug, Clone, Default)]
pub struct Statistics {
    counts: Counts,
    slices: Vec<Slice>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the counts and rebuild every wedge from scratch.
    pub fn render_statistics(&mut self, counts: Counts) {
        self.counts = counts;
        self.slices = build_slices(&counts);
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    fn render_counts(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from("")];
        for label in Label::ALL {
            let percent = self
                .slices
                .iter()
                .find(|slice| slice.label == label)
                .map(|slice| format!(" ({})", slice.percent))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("■ ", Style::default().fg(label_color(label))),
                Span::styled(
                    format!("{:<9}", label.as_str()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>5}", self.counts.get(label)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(percent, Style::default().fg(Color::DarkGray)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("total {}", self.counts.total()),
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_pie(&self, frame: &mut Frame, area: Rect) {
        if self.slices.is_empty() {
            let empty = Paragraph::new("Nothing to chart").alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        // Braille packs 2x4 dots per cell, which makes dots roughly square.
        let dots_w = f64::from(area.width) * 2.0;
        let dots_h = f64::from(area.height) * 4.0;
        let radius = (dots_w.min(dots_h) / 2.0 - 1.0).max(1.0);

        let mut wedges: Vec<Vec<(f64, f64)>> = vec![Vec::new(); self.slices.len()];
        for i in 0..dots_w as usize {
            let x = -dots_w / 2.0 + i as f64 + 0.5;
            for j in 0..dots_h as usize {
                let y = -dots_h / 2.0 + j as f64 + 0.5;
                if x * x + y * y > radius * radius {
                    continue;
                }
                let angle = x.atan2(y).rem_euclid(TAU);
                if let Some(idx) = self.slices.iter().position(|s| s.contains(angle)) {
                    wedges[idx].push((x, y));
                }
            }
        }

        let labels: Vec<(f64, f64, String)> = self
            .slices
            .iter()
            .map(|slice| {
                let (sin, cos) = slice.mid_angle().sin_cos();
                // Each printed char covers two dots horizontally.
                let x = sin * radius / 2.0 - slice.percent.len() as f64;
                (x, cos * radius / 2.0, slice.percent.clone())
            })
            .collect();

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-dots_w / 2.0, dots_w / 2.0])
            .y_bounds([-dots_h / 2.0, dots_h / 2.0])
            .paint(|ctx| {
                for (slice, coords) in self.slices.iter().zip(&wedges) {
                    ctx.draw(&Points {
                        coords,
                        color: slice.color,
                    });
                }
                ctx.layer();
                for (x, y, text) in &labels {
                    ctx.print(
                        *x,
                        *y,
                        Span::styled(
                            text.clone(),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }
}

impl ResultPanel for Statistics {
    fn title(&self) -> String {
        "Statistics".to_string()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(10)])
            .split(inner);

        self.render_counts(frame, chunks[0]);
        self.render_pie(frame, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_zero_counts_build_no_slices() {
        assert!(build_slices(&Counts::default()).is_empty());
    }

    #[test]
    fn test_zero_label_is_omitted() {
        let slices = build_slices(&Counts {
            positive: 3,
            negative: 1,
            neutral: 0,
        });
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, Label::Positive);
        assert_eq!(slices[0].percent, "75.00%");
        assert_eq!(slices[1].label, Label::Negative);
        assert_eq!(slices[1].percent, "25.00%");
    }

    #[test]
    fn test_slice_colors_are_fixed() {
        let slices = build_slices(&Counts {
            positive: 1,
            negative: 1,
            neutral: 1,
        });
        let colors: Vec<Color> = slices.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![
                Color::Rgb(0x2e, 0xcc, 0x71),
                Color::Rgb(0xe7, 0x4c, 0x3c),
                Color::Rgb(0x34, 0x49, 0x5e)
            ]
        );
        assert_eq!(slices[0].percent, "33.33%");
    }

    #[test]
    fn test_largest_slice_starts_at_top() {
        let slices = build_slices(&Counts {
            positive: 1,
            negative: 2,
            neutral: 1,
        });
        let negative = slices.iter().find(|s| s.label == Label::Negative).unwrap();
        assert_eq!(negative.start_angle, 0.0);
        assert!((negative.end_angle - TAU / 2.0).abs() < 1e-9);
        let end = slices.iter().map(|s| s.end_angle).fold(0.0, f64::max);
        assert_eq!(end, TAU);
    }

    #[test]
    fn test_every_call_rebuilds() {
        let mut stats = Statistics::new();
        stats.render_statistics(Counts {
            positive: 2,
            negative: 2,
            neutral: 2,
        });
        assert_eq!(stats.slices().len(), 3);
        stats.render_statistics(Counts {
            positive: 0,
            negative: 0,
            neutral: 4,
        });
        assert_eq!(stats.slices().len(), 1);
        assert_eq!(stats.slices()[0].percent, "100.00%");
        stats.render_statistics(Counts::default());
        assert!(stats.slices().is_empty());
    }

    #[test]
    fn test_renders_counts_and_percentages() {
        let mut stats = Statistics::new();
        stats.render_statistics(Counts {
            positive: 3,
            negative: 1,
            neutral: 0,
        });

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                stats.render(frame, area);
            })
            .unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("positive"));
        assert!(content.contains("(75.00%)"));
        assert!(content.contains("total 4"));
    }
}
