pub mod widgets;

use crate::app::{App, Tab, UiMode};
use crate::config::SummaryStyle;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use std::time::Instant;

const TITLE_HEIGHT: u16 = 2;
const SEARCH_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Rows above the title: centred on the landing screen, zero once the
/// slide-up transition is over.
fn top_offset(area: Rect, progress: f64) -> u16 {
    let landing = area
        .height
        .saturating_sub(TITLE_HEIGHT + SEARCH_HEIGHT + FOOTER_HEIGHT)
        / 2;
    (f64::from(landing) * (1.0 - progress)).round() as u16
}

pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let progress = app.controller().transition_progress(now);
    let offset = top_offset(area, progress);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(offset),
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Length(app.alerts.height()),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    render_title(frame, chunks[1]);
    render_search_bar(frame, app, chunks[2]);
    app.alerts.render(frame, chunks[3]);

    // The results region only exists once a search has been issued, and
    // stays empty until the bar has finished moving.
    if app.mode() == UiMode::ResultsShown && progress >= 1.0 {
        render_results(frame, app, chunks[4]);
    }

    render_footer(frame, app, chunks[5]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "tweetsent",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  what is Twitter feeling?",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.min(80);
    let area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let border_style = if app.controller().is_pending() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.query.as_str()),
        Span::styled("█", Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    if !app.tabs_visible() {
        app.spinner.render(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", app.panel(*tab).title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab().index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    app.panel(app.active_tab()).render(frame, chunks[1]);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let style = match app.summary.style() {
        SummaryStyle::Ranked => "ranked",
        SummaryStyle::Cloud => "cloud",
    };
    let mut spans = vec![Span::styled(
        format!(
            "Enter search | Tab switch view | ↑↓ scroll | Ctrl-S summary: {} | Esc dismiss | Ctrl-C quit",
            style
        ),
        Style::default().fg(Color::DarkGray),
    )];
    if let (Some(query), Some(at)) = (app.last_query(), app.last_search()) {
        spans.push(Span::styled(
            format!("  ·  \"{}\" at {}", query, at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::search::{Label, SearchResponse, Tweet};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn screen(app: &App, now: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app, now)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_landing_screen_centres_search_bar() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(top_offset(area, 0.0), 12);
        assert_eq!(top_offset(area, 1.0), 0);
        assert_eq!(top_offset(area, 0.5), 6);
    }

    #[test]
    fn test_results_show_after_transition() {
        let mut app = App::new(&Config::default());
        app.query = "rust".to_string();
        let t0 = Instant::now();
        let request = app.search_at(t0).unwrap();
        app.apply_search_result(
            request.token,
            Ok(SearchResponse {
                tweets: vec![Tweet {
                    text: "borrow checker saves the day".to_string(),
                    label: Label::Positive,
                }],
                most_frequent: None,
            }),
        );

        let during = screen(&app, t0 + Duration::from_millis(100));
        assert!(!during.contains("borrow checker"));

        let after = screen(&app, t0 + Duration::from_secs(1));
        assert!(after.contains("Tweets (1)"));
        assert!(after.contains("borrow checker saves the day"));
    }

    #[test]
    fn test_info_banner_is_drawn() {
        let mut app = App::new(&Config::default());
        app.query = "rust".to_string();
        let t0 = Instant::now();
        app.search_at(t0).unwrap();
        let text = screen(&app, t0 + Duration::from_secs(1));
        assert!(text.contains(crate::app::INFO_MESSAGE));
    }
}
