use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

impl AlertKind {
    fn color(self) -> Color {
        match self {
            AlertKind::Info => Color::Rgb(0x34, 0x98, 0xdb),
            AlertKind::Error => Color::Rgb(0xe7, 0x4c, 0x3c),
        }
    }

    fn heading(self) -> &'static str {
        match self {
            AlertKind::Info => "Info",
            AlertKind::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Banner {
    message: String,
    visible: bool,
    generation: u64,
}

/// The info and error banners. Each kind has its own slot, so an error can
/// show while the info banner is still up.
#[derive(Debug, Clone, Default)]
pub struct Alerts {
    info: Banner,
    error: Banner,
}

/// Returned by [`Alerts::show`]; hides exactly the message it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the banner visible with no way to dismiss it"]
pub struct AlertHandle {
    kind: AlertKind,
    generation: u64,
}

impl AlertHandle {
    /// Hide the banner. Safe to call any number of times, and a no-op once
    /// a newer message has replaced this one.
    pub fn dismiss(&self, alerts: &mut Alerts) {
        let banner = alerts.slot_mut(self.kind);
        if banner.generation == self.generation {
            banner.visible = false;
        }
    }
}

impl Alerts {
    pub fn show(&mut self, kind: AlertKind, message: impl Into<String>) -> AlertHandle {
        let banner = self.slot_mut(kind);
        banner.generation += 1;
        banner.message = message.into();
        banner.visible = true;
        AlertHandle {
            kind,
            generation: banner.generation,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) -> AlertHandle {
        self.show(AlertKind::Info, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> AlertHandle {
        self.show(AlertKind::Error, message)
    }

    pub fn is_visible(&self, kind: AlertKind) -> bool {
        self.slot(kind).visible
    }

    pub fn message(&self, kind: AlertKind) -> Option<&str> {
        let banner = self.slot(kind);
        banner.visible.then_some(banner.message.as_str())
    }

    /// Rows needed to draw every visible banner.
    pub fn height(&self) -> u16 {
        [AlertKind::Error, AlertKind::Info]
            .iter()
            .filter(|kind| self.is_visible(**kind))
            .count() as u16
            * 3
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for kind in [AlertKind::Error, AlertKind::Info] {
            let Some(message) = self.message(kind) else {
                continue;
            };
            if y + 3 > area.y + area.height {
                break;
            }

            let banner_area = Rect::new(area.x, y, area.width, 3);
            let color = kind.color();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            let line = Line::from(vec![
                Span::styled(
                    format!("{}: ", kind.heading()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message),
            ]);

            frame.render_widget(Clear, banner_area);
            frame.render_widget(
                Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
                banner_area,
            );
            y += 3;
        }
    }

    fn slot(&self, kind: AlertKind) -> &Banner {
        match kind {
            AlertKind::Info => &self.info,
            AlertKind::Error => &self.error,
        }
    }

    fn slot_mut(&mut self, kind: AlertKind) -> &mut Banner {
        match kind {
            AlertKind::Info => &mut self.info,
            AlertKind::Error => &mut self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_sets_message_and_visibility() {
        let mut alerts = Alerts::default();
        let _handle = alerts.info("loading");
        assert!(alerts.is_visible(AlertKind::Info));
        assert_eq!(alerts.message(AlertKind::Info), Some("loading"));
        assert!(!alerts.is_visible(AlertKind::Error));
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut alerts = Alerts::default();
        let handle = alerts.error("boom");
        handle.dismiss(&mut alerts);
        handle.dismiss(&mut alerts);
        assert!(!alerts.is_visible(AlertKind::Error));
        assert_eq!(alerts.message(AlertKind::Error), None);
    }

    #[test]
    fn test_stale_handle_leaves_newer_message() {
        let mut alerts = Alerts::default();
        let first = alerts.info("first");
        let _second = alerts.info("second");
        first.dismiss(&mut alerts);
        assert_eq!(alerts.message(AlertKind::Info), Some("second"));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut alerts = Alerts::default();
        let info = alerts.info("wait");
        let _error = alerts.error("failed");
        info.dismiss(&mut alerts);
        assert!(!alerts.is_visible(AlertKind::Info));
        assert!(alerts.is_visible(AlertKind::Error));
        assert_eq!(alerts.height(), 3);
    }
}
