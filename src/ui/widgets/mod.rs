pub mod alert;
pub mod cloud;
pub mod spinner;
pub mod statistics;
pub mod summary;
pub mod tweets;

use crate::search::Label;
use ratatui::{layout::Rect, style::Color, Frame};

/// A tab in the results area.
pub trait ResultPanel {
    fn title(&self) -> String;
    fn render(&self, frame: &mut Frame, area: Rect);
}

pub fn positive_color() -> Color {
    Color::Rgb(0x2e, 0xcc, 0x71)
}

pub fn negative_color() -> Color {
    Color::Rgb(0xe7, 0x4c, 0x3c)
}

pub fn neutral_color() -> Color {
    Color::Rgb(0x34, 0x49, 0x5e)
}

pub fn label_color(label: Label) -> Color {
    match label {
        Label::Positive => positive_color(),
        Label::Negative => negative_color(),
        Label::Neutral => neutral_color(),
    }
}
