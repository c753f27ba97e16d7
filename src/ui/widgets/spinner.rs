use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Line as CanvasLine},
    widgets::Clear,
};
use std::f64::consts::TAU;

const LINES: usize = 13;
const LENGTH: f64 = 7.0;
const RADIUS: f64 = 8.0;
/// Fraction of the ring that trails the lead stroke.
const TRAIL: f64 = 0.6;
/// Strokes advanced per tick.
const SPEED: usize = 1;
const COLOR: (u8, u8, u8) = (0xbd, 0xc3, 0xc7);

/// Footprint in terminal cells. Braille gives 2x4 dots per cell, so this
/// fits the ring with a one-cell margin.
const WIDTH: u16 = 20;
const HEIGHT: u16 = 10;

/// Loading indicator: a ring of radial strokes with a fading trail, drawn
/// on a braille canvas centred in the area it is anchored to. Only the
/// visibility and the frame counter change at runtime.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    visible: bool,
    frame: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn tick(&mut self) {
        if self.visible {
            self.frame = (self.frame + SPEED) % LINES;
        }
    }

    /// Colour of stroke `index` for the current frame; the lead stroke is
    /// full brightness and the trail fades towards black.
    fn stroke_color(&self, index: usize) -> Option<Color> {
        let behind = (self.frame + LINES - index) % LINES;
        let trail_len = (LINES as f64 * TRAIL).round() as usize;
        if behind > trail_len {
            return None;
        }
        let fade = 1.0 - behind as f64 / (trail_len as f64 + 1.0);
        let (r, g, b) = COLOR;
        Some(Color::Rgb(
            (r as f64 * fade) as u8,
            (g as f64 * fade) as u8,
            (b as f64 * fade) as u8,
        ))
    }

    /// Draw centred in `anchor`. Does nothing while hidden.
    pub fn render(&self, frame: &mut Frame, anchor: Rect) {
        if !self.visible {
            return;
        }

        let width = WIDTH.min(anchor.width);
        let height = HEIGHT.min(anchor.height);
        let area = Rect::new(
            anchor.x + (anchor.width - width) / 2,
            anchor.y + (anchor.height - height) / 2,
            width,
            height,
        );

        let half_w = f64::from(width);
        let half_h = f64::from(height) * 2.0;
        let strokes: Vec<CanvasLine> = (0..LINES)
            .filter_map(|i| {
                let color = self.stroke_color(i)?;
                let angle = TAU * i as f64 / LINES as f64;
                let (sin, cos) = angle.sin_cos();
                Some(CanvasLine {
                    x1: sin * RADIUS,
                    y1: cos * RADIUS,
                    x2: sin * (RADIUS + LENGTH),
                    y2: cos * (RADIUS + LENGTH),
                    color,
                })
            })
            .collect();

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half_w, half_w])
            .y_bounds([-half_h, half_h])
            .paint(|ctx| {
                for stroke in &strokes {
                    ctx.draw(stroke);
                }
            });

        frame.render_widget(Clear, area);
        frame.render_widget(canvas, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_does_not_advance() {
        let mut spinner = Spinner::new();
        spinner.tick();
        assert_eq!(spinner.frame, 0);
        spinner.show();
        spinner.tick();
        assert_eq!(spinner.frame, 1);
    }

    #[test]
    fn test_frame_wraps_around_ring() {
        let mut spinner = Spinner::new();
        spinner.show();
        for _ in 0..LINES {
            spinner.tick();
        }
        assert_eq!(spinner.frame, 0);
    }

    #[test]
    fn test_lead_stroke_is_brightest() {
        let mut spinner = Spinner::new();
        spinner.show();
        spinner.tick();
        let (r, g, b) = COLOR;
        assert_eq!(spinner.stroke_color(1), Some(Color::Rgb(r, g, b)));
        // The stroke just ahead of the lead is the far end of the trail.
        assert_eq!(spinner.stroke_color(2), None);
    }
}
