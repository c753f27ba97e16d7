use unicode_width::UnicodeWidthChar;

pub const CANVAS_WIDTH: usize = 96;
pub const CANVAS_HEIGHT: usize = 24;

/// Spiral step in radians and the number of steps tried per word.
const SPIRAL_STEP: f64 = 0.1;
const SPIRAL_MAX_STEPS: usize = 20_000;
/// Cells are about twice as tall as wide, so the spiral is flattened to
/// stay round on screen.
const CELL_ASPECT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Horizontal,
    Vertical,
}

/// A word to lay out, with its font size from the summary scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudWord {
    pub text: String,
    pub size: f64,
    pub score: f64,
}

/// A word with its final position (top-left cell) on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub size: f64,
    pub score: f64,
    pub x: usize,
    pub y: usize,
    pub rotation: Rotation,
}

/// One drawn character. `x` is its leftmost column; wide characters span
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub x: usize,
    pub y: usize,
    pub width: usize,
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Columns and rows `text` needs in `rotation`. Zero-width characters
/// take no room.
fn footprint(text: &str, rotation: Rotation) -> (usize, usize) {
    let widths = text.chars().map(char_width).filter(|w| *w > 0);
    match rotation {
        Rotation::Horizontal => (widths.sum(), 1),
        Rotation::Vertical => {
            let (rows, cols) = widths.fold((0, 0), |(rows, cols), w| (rows + 1, cols.max(w)));
            (cols, rows)
        }
    }
}

impl PlacedWord {
    /// Visible characters with their positions; zero-width ones are skipped.
    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        let mut offset = 0;
        self.text
            .chars()
            .filter(|ch| char_width(*ch) > 0)
            .map(move |ch| {
                let width = char_width(ch);
                let glyph = match self.rotation {
                    Rotation::Horizontal => Glyph {
                        ch,
                        x: self.x + offset,
                        y: self.y,
                        width,
                    },
                    Rotation::Vertical => Glyph {
                        ch,
                        x: self.x,
                        y: self.y + offset,
                        width,
                    },
                };
                offset += match self.rotation {
                    Rotation::Horizontal => width,
                    Rotation::Vertical => 1,
                };
                glyph
            })
    }

    /// Every canvas cell covered, as `(x, y)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.glyphs()
            .flat_map(|g| (0..g.width).map(move |dx| (g.x + dx, g.y)))
    }
}

/// Deterministic pick between horizontal and vertical. Mostly horizontal,
/// since vertical words are hard to read on a terminal.
fn rotation_for(text: &str) -> Rotation {
    let hash = text
        .bytes()
        .fold(0x811c9dc5u32, |acc, b| (acc ^ u32::from(b)).wrapping_mul(0x01000193));
    if hash % 4 == 0 {
        Rotation::Vertical
    } else {
        Rotation::Horizontal
    }
}

struct Grid {
    width: usize,
    height: usize,
    occupied: Vec<bool>,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            occupied: vec![false; width * height],
        }
    }

    /// Whether a `w` x `h` box fits at `(x, y)`, with one blank cell kept
    /// between horizontal neighbours so words don't run together.
    fn fits(&self, x: isize, y: isize, w: usize, h: usize) -> bool {
        if x < 0 || y < 0 || x as usize + w > self.width || y as usize + h > self.height {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let x0 = x.saturating_sub(1);
        let x1 = (x + w + 1).min(self.width);
        (y..y + h).all(|row| (x0..x1).all(|col| !self.occupied[row * self.width + col]))
    }

    fn mark(&mut self, word: &PlacedWord) {
        for (col, row) in word.cells() {
            self.occupied[row * self.width + col] = true;
        }
    }
}

/// Lay out `words` on a `width` x `height` grid of terminal cells.
///
/// Words are placed largest first along an Archimedean spiral that starts
/// at the centre; the first collision-free spot wins and words that never
/// find one are dropped. Sizes are measured in display columns, so wide
/// characters take two cells.
pub fn layout_in(mut words: Vec<CloudWord>, width: usize, height: usize) -> Vec<PlacedWord> {
    words.retain(|word| {
        !word.text.trim().is_empty() && footprint(&word.text, Rotation::Horizontal).0 > 0
    });
    words.sort_by(|a, b| b.size.total_cmp(&a.size));

    let mut grid = Grid::new(width, height);
    let mut placed = Vec::with_capacity(words.len());
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);

    for word in words {
        let mut rotation = rotation_for(&word.text);
        let (mut w, mut h) = footprint(&word.text, rotation);
        if rotation == Rotation::Vertical && h > height {
            rotation = Rotation::Horizontal;
            (w, h) = footprint(&word.text, rotation);
        }

        let spot = (0..SPIRAL_MAX_STEPS).find_map(|step| {
            let t = step as f64 * SPIRAL_STEP;
            let x = (cx - w as f64 / 2.0 + t * t.cos()).round() as isize;
            let y = (cy - h as f64 / 2.0 + t * t.sin() * CELL_ASPECT).round() as isize;
            grid.fits(x, y, w, h).then_some((x as usize, y as usize))
        });

        match spot {
            Some((x, y)) => {
                let word = PlacedWord {
                    text: word.text,
                    size: word.size,
                    score: word.score,
                    x,
                    y,
                    rotation,
                };
                grid.mark(&word);
                placed.push(word);
            }
            None => {
                tracing::trace!(word = %word.text, "no room left in word cloud");
            }
        }
    }

    placed
}

/// Lay out `words` on the fixed canvas.
pub fn layout(words: Vec<CloudWord>) -> Vec<PlacedWord> {
    layout_in(words, CANVAS_WIDTH, CANVAS_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn word(text: &str, size: f64, score: f64) -> CloudWord {
        CloudWord {
            text: text.to_string(),
            size,
            score,
        }
    }

    #[test]
    fn test_largest_word_is_centred() {
        let placed = layout(vec![word("tiny", 10.0, 1.0), word("huge", 40.0, 9.0)]);
        assert_eq!(placed[0].text, "huge");
        let mid_x = placed[0].x as f64 + 2.0;
        assert!((mid_x - CANVAS_WIDTH as f64 / 2.0).abs() <= 2.0);
    }

    #[test]
    fn test_placed_words_never_overlap_and_stay_inside() {
        let words: Vec<CloudWord> = (0..120)
            .map(|i| word(&format!("term{}", i), 10.0 + (i % 30) as f64, i as f64 - 60.0))
            .collect();
        let placed = layout(words);
        assert!(!placed.is_empty());

        let mut seen = HashSet::new();
        for w in &placed {
            for (x, y) in w.cells() {
                assert!(x < CANVAS_WIDTH && y < CANVAS_HEIGHT);
                assert!(seen.insert((x, y)), "cell ({}, {}) used twice", x, y);
            }
        }
    }

    #[test]
    fn test_words_that_do_not_fit_are_dropped() {
        let placed = layout_in(
            vec![word("alpha", 20.0, 1.0), word("abcdefghijklmnopqrstuvwxyz", 10.0, 1.0)],
            8,
            3,
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "alpha");
    }

    #[test]
    fn test_blank_terms_are_skipped() {
        assert!(layout(vec![word("  ", 30.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_wide_characters_take_two_cells() {
        let placed = layout(vec![
            word("日本語テスト", 40.0, 3.0),
            word("🎉🎉", 30.0, 2.0),
            word("café", 20.0, -1.0),
            word("naïve", 15.0, 1.0),
        ]);
        assert_eq!(placed.len(), 4);

        let wide = placed.iter().find(|w| w.text == "日本語テスト").unwrap();
        assert_eq!(wide.cells().count(), 12);
        assert!(wide.glyphs().all(|g| g.width == 2));

        let mut seen = HashSet::new();
        for w in &placed {
            for (x, y) in w.cells() {
                assert!(x < CANVAS_WIDTH && y < CANVAS_HEIGHT);
                assert!(seen.insert((x, y)), "cell ({}, {}) used twice", x, y);
            }
        }
    }

    #[test]
    fn test_zero_width_characters_take_no_cells() {
        let placed = PlacedWord {
            text: "e\u{301}x".to_string(),
            size: 10.0,
            score: 1.0,
            x: 3,
            y: 0,
            rotation: Rotation::Horizontal,
        };
        assert_eq!(placed.cells().collect::<Vec<_>>(), vec![(3, 0), (4, 0)]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let words = vec![word("good", 30.0, 5.0), word("bad", 20.0, -3.0), word("ok", 12.0, 2.0)];
        assert_eq!(layout(words.clone()), layout(words));
    }
}
