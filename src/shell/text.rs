//! Simple bitmap text rendering using rectangles
//!
//! Renders text using a simple 5x7 pixel font represented as rectangles.
//! Only the glyphs toast messages need are defined.

use super::primitives::{Rect, Color};

/// Width of each character in pixels
const CHAR_WIDTH: f64 = 5.0;
/// Height of each character in pixels
pub const CHAR_HEIGHT: f64 = 7.0;
/// Space between characters
const CHAR_SPACING: f64 = 1.0;

/// Unknown characters draw as an outlined box
const MISSING: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

/// 5x7 glyphs for the characters toast messages use.
/// Rows top to bottom, bit 4 is the leftmost column.
const GLYPHS: &[(char, [u8; 7])] = &[
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    (' ', [0; 7]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    (',', [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000]),
];

fn glyph(c: char) -> [u8; 7] {
    let c = c.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(g, _)| *g == c)
        .map(|(_, bitmap)| *bitmap)
        .unwrap_or(MISSING)
}

/// Horizontal runs of lit pixels in one glyph row, as (first column, length)
fn row_runs(bits: u8) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut col = 0;
    while col < 5 {
        if (bits >> (4 - col)) & 1 == 1 {
            let start = col;
            while col < 5 && (bits >> (4 - col)) & 1 == 1 {
                col += 1;
            }
            runs.push((start, col - start));
        } else {
            col += 1;
        }
    }
    runs
}

/// Get the width of a text string in pixels (at scale 1.0)
pub fn text_width(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    (text.chars().count() as f64) * (CHAR_WIDTH + CHAR_SPACING) - CHAR_SPACING
}

/// Render text as a list of rectangles, one per horizontal run of pixels
/// x, y is the top-left position, scale multiplies the base pixel size
pub fn render_text(text: &str, x: f64, y: f64, scale: f64, color: Color) -> Vec<(Rect, Color)> {
    let mut rects = Vec::new();

    for (i, c) in text.chars().enumerate() {
        let left = x + i as f64 * (CHAR_WIDTH + CHAR_SPACING) * scale;
        for (row, &bits) in glyph(c).iter().enumerate() {
            let top = y + row as f64 * scale;
            for (col, len) in row_runs(bits) {
                rects.push((
                    Rect::new(left + col as f64 * scale, top, len as f64 * scale, scale),
                    color,
                ));
            }
        }
    }

    rects
}

/// Render text centered horizontally on `center_x`
pub fn render_text_centered(text: &str, center_x: f64, y: f64, scale: f64, color: Color) -> Vec<(Rect, Color)> {
    let width = text_width(text) * scale;
    render_text(text, center_x - width / 2.0, y, scale, color)
}

/// Greedy word wrap so no line is wider than `max_width` at `scale`
///
/// A single word longer than the limit gets a line of its own.
pub fn wrap_text(text: &str, max_width: f64, scale: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if text_width(&candidate) * scale <= max_width || line.is_empty() {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0.0);
        assert_eq!(text_width("A"), 5.0);
        assert_eq!(text_width("AB"), 11.0);
    }

    #[test]
    fn test_render_merges_runs() {
        // 'I': a 3-wide bar, five single stem pixels, a 3-wide bar
        let rects = render_text("I", 0.0, 0.0, 2.0, [1.0; 4]);
        assert_eq!(rects.len(), 7);
        assert_eq!(rects[0].0, Rect::new(2.0, 0.0, 6.0, 2.0));
        assert_eq!(rects[1].0, Rect::new(4.0, 2.0, 2.0, 2.0));
        assert!(rects.iter().all(|(r, _)| r.height == 2.0));
    }

    #[test]
    fn test_row_runs() {
        assert!(row_runs(0b00000).is_empty());
        assert_eq!(row_runs(0b11111), vec![(0, 5)]);
        assert_eq!(row_runs(0b10101), vec![(0, 1), (2, 1), (4, 1)]);
        assert_eq!(row_runs(0b11011), vec![(0, 2), (3, 2)]);
    }

    #[test]
    fn test_hint_text_has_every_glyph() {
        let hint = "Swipe right for previous, left for next. Tap to show or hide icons.";
        assert!(hint.chars().all(|c| glyph(c) != MISSING));
        assert_eq!(glyph('?'), MISSING);
        assert_eq!(glyph('s'), glyph('S'));
    }

    #[test]
    fn test_wrap_text() {
        // 6px per char at scale 1, minus the trailing gap: 7 chars fit in 41px
        let lines = wrap_text("tap to show or hide", 41.0, 1.0);
        assert_eq!(lines, vec!["tap to", "show or", "hide"]);
        for line in &lines {
            assert!(text_width(line) <= 41.0);
        }
    }

    #[test]
    fn test_wrap_keeps_long_words() {
        assert_eq!(wrap_text("previous", 10.0, 1.0), vec!["previous"]);
    }
}
