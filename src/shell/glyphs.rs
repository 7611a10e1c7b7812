//! 12x12 bitmap icons for the overlay

use super::assets::{IconAsset, IconTone};
use super::primitives::{colors, Color, Rect};

const GRID: usize = 12;

const LOCK_CLOSED: [u16; GRID] = [
    0b000011110000,
    0b000100001000,
    0b001000000100,
    0b001000000100,
    0b001000000100,
    0b011111111110,
    0b011111111110,
    0b011110011110,
    0b011110011110,
    0b011111111110,
    0b011111111110,
    0b000000000000,
];

const LOCK_OPEN: [u16; GRID] = [
    0b000011110000,
    0b000100001000,
    0b001000000100,
    0b001000000000,
    0b001000000000,
    0b011111111110,
    0b011111111110,
    0b011110011110,
    0b011110011110,
    0b011111111110,
    0b011111111110,
    0b000000000000,
];

const QUESTION_MARK: [u16; GRID] = [
    0b000011110000,
    0b000110011000,
    0b001100001100,
    0b000000001100,
    0b000000011000,
    0b000000110000,
    0b000001100000,
    0b000001100000,
    0b000000000000,
    0b000001100000,
    0b000001100000,
    0b000000000000,
];

fn bitmap(asset: IconAsset) -> &'static [u16; GRID] {
    match asset {
        IconAsset::LockOpen(_) => &LOCK_OPEN,
        IconAsset::LockClosed(_) => &LOCK_CLOSED,
        IconAsset::Hint(_) => &QUESTION_MARK,
    }
}

/// Rectangles drawing `asset` inside `bounds` at the given opacity
pub fn render_icon(asset: IconAsset, bounds: Rect, alpha: f32) -> Vec<(Rect, Color)> {
    if alpha <= 0.0 {
        return Vec::new();
    }

    let base = match asset.tone() {
        IconTone::Light => colors::LIGHT,
        IconTone::Dark => colors::DARK,
    };
    let color = [base[0], base[1], base[2], base[3] * alpha];
    let cell_w = bounds.width / GRID as f64;
    let cell_h = bounds.height / GRID as f64;

    let mut rects = Vec::new();
    for (row, bits) in bitmap(asset).iter().enumerate() {
        for col in 0..GRID {
            if (bits >> (GRID - 1 - col)) & 1 == 1 {
                let x = bounds.x + col as f64 * cell_w;
                let y = bounds.y + row as f64 * cell_h;
                rects.push((Rect::new(x, y, cell_w, cell_h), color));
            }
        }
    }
    rects
}
