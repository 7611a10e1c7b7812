//! Fixed test palette
//!
//! Pure primaries and secondaries plus black and white: enough to expose
//! dead (always dark), stuck (always lit) and hot subpixels.

use super::primitives::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: Rgb,
}

pub const PALETTE: [NamedColor; 8] = [
    NamedColor { name: "black", rgb: Rgb(0, 0, 0) },
    NamedColor { name: "white", rgb: Rgb(255, 255, 255) },
    NamedColor { name: "red", rgb: Rgb(255, 0, 0) },
    NamedColor { name: "green", rgb: Rgb(0, 255, 0) },
    NamedColor { name: "blue", rgb: Rgb(0, 0, 255) },
    NamedColor { name: "yellow", rgb: Rgb(255, 255, 0) },
    NamedColor { name: "magenta", rgb: Rgb(255, 0, 255) },
    NamedColor { name: "cyan", rgb: Rgb(0, 255, 255) },
];

/// Position in `PALETTE`; always in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorIndex(usize);

impl ColorIndex {
    /// Wraps out-of-range values into the palette
    pub fn new(index: usize) -> Self {
        Self(index % PALETTE.len())
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1) % PALETTE.len())
    }

    pub fn prev(self) -> Self {
        Self((self.0 + PALETTE.len() - 1) % PALETTE.len())
    }

    pub fn color(self) -> &'static NamedColor {
        &PALETTE[self.0]
    }

    /// Whether the background is black, which selects the light icon set
    pub fn is_black(self) -> bool {
        self.color().rgb == Rgb(0, 0, 0)
    }
}
