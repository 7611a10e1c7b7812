//! Basic geometry and rendering primitives
//!
//! Everything the shell draws is a list of `(Rect, Color)` pairs; backends
//! only need to fill rectangles with alpha blending.

use std::time::{Duration, Instant};

/// A point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// A simple rectangle for rendering and hit testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width &&
        p.y >= self.y && p.y < self.y + self.height
    }
}

/// Color in RGBA format (0.0 - 1.0)
pub type Color = [f32; 4];

/// Opaque 8-bit RGB color, the unit the render surface works in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn with_alpha(self, alpha: f32) -> Color {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            alpha,
        ]
    }
}

/// Colors for the overlay chrome
pub mod colors {
    use super::Color;

    pub const LIGHT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const DARK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const TOAST: Color = [0.20, 0.20, 0.20, 0.92]; // Snackbar gray
    pub const TOAST_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
}

/// Linear opacity fade between two values over a fixed duration
///
/// Starting a new fade while one is running continues from the current
/// value, so rapid toggles never jump.
#[derive(Debug, Clone)]
pub struct Fade {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Fade {
    pub fn new(value: f32, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
        }
    }

    pub fn set_immediate(&mut self, value: f32, now: Instant) {
        *self = Self::new(value, now);
    }

    pub fn animate_to(&mut self, target: f32, duration: Duration, now: Instant) {
        self.from = self.value(now);
        self.to = target;
        self.start = now;
        self.duration = duration;
    }

    pub fn value(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let t = clamp((elapsed / self.duration.as_secs_f32()) as f64, 0.0, 1.0) as f32;
        lerp(self.from as f64, self.to as f64, t as f64) as f32
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) < self.duration
    }
}

/// Linear interpolation
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp a value between min and max
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
