//! Gesture classification
//!
//! Turns one completed single-pointer drag into a discrete outcome:
//! - Ignore: started inside the top/bottom system gesture strip
//! - CyclePrev / CycleNext: horizontal swipe (right = previous, left = next)
//! - Alert: any vertical-dominant motion
//! - NoMatch: none of the above, the caller treats it as a tap
//!
//! Taps are reported by the input handler, which knows the hit target.

use crate::shell::primitives::Point;

/// Height of the top/bottom system gesture strip in dp
pub const EDGE_GESTURE_DP: f64 = 24.0;

/// Minimum horizontal travel for a color swipe (px)
pub const SWIPE_MIN_DISTANCE: f64 = 100.0;

/// Minimum horizontal release speed for a color swipe (px/s)
pub const SWIPE_MIN_VELOCITY: f64 = 100.0;

/// Which on-screen control received a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapTarget {
    ColorSurface,
    LockIcon,
    HintIcon,
}

/// Result of interpreting one touch interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Ignore,
    CyclePrev,
    CycleNext,
    Alert,
    NoMatch,
    Tap(TapTarget),
}

/// Classifies completed drags against the screen geometry
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    /// Guard strip height in pixels
    edge_guard: f64,
}

impl GestureClassifier {
    /// `density` is the display scale (pixels per dp)
    pub fn new(density: f64) -> Self {
        Self {
            edge_guard: (EDGE_GESTURE_DP * density).trunc(),
        }
    }

    /// Whether a start point lies in the top or bottom guard strip
    pub fn in_guard_strip(&self, start: Point, screen_height: f64) -> bool {
        start.y < self.edge_guard || start.y > screen_height - self.edge_guard
    }

    pub fn classify(
        &self,
        start: Point,
        end: Point,
        velocity: Point,
        screen_height: f64,
    ) -> GestureOutcome {
        if self.in_guard_strip(start, screen_height) {
            return GestureOutcome::Ignore;
        }

        let dx = end.x - start.x;
        let dy = end.y - start.y;

        if dx.abs() > dy.abs() && dx.abs() > SWIPE_MIN_DISTANCE && velocity.x.abs() > SWIPE_MIN_VELOCITY {
            // Page-turn order
            return if dx > 0.0 {
                GestureOutcome::CyclePrev
            } else {
                GestureOutcome::CycleNext
            };
        }

        // No distance threshold here, unlike the horizontal case
        if dy.abs() > dx.abs() {
            return GestureOutcome::Alert;
        }

        GestureOutcome::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 2400.0;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(2.75)
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_guard_is_truncated_pixels() {
        // 24dp at 2.75 is 66px, at 1.5 it is 36px
        let c = classifier();
        assert!(c.in_guard_strip(p(540.0, 65.9), HEIGHT));
        assert!(!c.in_guard_strip(p(540.0, 66.0), HEIGHT));
        assert!(!c.in_guard_strip(p(540.0, HEIGHT - 66.0), HEIGHT));
        assert!(c.in_guard_strip(p(540.0, HEIGHT - 65.9), HEIGHT));

        let c = GestureClassifier::new(1.5);
        assert!(c.in_guard_strip(p(540.0, 35.9), HEIGHT));
        assert!(!c.in_guard_strip(p(540.0, 36.0), HEIGHT));
    }

    #[test]
    fn test_guard_strip_always_ignored() {
        let c = classifier();
        let moves = [(500.0, 0.0), (-500.0, 0.0), (0.0, 500.0), (0.0, -40.0), (3.0, 2.0)];
        for start_y in [0.0, 10.0, 65.9, HEIGHT - 65.0, HEIGHT] {
            for (dx, dy) in moves {
                let start = p(540.0, start_y);
                let end = p(540.0 + dx, start_y + dy);
                assert_eq!(
                    c.classify(start, end, p(5000.0, 5000.0), HEIGHT),
                    GestureOutcome::Ignore,
                    "start_y={start_y} dx={dx} dy={dy}"
                );
            }
        }
    }

    #[test]
    fn test_guard_boundaries_are_exclusive() {
        let c = classifier();
        let start = p(540.0, 66.0);
        assert_eq!(
            c.classify(start, p(100.0, 70.0), p(-800.0, 0.0), HEIGHT),
            GestureOutcome::CycleNext
        );
        let start = p(540.0, HEIGHT - 66.0);
        assert_eq!(
            c.classify(start, p(900.0, HEIGHT - 60.0), p(800.0, 0.0), HEIGHT),
            GestureOutcome::CyclePrev
        );
    }

    #[test]
    fn test_horizontal_swipe_direction() {
        let c = classifier();
        let start = p(540.0, 1200.0);
        assert_eq!(
            c.classify(start, p(800.0, 1250.0), p(900.0, 10.0), HEIGHT),
            GestureOutcome::CyclePrev
        );
        assert_eq!(
            c.classify(start, p(200.0, 1180.0), p(-900.0, 10.0), HEIGHT),
            GestureOutcome::CycleNext
        );
    }

    #[test]
    fn test_short_or_slow_horizontal_is_no_match() {
        let c = classifier();
        let start = p(540.0, 1200.0);
        // Exactly 100px is not enough
        assert_eq!(
            c.classify(start, p(640.0, 1200.0), p(900.0, 0.0), HEIGHT),
            GestureOutcome::NoMatch
        );
        // Far enough, but released too slowly
        assert_eq!(
            c.classify(start, p(900.0, 1200.0), p(100.0, 0.0), HEIGHT),
            GestureOutcome::NoMatch
        );
    }

    #[test]
    fn test_vertical_alert_has_no_threshold() {
        let c = classifier();
        let start = p(540.0, 1200.0);
        assert_eq!(
            c.classify(start, p(541.0, 1203.0), p(0.0, 0.0), HEIGHT),
            GestureOutcome::Alert
        );
        assert_eq!(
            c.classify(start, p(540.0, 400.0), p(0.0, -3000.0), HEIGHT),
            GestureOutcome::Alert
        );
    }

    #[test]
    fn test_diagonal_tie_is_no_match() {
        let c = classifier();
        let start = p(540.0, 1200.0);
        assert_eq!(
            c.classify(start, p(740.0, 1400.0), p(900.0, 900.0), HEIGHT),
            GestureOutcome::NoMatch
        );
    }
}
