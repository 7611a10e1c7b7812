//! Overlay icon placement
//!
//! Lock icon top-left, hint icon top-right, both just below the top system
//! gesture strip so a press on them never starts a guarded gesture.

use super::assets::OverlayIcon;
use super::primitives::{Point, Rect, Size};
use crate::input::EDGE_GESTURE_DP;

/// Icon edge length in dp
pub const ICON_SIZE_DP: f64 = 48.0;
/// Gap between icons and the screen edge in dp
pub const ICON_MARGIN_DP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    screen: Size,
    density: f64,
}

impl OverlayLayout {
    pub fn new(screen: Size, density: f64) -> Self {
        Self { screen, density }
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn icon_rect(&self, icon: OverlayIcon) -> Rect {
        let size = ICON_SIZE_DP * self.density;
        let margin = ICON_MARGIN_DP * self.density;
        let y = EDGE_GESTURE_DP * self.density + margin;
        let x = match icon {
            OverlayIcon::Lock => margin,
            OverlayIcon::Hint => self.screen.w as f64 - margin - size,
        };
        Rect::new(x, y, size, size)
    }

    /// Topmost icon under `point`; later icons draw above earlier ones
    pub fn hit_test(&self, icons: &[OverlayIcon], point: Point) -> Option<OverlayIcon> {
        icons
            .iter()
            .rev()
            .copied()
            .find(|&icon| self.icon_rect(icon).contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_sit_below_guard_strip() {
        let layout = OverlayLayout::new(Size::new(1080, 2400), 2.0);
        let lock = layout.icon_rect(OverlayIcon::Lock);
        let hint = layout.icon_rect(OverlayIcon::Hint);

        assert_eq!(lock, Rect::new(32.0, 80.0, 96.0, 96.0));
        assert_eq!(hint, Rect::new(1080.0 - 32.0 - 96.0, 80.0, 96.0, 96.0));
    }

    #[test]
    fn test_hit_test() {
        let layout = OverlayLayout::new(Size::new(1080, 2400), 2.0);
        let icons = [OverlayIcon::Lock, OverlayIcon::Hint];

        assert_eq!(layout.hit_test(&icons, Point::new(50.0, 100.0)), Some(OverlayIcon::Lock));
        assert_eq!(layout.hit_test(&icons, Point::new(1000.0, 100.0)), Some(OverlayIcon::Hint));
        assert_eq!(layout.hit_test(&icons, Point::new(540.0, 1200.0)), None);
        // Icons missing from the list are not hit
        assert_eq!(layout.hit_test(&icons[..1], Point::new(1000.0, 100.0)), None);
    }
}
