//! Shared pointer handling for every backend
//!
//! Backends translate their native events into `PointerEvent`s and feed them
//! here. On release this decides between a tap (by hit target) and a drag,
//! and hands drags to the classifier. Drags that do not count as a swipe fall
//! through to a tap on the color surface.

use tracing::debug;

use super::gestures::{GestureClassifier, GestureOutcome, TapTarget};
use super::touch::{PointerEvent, TouchTracker};
use crate::shell::assets::OverlayIcon;
use crate::shell::layout::OverlayLayout;
use crate::shell::primitives::Size;

/// Travel (dp) after which a press is a drag rather than a tap
pub const TOUCH_SLOP_DP: f64 = 8.0;

/// Release speed (dp/s) a drag needs on either axis to be a swipe
pub const MIN_FLING_VELOCITY_DP: f64 = 50.0;

fn tap_target(icon: Option<OverlayIcon>) -> TapTarget {
    match icon {
        Some(OverlayIcon::Lock) => TapTarget::LockIcon,
        Some(OverlayIcon::Hint) => TapTarget::HintIcon,
        None => TapTarget::ColorSurface,
    }
}

fn target_icon(target: TapTarget) -> Option<OverlayIcon> {
    match target {
        TapTarget::LockIcon => Some(OverlayIcon::Lock),
        TapTarget::HintIcon => Some(OverlayIcon::Hint),
        TapTarget::ColorSurface => None,
    }
}

pub struct InputHandler {
    classifier: GestureClassifier,
    layout: OverlayLayout,
    tracker: TouchTracker,
    /// Control the active press started on
    pressed: Option<TapTarget>,
    touch_slop: f64,
    min_fling_velocity: f64,
}

impl InputHandler {
    pub fn new(screen: Size, density: f64) -> Self {
        Self {
            classifier: GestureClassifier::new(density),
            layout: OverlayLayout::new(screen, density),
            tracker: TouchTracker::new(),
            pressed: None,
            touch_slop: TOUCH_SLOP_DP * density,
            min_fling_velocity: MIN_FLING_VELOCITY_DP * density,
        }
    }

    pub fn layout(&self) -> &OverlayLayout {
        &self.layout
    }

    /// Window size changed; drops any touch in progress
    pub fn resize(&mut self, screen: Size) {
        self.layout = OverlayLayout::new(screen, self.layout.density());
        self.tracker.cancel();
        self.pressed = None;
    }

    /// Returns an outcome once per completed interaction. While `locked`,
    /// a fling that matches no gesture is consumed instead of becoming a tap.
    pub fn handle(&mut self, event: PointerEvent, icons: &[OverlayIcon], locked: bool) -> Option<GestureOutcome> {
        match event {
            PointerEvent::Down { position, time } => {
                let target = tap_target(self.layout.hit_test(icons, position));
                debug!(?target, x = position.x, y = position.y, "Pointer down");
                self.pressed = Some(target);
                self.tracker.down(position, time);
                None
            }
            PointerEvent::Motion { position, time } => {
                self.tracker.motion(position, time);
                None
            }
            PointerEvent::Up { position, time } => {
                let target = self.pressed.take()?;
                let release = self.tracker.up(position, time)?;

                if let Some(icon) = target_icon(target) {
                    // Icon click only counts when released on the icon
                    return self
                        .layout
                        .icon_rect(icon)
                        .contains(release.end)
                        .then_some(GestureOutcome::Tap(target));
                }

                let is_drag = release.max_distance > self.touch_slop;
                let is_fling = release.velocity.x.abs() > self.min_fling_velocity
                    || release.velocity.y.abs() > self.min_fling_velocity;

                if !(is_drag && is_fling) {
                    return Some(GestureOutcome::Tap(TapTarget::ColorSurface));
                }

                let outcome = self.classifier.classify(
                    release.start,
                    release.end,
                    release.velocity,
                    self.layout.screen().h as f64,
                );
                debug!(
                    ?outcome,
                    dx = release.end.x - release.start.x,
                    dy = release.end.y - release.start.y,
                    vx = release.velocity.x,
                    vy = release.velocity.y,
                    "Fling classified"
                );

                match outcome {
                    GestureOutcome::NoMatch if locked => Some(GestureOutcome::NoMatch),
                    GestureOutcome::NoMatch => Some(GestureOutcome::Tap(TapTarget::ColorSurface)),
                    other => Some(other),
                }
            }
            PointerEvent::Cancel => {
                self.tracker.cancel();
                self.pressed = None;
                None
            }
        }
    }
}
