//! View state machine
//!
//! Owns the color selection, the lock flag and icon visibility. Each outcome
//! mutates that state and returns the effects the host has to render; the
//! state never talks to the host directly.

use serde::Serialize;
use tracing::debug;

use super::assets::{IconAsset, OverlayIcon};
use super::palette::ColorIndex;
use super::primitives::Rgb;
use crate::input::{GestureOutcome, TapTarget};
use crate::system::VibrationPattern;

/// Opacity of visible overlay icons
pub const ICON_ALPHA: f32 = 0.5;

/// 200ms pulse, 200ms pause, played once
pub const ALERT_PATTERN: VibrationPattern = VibrationPattern::new(&[200, 200]);

/// Deferred actions. The hint has its own pending slot; the two icon fades
/// share one, so scheduling either fade cancels whichever fade is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredAction {
    /// Show the help message
    Hint,
    /// Fade all overlay icons out
    HideIcons,
    /// Fade all overlay icons back in
    ShowIcons,
}

impl DeferredAction {
    /// Pending actions that scheduling `self` replaces
    pub fn replaces(self) -> &'static [DeferredAction] {
        match self {
            DeferredAction::Hint => &[DeferredAction::Hint],
            DeferredAction::HideIcons | DeferredAction::ShowIcons => {
                &[DeferredAction::HideIcons, DeferredAction::ShowIcons]
            }
        }
    }
}

/// Something the host must do after a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    SetBackground(Rgb),
    SetIcon { icon: OverlayIcon, asset: IconAsset },
    Vibrate(VibrationPattern),
    Schedule(DeferredAction),
}

/// Serializable view of the state, for logs and reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub color_index: usize,
    pub color: &'static str,
    pub locked: bool,
    pub icons_visible: bool,
    pub lock_asset: &'static str,
    pub hint_asset: &'static str,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    color: ColorIndex,
    locked: bool,
    icons_visible: bool,
    /// Overlay icons in draw order
    icons: Vec<OverlayIcon>,
}

impl ViewState {
    /// Starts on black, unlocked, icons visible
    pub fn new(icons: Vec<OverlayIcon>) -> Self {
        Self {
            color: ColorIndex::default(),
            locked: false,
            icons_visible: true,
            icons,
        }
    }

    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn icons_visible(&self) -> bool {
        self.icons_visible
    }

    pub fn icons(&self) -> &[OverlayIcon] {
        &self.icons
    }

    /// Asset an icon must show for the current state
    pub fn asset_for(&self, icon: OverlayIcon) -> IconAsset {
        let on_black = self.color.is_black();
        match icon {
            OverlayIcon::Lock => IconAsset::lock(self.locked, on_black),
            OverlayIcon::Hint => IconAsset::hint(on_black),
        }
    }

    /// Effects that bring a fresh host surface in line with the state
    pub fn initial_effects(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::SetBackground(self.color.color().rgb)];
        self.refresh(&mut effects, |_| true);
        effects
    }

    pub fn apply(&mut self, outcome: GestureOutcome) -> Vec<Effect> {
        let mut effects = Vec::new();

        match outcome {
            GestureOutcome::CyclePrev | GestureOutcome::CycleNext if self.locked => {
                debug!(?outcome, "Locked, color change ignored");
            }
            GestureOutcome::CyclePrev | GestureOutcome::CycleNext => {
                self.color = if outcome == GestureOutcome::CyclePrev {
                    self.color.prev()
                } else {
                    self.color.next()
                };
                effects.push(Effect::SetBackground(self.color.color().rgb));
                self.refresh(&mut effects, |_| true);
            }
            GestureOutcome::Alert if self.locked => {
                debug!("Locked, alert ignored");
            }
            GestureOutcome::Alert => {
                effects.push(Effect::Vibrate(ALERT_PATTERN));
                effects.push(Effect::Schedule(DeferredAction::Hint));
            }
            GestureOutcome::Tap(TapTarget::ColorSurface) => {
                self.icons_visible = !self.icons_visible;
                let action = if self.icons_visible {
                    DeferredAction::ShowIcons
                } else {
                    DeferredAction::HideIcons
                };
                effects.push(Effect::Schedule(action));
            }
            GestureOutcome::Tap(TapTarget::LockIcon) => {
                self.locked = !self.locked;
                self.refresh(&mut effects, |icon| icon == OverlayIcon::Lock);
            }
            GestureOutcome::Tap(TapTarget::HintIcon) => {
                effects.push(Effect::Schedule(DeferredAction::Hint));
            }
            GestureOutcome::Ignore | GestureOutcome::NoMatch => {}
        }

        effects
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            color_index: self.color.get(),
            color: self.color.color().name,
            locked: self.locked,
            icons_visible: self.icons_visible,
            lock_asset: self.asset_for(OverlayIcon::Lock).id(),
            hint_asset: self.asset_for(OverlayIcon::Hint).id(),
        }
    }

    fn refresh(&self, effects: &mut Vec<Effect>, which: impl Fn(OverlayIcon) -> bool) {
        for &icon in self.icons.iter().filter(|&&icon| which(icon)) {
            effects.push(Effect::SetIcon {
                icon,
                asset: self.asset_for(icon),
            });
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(vec![OverlayIcon::Lock, OverlayIcon::Hint])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::assets::IconTone;

    fn lock_asset(effects: &[Effect]) -> Option<IconAsset> {
        effects.iter().find_map(|e| match e {
            Effect::SetIcon { icon: OverlayIcon::Lock, asset } => Some(*asset),
            _ => None,
        })
    }

    #[test]
    fn test_fades_share_a_slot() {
        assert_eq!(DeferredAction::Hint.replaces(), &[DeferredAction::Hint]);
        for fade in [DeferredAction::HideIcons, DeferredAction::ShowIcons] {
            assert!(fade.replaces().contains(&DeferredAction::HideIcons));
            assert!(fade.replaces().contains(&DeferredAction::ShowIcons));
            assert!(!fade.replaces().contains(&DeferredAction::Hint));
        }
    }

    #[test]
    fn test_initial_effects_cover_every_icon() {
        let view = ViewState::default();
        let effects = view.initial_effects();
        assert_eq!(
            effects,
            vec![
                Effect::SetBackground(Rgb(0, 0, 0)),
                Effect::SetIcon { icon: OverlayIcon::Lock, asset: IconAsset::LockOpen(IconTone::Light) },
                Effect::SetIcon { icon: OverlayIcon::Hint, asset: IconAsset::Hint(IconTone::Light) },
            ]
        );
    }

    #[test]
    fn test_cycle_next_from_black_switches_icon_tone() {
        let mut view = ViewState::default();
        let effects = view.apply(GestureOutcome::CycleNext);

        assert_eq!(view.color().get(), 1);
        assert_eq!(view.color().color().name, "white");
        assert_eq!(effects[0], Effect::SetBackground(Rgb(255, 255, 255)));
        assert_eq!(lock_asset(&effects), Some(IconAsset::LockOpen(IconTone::Dark)));
        assert!(effects.contains(&Effect::SetIcon {
            icon: OverlayIcon::Hint,
            asset: IconAsset::Hint(IconTone::Dark),
        }));
    }

    #[test]
    fn test_cycle_prev_wraps_to_cyan_then_magenta() {
        let mut view = ViewState::default();
        view.apply(GestureOutcome::CycleNext);
        view.apply(GestureOutcome::CyclePrev);
        assert_eq!(view.color().get(), 0);

        view.apply(GestureOutcome::CyclePrev);
        assert_eq!(view.color().color().name, "cyan");
        view.apply(GestureOutcome::CyclePrev);
        assert_eq!(view.color().get(), 6);
        assert_eq!(view.color().color().name, "magenta");
    }

    #[test]
    fn test_round_trip_from_every_index() {
        let mut view = ViewState::default();
        for _ in 0..8 {
            let before = view.color();
            view.apply(GestureOutcome::CycleNext);
            view.apply(GestureOutcome::CyclePrev);
            assert_eq!(view.color(), before);
            view.apply(GestureOutcome::CyclePrev);
            view.apply(GestureOutcome::CycleNext);
            assert_eq!(view.color(), before);
            view.apply(GestureOutcome::CycleNext);
        }
    }

    #[test]
    fn test_lock_tap_updates_asset_and_blocks_cycling() {
        let mut view = ViewState::default();
        let effects = view.apply(GestureOutcome::Tap(TapTarget::LockIcon));
        assert!(view.is_locked());
        assert_eq!(effects, vec![Effect::SetIcon {
            icon: OverlayIcon::Lock,
            asset: IconAsset::LockClosed(IconTone::Light),
        }]);

        assert!(view.apply(GestureOutcome::CycleNext).is_empty());
        assert!(view.apply(GestureOutcome::CyclePrev).is_empty());
        assert_eq!(view.color().get(), 0);
    }

    #[test]
    fn test_unlock_restores_cycling() {
        let mut view = ViewState::default();
        view.apply(GestureOutcome::Tap(TapTarget::LockIcon));
        view.apply(GestureOutcome::Tap(TapTarget::LockIcon));
        assert!(!view.is_locked());
        view.apply(GestureOutcome::CycleNext);
        assert_eq!(view.color().get(), 1);
    }

    #[test]
    fn test_alert_vibrates_and_schedules_hint() {
        let mut view = ViewState::default();
        assert_eq!(
            view.apply(GestureOutcome::Alert),
            vec![Effect::Vibrate(ALERT_PATTERN), Effect::Schedule(DeferredAction::Hint)]
        );
    }

    #[test]
    fn test_alert_suppressed_while_locked() {
        let mut view = ViewState::default();
        view.apply(GestureOutcome::Tap(TapTarget::LockIcon));
        assert!(view.apply(GestureOutcome::Alert).is_empty());
    }

    #[test]
    fn test_surface_tap_toggles_visibility() {
        let mut view = ViewState::default();
        assert_eq!(
            view.apply(GestureOutcome::Tap(TapTarget::ColorSurface)),
            vec![Effect::Schedule(DeferredAction::HideIcons)]
        );
        assert!(!view.icons_visible());
        assert_eq!(
            view.apply(GestureOutcome::Tap(TapTarget::ColorSurface)),
            vec![Effect::Schedule(DeferredAction::ShowIcons)]
        );
        assert!(view.icons_visible());
    }

    #[test]
    fn test_lock_and_visibility_are_independent() {
        let mut view = ViewState::default();
        let mut seen = Vec::new();
        for step in [TapTarget::LockIcon, TapTarget::ColorSurface, TapTarget::LockIcon, TapTarget::ColorSurface] {
            view.apply(GestureOutcome::Tap(step));
            seen.push((view.is_locked(), view.icons_visible()));
        }
        assert_eq!(seen, vec![(true, true), (true, false), (false, false), (false, true)]);
    }

    #[test]
    fn test_hint_tap_works_while_locked() {
        let mut view = ViewState::default();
        view.apply(GestureOutcome::Tap(TapTarget::LockIcon));
        assert_eq!(
            view.apply(GestureOutcome::Tap(TapTarget::HintIcon)),
            vec![Effect::Schedule(DeferredAction::Hint)]
        );
    }

    #[test]
    fn test_ignore_and_no_match_are_inert() {
        let mut view = ViewState::default();
        assert!(view.apply(GestureOutcome::Ignore).is_empty());
        assert!(view.apply(GestureOutcome::NoMatch).is_empty());
        assert_eq!(view.snapshot(), ViewState::default().snapshot());
    }

    #[test]
    fn test_assets_track_color_after_every_mutation() {
        let mut view = ViewState::default();
        let outcomes = [
            GestureOutcome::CycleNext,
            GestureOutcome::Tap(TapTarget::LockIcon),
            GestureOutcome::CyclePrev,
            GestureOutcome::Tap(TapTarget::LockIcon),
            GestureOutcome::CyclePrev,
            GestureOutcome::CycleNext,
        ];
        for outcome in outcomes {
            view.apply(outcome);
            let expected = IconTone::for_background(view.color().is_black());
            assert_eq!(view.asset_for(OverlayIcon::Lock).tone(), expected);
            assert_eq!(view.asset_for(OverlayIcon::Hint).tone(), expected);
        }
    }

    #[test]
    fn test_icon_list_limits_refreshes() {
        let mut view = ViewState::new(vec![OverlayIcon::Hint]);
        let effects = view.apply(GestureOutcome::CycleNext);
        assert_eq!(lock_asset(&effects), None);
        assert_eq!(effects.len(), 2);
    }
}
