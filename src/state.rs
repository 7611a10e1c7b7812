//! Application state
//!
//! Ties the input handler, the view state machine and a host together. This
//! is the single entry point backends call with pointer and focus events.
//! Deferred actions (hint, icon fades) are calloop timers on the backend's
//! event loop, one slot per kind.

use std::collections::HashMap;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use tracing::{debug, info};

use crate::error::Result;
use crate::input::{GestureOutcome, InputHandler, PointerEvent};
use crate::shell::assets::OverlayIcon;
use crate::shell::primitives::Size;
use crate::shell::view::{DeferredAction, Effect, ViewSnapshot, ViewState, ICON_ALPHA};
use crate::system::Host;

/// Icon fade in/out duration
pub const FADE_DURATION: Duration = Duration::from_millis(500);

/// How long the help message stays up
pub const HINT_DURATION: Duration = Duration::from_millis(1500);

pub const HINT_TEXT: &str = "Swipe right for previous, left for next. Tap to show or hide icons.";

pub struct Spotcheck<H: Host + 'static> {
    pub view: ViewState,
    pub input: InputHandler,
    pub host: H,
    loop_handle: LoopHandle<'static, Spotcheck<H>>,
    /// Registered timer per deferred action kind
    pending: HashMap<DeferredAction, RegistrationToken>,
}

impl<H: Host + 'static> Spotcheck<H> {
    pub fn new(loop_handle: LoopHandle<'static, Spotcheck<H>>, host: H, screen: Size, density: f64) -> Self {
        Self {
            view: ViewState::new(vec![OverlayIcon::Lock, OverlayIcon::Hint]),
            input: InputHandler::new(screen, density),
            host,
            loop_handle,
            pending: HashMap::new(),
        }
    }

    /// Screen setup done once when the window first appears
    pub fn start(&mut self) {
        self.host.keep_awake();
        self.host.max_brightness();
        self.host.enter_immersive();

        for effect in self.view.initial_effects() {
            // Initial effects never schedule
            self.run_effect(effect);
        }
        for &icon in self.view.icons() {
            self.host.set_opacity(icon, ICON_ALPHA);
        }
        info!(state = ?self.view.snapshot(), "Spotcheck started");
    }

    pub fn on_focus_gained(&mut self) {
        debug!("Focus gained, re-entering immersive mode");
        self.host.enter_immersive();
    }

    pub fn resize(&mut self, screen: Size) {
        debug!(w = screen.w, h = screen.h, "Screen resized");
        self.input.resize(screen);
    }

    /// Feed one pointer event; returns the outcome once an interaction completes
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Option<GestureOutcome>> {
        let outcome = self.input.handle(event, self.view.icons(), self.view.is_locked());
        if let Some(outcome) = outcome {
            self.apply(outcome)?;
        }
        Ok(outcome)
    }

    pub fn apply(&mut self, outcome: GestureOutcome) -> Result<()> {
        let effects = self.view.apply(outcome);
        info!(?outcome, color = self.view.color().color().name, locked = self.view.is_locked(), "Gesture");

        for effect in effects {
            if let Effect::Schedule(action) = effect {
                self.schedule(action)?;
            } else {
                self.run_effect(effect);
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.view.snapshot()
    }

    pub fn is_pending(&self, action: DeferredAction) -> bool {
        self.pending.contains_key(&action)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SetBackground(color) => self.host.set_background(color),
            Effect::SetIcon { icon, asset } => {
                debug!(?icon, asset = asset.id(), "Icon image");
                self.host.set_image(icon, asset);
            }
            Effect::Vibrate(pattern) => self.host.vibrate(&pattern),
            Effect::Schedule(action) => {
                debug!(?action, "Schedule effect outside apply, dropped");
            }
        }
    }

    /// Replace whatever is pending in the action's slot with a fresh one.
    /// Hide and show share a slot so the last tap decides the fade target.
    fn schedule(&mut self, action: DeferredAction) -> Result<()> {
        for kind in action.replaces() {
            if let Some(token) = self.pending.remove(kind) {
                debug!(?kind, "Cancelled pending action");
                self.loop_handle.remove(token);
            }
        }

        let token = self
            .loop_handle
            .insert_source(Timer::immediate(), move |_, _, state: &mut Spotcheck<H>| {
                state.pending.remove(&action);
                state.run_deferred(action);
                TimeoutAction::Drop
            })
            .map_err(|e| e.error)?;
        self.pending.insert(action, token);
        Ok(())
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        debug!(?action, "Running deferred action");
        match action {
            DeferredAction::Hint => self.host.show_message(HINT_TEXT, HINT_DURATION),
            DeferredAction::HideIcons => self.fade_icons(0.0),
            DeferredAction::ShowIcons => self.fade_icons(ICON_ALPHA),
        }
    }

    fn fade_icons(&mut self, target: f32) {
        for &icon in self.view.icons() {
            self.host.animate_opacity(icon, target, FADE_DURATION);
        }
    }
}
