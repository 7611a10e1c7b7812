//! Headless backend - replays a scripted session
//!
//! Runs the full input path (touch tracking, classification, state machine,
//! deferred actions) against an offscreen scene, without a display. Used for
//! scripted checks and CI.
//!
//! Script format (TOML):
//! ```toml
//! [[step]]
//! kind = "swipe"
//! from = [900.0, 1200.0]
//! to = [200.0, 1200.0]
//! duration_ms = 120
//!
//! [[step]]
//! kind = "tap"
//! at = [540.0, 1200.0]
//!
//! [[step]]
//! kind = "wait"
//! ms = 600
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use calloop::EventLoop;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::PointerEvent;
use crate::shell::assets::{IconAsset, OverlayIcon};
use crate::shell::layout::OverlayLayout;
use crate::shell::primitives::{Point, Rgb};
use crate::shell::scene::Scene;
use crate::shell::view::ViewSnapshot;
use crate::state::Spotcheck;
use crate::system::{DisplayPower, Haptics, IconSurface, Notifier, RenderSurface, VibrationPattern};

/// Motion sample spacing for synthetic drags
const FRAME: Duration = Duration::from_millis(16);

fn default_swipe_ms() -> u64 {
    120
}

fn default_drag_ms() -> u64 {
    400
}

fn default_drag_hold_ms() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
    Tap {
        at: [f64; 2],
    },
    /// Straight drag; `hold_ms` rests on the end point before lifting
    Swipe {
        from: [f64; 2],
        to: [f64; 2],
        #[serde(default = "default_swipe_ms")]
        duration_ms: u64,
        #[serde(default)]
        hold_ms: u64,
    },
    /// Slow drag that comes to rest before lifting
    Drag {
        from: [f64; 2],
        to: [f64; 2],
        #[serde(default = "default_drag_ms")]
        duration_ms: u64,
        #[serde(default = "default_drag_hold_ms")]
        hold_ms: u64,
    },
    /// Window regained focus
    Focus,
    /// Let the event loop run in real time
    Wait {
        ms: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Replay(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

/// What happened during a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub outcomes: Vec<String>,
    pub vibrations: u32,
    pub messages: Vec<String>,
    pub background: Rgb,
    pub state: ViewSnapshot,
}

/// Offscreen host: a scene plus counters
pub struct HeadlessHost {
    pub scene: Scene,
    haptics_enabled: bool,
    vibrations: u32,
    messages: Vec<String>,
}

impl HeadlessHost {
    pub fn new(layout: OverlayLayout, icons: &[OverlayIcon], haptics_enabled: bool) -> Self {
        Self {
            scene: Scene::new(layout, icons),
            haptics_enabled,
            vibrations: 0,
            messages: Vec::new(),
        }
    }
}

impl RenderSurface for HeadlessHost {
    fn set_background(&mut self, color: Rgb) {
        debug!(?color, "Background");
        self.scene.set_background(color);
    }
}

impl IconSurface for HeadlessHost {
    fn set_image(&mut self, icon: OverlayIcon, asset: IconAsset) {
        self.scene.set_image(icon, asset);
    }

    fn set_opacity(&mut self, icon: OverlayIcon, alpha: f32) {
        self.scene.set_opacity(icon, alpha);
    }

    fn animate_opacity(&mut self, icon: OverlayIcon, target: f32, duration: Duration) {
        debug!(?icon, target, "Icon fade");
        self.scene.animate_opacity(icon, target, duration);
    }
}

impl Notifier for HeadlessHost {
    fn show_message(&mut self, text: &str, duration: Duration) {
        info!(text, "Hint");
        self.messages.push(text.to_string());
        self.scene.show_message(text, duration);
    }
}

impl Haptics for HeadlessHost {
    fn vibrate(&mut self, pattern: &VibrationPattern) {
        if !self.haptics_enabled {
            debug!("Haptics disabled, skipping vibration");
            return;
        }
        info!(timings = ?pattern.timings(), "Vibrate");
        self.vibrations += 1;
    }
}

impl DisplayPower for HeadlessHost {
    fn keep_awake(&mut self) {
        debug!("No display to keep awake");
    }

    fn max_brightness(&mut self) {
        debug!("No display brightness");
    }

    fn enter_immersive(&mut self) {
        debug!("No system chrome to hide");
    }
}

/// Pointer events for one step, on a synthetic clock starting at `t0`
fn step_events(step: &Step, t0: Instant) -> (Vec<PointerEvent>, Duration) {
    match *step {
        Step::Tap { at } => {
            let position = Point::new(at[0], at[1]);
            let events = vec![
                PointerEvent::Down { position, time: t0 },
                PointerEvent::Up { position, time: t0 + Duration::from_millis(50) },
            ];
            (events, Duration::from_millis(50))
        }
        Step::Swipe { from, to, duration_ms, hold_ms } | Step::Drag { from, to, duration_ms, hold_ms } => {
            let start = Point::new(from[0], from[1]);
            let end = Point::new(to[0], to[1]);
            let duration = Duration::from_millis(duration_ms.max(1));
            let samples = (duration.as_millis() / FRAME.as_millis()).max(1) as u32;

            let mut events = vec![PointerEvent::Down { position: start, time: t0 }];
            for i in 1..=samples {
                let t = i as f64 / samples as f64;
                let position = Point::new(
                    start.x + (end.x - start.x) * t,
                    start.y + (end.y - start.y) * t,
                );
                events.push(PointerEvent::Motion { position, time: t0 + duration * i / samples });
            }

            let mut elapsed = duration;
            if hold_ms > 0 {
                elapsed += Duration::from_millis(hold_ms);
                events.push(PointerEvent::Motion { position: end, time: t0 + elapsed });
            }
            events.push(PointerEvent::Up { position: end, time: t0 + elapsed });
            (events, elapsed)
        }
        Step::Focus | Step::Wait { .. } => (Vec::new(), Duration::ZERO),
    }
}

/// Run deferred actions posted so far
fn flush(event_loop: &mut EventLoop<'static, Spotcheck<HeadlessHost>>, state: &mut Spotcheck<HeadlessHost>) -> Result<()> {
    while state.pending_count() > 0 {
        event_loop.dispatch(Some(Duration::from_millis(1)), state)?;
    }
    Ok(())
}

/// Replay `script` and report the outcome of every interaction
pub fn run(config: &Config, script: &Script) -> Result<ReplayReport> {
    let mut event_loop: EventLoop<'static, Spotcheck<HeadlessHost>> = EventLoop::try_new()?;
    let size = config.display.size();
    let density = config.display.density;
    let icons = [OverlayIcon::Lock, OverlayIcon::Hint];
    let host = HeadlessHost::new(OverlayLayout::new(size, density), &icons, config.haptics.enabled);

    let mut state = Spotcheck::new(event_loop.handle(), host, size, density);
    state.start();
    info!(steps = script.steps.len(), "Replaying script");

    let mut clock = Instant::now();
    let mut outcomes = Vec::new();

    for step in &script.steps {
        debug!(?step, "Step");
        match step {
            Step::Focus => state.on_focus_gained(),
            Step::Wait { ms } => {
                let until = Instant::now() + Duration::from_millis(*ms);
                while let Some(left) = until.checked_duration_since(Instant::now()).filter(|d| !d.is_zero()) {
                    event_loop.dispatch(Some(left), &mut state)?;
                }
                clock += Duration::from_millis(*ms);
            }
            _ => {
                let (events, elapsed) = step_events(step, clock);
                for event in events {
                    if let Some(outcome) = state.handle_pointer(event)? {
                        outcomes.push(format!("{:?}", outcome));
                    }
                }
                clock += elapsed;
            }
        }
        flush(&mut event_loop, &mut state)?;
        state.host.scene.tick(Instant::now());
    }

    let host = &state.host;
    Ok(ReplayReport {
        outcomes,
        vibrations: host.vibrations,
        messages: host.messages.clone(),
        background: host.scene.background(),
        state: state.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::view::ICON_ALPHA;

    fn config() -> Config {
        let mut config = Config::default();
        config.display.density = 2.0;
        config
    }

    #[test]
    fn test_parse_script() {
        let script = Script::parse(
            r#"
            [[step]]
            kind = "tap"
            at = [10.0, 20.0]

            [[step]]
            kind = "swipe"
            from = [900.0, 1200.0]
            to = [200.0, 1200.0]

            [[step]]
            kind = "focus"
            "#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 3);
        assert_eq!(
            script.steps[1],
            Step::Swipe { from: [900.0, 1200.0], to: [200.0, 1200.0], duration_ms: 120, hold_ms: 0 }
        );
    }

    #[test]
    fn test_bad_script() {
        assert!(matches!(Script::parse("[[step]]\nkind = \"jump\"\n"), Err(Error::Replay(_))));
    }

    #[test]
    fn test_swipe_events_end_with_release() {
        let t0 = Instant::now();
        let step = Step::Swipe { from: [0.0, 0.0], to: [160.0, 0.0], duration_ms: 160, hold_ms: 0 };
        let (events, elapsed) = step_events(&step, t0);
        assert_eq!(events.len(), 12);
        assert_eq!(elapsed, Duration::from_millis(160));
        assert!(matches!(events.last(), Some(PointerEvent::Up { .. })));
    }

    #[test]
    fn test_replay_session() {
        let script = Script::parse(
            r#"
            [[step]]
            kind = "swipe"
            from = [900.0, 1200.0]
            to = [200.0, 1200.0]

            [[step]]
            kind = "swipe"
            from = [540.0, 1600.0]
            to = [540.0, 900.0]

            [[step]]
            kind = "tap"
            at = [60.0, 120.0]

            [[step]]
            kind = "swipe"
            from = [900.0, 1200.0]
            to = [200.0, 1200.0]

            [[step]]
            kind = "tap"
            at = [540.0, 1200.0]
            "#,
        )
        .unwrap();

        let report = run(&config(), &script).unwrap();

        assert_eq!(
            report.outcomes,
            vec!["CycleNext", "Alert", "Tap(LockIcon)", "CycleNext", "Tap(ColorSurface)"]
        );
        assert_eq!(report.vibrations, 1);
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.background, Rgb(255, 255, 255));
        assert_eq!(report.state.color, "white");
        assert!(report.state.locked);
        assert!(!report.state.icons_visible);
        assert_eq!(report.state.lock_asset, "lock-closed-dark");
    }

    #[test]
    fn test_slow_drags_toggle_icons_instead() {
        let script = Script::parse(
            r#"
            [[step]]
            kind = "swipe"
            from = [900.0, 1200.0]
            to = [200.0, 1200.0]
            hold_ms = 800

            [[step]]
            kind = "drag"
            from = [200.0, 1200.0]
            to = [900.0, 1200.0]
            "#,
        )
        .unwrap();

        let report = run(&config(), &script).unwrap();
        assert_eq!(report.outcomes, vec!["Tap(ColorSurface)", "Tap(ColorSurface)"]);
        assert_eq!(report.state.color, "black");
        assert!(report.state.icons_visible);
    }

    #[test]
    fn test_edge_swipe_ignored() {
        let script = Script::parse(
            r#"
            [[step]]
            kind = "swipe"
            from = [540.0, 2395.0]
            to = [540.0, 1500.0]
            "#,
        )
        .unwrap();

        let report = run(&config(), &script).unwrap();
        assert_eq!(report.outcomes, vec!["Ignore"]);
        assert_eq!(report.vibrations, 0);
        assert!(report.messages.is_empty());
    }

    #[test]
    fn test_scene_follows_state() {
        let event_loop: EventLoop<'static, Spotcheck<HeadlessHost>> = EventLoop::try_new().unwrap();
        let config = config();
        let size = config.display.size();
        let icons = [OverlayIcon::Lock, OverlayIcon::Hint];
        let host = HeadlessHost::new(OverlayLayout::new(size, 2.0), &icons, true);
        let mut state = Spotcheck::new(event_loop.handle(), host, size, 2.0);
        state.start();

        let scene = &state.host.scene;
        assert_eq!(scene.background(), Rgb(0, 0, 0));
        assert_eq!(scene.icon_asset(OverlayIcon::Hint), Some(IconAsset::hint(true)));
        assert_eq!(scene.icon_target(OverlayIcon::Lock), ICON_ALPHA);
    }
}
