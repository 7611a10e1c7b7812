//! SDL backend - fullscreen window on a desktop or phone session
//!
//! Mouse and touch both drive the same pointer path. Haptics go to the first
//! rumble-capable device if there is one.

use std::time::{Duration, Instant};

use calloop::EventLoop;
use sdl2::event::{Event, WindowEvent};
use sdl2::haptic::Haptic;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::render::{BlendMode, WindowCanvas};
use sdl2::video::FullscreenType;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::PointerEvent;
use crate::shell::assets::{IconAsset, OverlayIcon};
use crate::shell::layout::OverlayLayout;
use crate::shell::primitives::{Color, Point, Rect, Rgb, Size};
use crate::shell::scene::Scene;
use crate::state::Spotcheck;
use crate::system::{
    Backlight, DisplayPower, Haptics, IconSurface, Notifier, RenderSurface, VibrationPattern,
};

const FRAME: Duration = Duration::from_millis(16);

fn backend_err(e: impl ToString) -> Error {
    Error::Backend(e.to_string())
}

/// SDL-backed host: scene for drawing, rumble for haptics
pub struct SdlHost {
    pub scene: Scene,
    canvas: WindowCanvas,
    video: sdl2::VideoSubsystem,
    windowed: bool,
    haptic: Option<Haptic>,
    haptics_enabled: bool,
    /// Rumble pulses still to play: (start, length ms)
    rumble: Vec<(Instant, u32)>,
}

impl SdlHost {
    fn render(&mut self, now: Instant) -> Result<()> {
        self.canvas.set_draw_color(sdl2::pixels::Color::RGB(0, 0, 0));
        self.canvas.clear();
        draw(&mut self.canvas, &self.scene.render(now))?;
        self.canvas.present();
        Ok(())
    }

    /// Start any rumble pulse that is due
    fn pump_haptics(&mut self, now: Instant) {
        let Some(haptic) = self.haptic.as_mut() else {
            self.rumble.clear();
            return;
        };
        let mut i = 0;
        while i < self.rumble.len() {
            if self.rumble[i].0 <= now {
                let (_, length) = self.rumble.remove(i);
                haptic.rumble_play(1.0, length);
            } else {
                i += 1;
            }
        }
    }
}

impl RenderSurface for SdlHost {
    fn set_background(&mut self, color: Rgb) {
        self.scene.set_background(color);
    }
}

impl IconSurface for SdlHost {
    fn set_image(&mut self, icon: OverlayIcon, asset: IconAsset) {
        self.scene.set_image(icon, asset);
    }

    fn set_opacity(&mut self, icon: OverlayIcon, alpha: f32) {
        self.scene.set_opacity(icon, alpha);
    }

    fn animate_opacity(&mut self, icon: OverlayIcon, target: f32, duration: Duration) {
        self.scene.animate_opacity(icon, target, duration);
    }
}

impl Notifier for SdlHost {
    fn show_message(&mut self, text: &str, duration: Duration) {
        self.scene.show_message(text, duration);
    }
}

impl Haptics for SdlHost {
    fn vibrate(&mut self, pattern: &VibrationPattern) {
        if !self.haptics_enabled {
            return;
        }
        if self.haptic.is_none() {
            debug!("No rumble device, vibration skipped");
            return;
        }
        let now = Instant::now();
        self.rumble.extend(
            pattern
                .pulses()
                .into_iter()
                .map(|(offset, length)| (now + offset, length.as_millis() as u32)),
        );
    }
}

impl DisplayPower for SdlHost {
    fn keep_awake(&mut self) {
        self.video.disable_screen_saver();
        debug!("Screen saver disabled");
    }

    fn max_brightness(&mut self) {
        // Window gamma only; the sysfs backlight is driven separately
        if let Err(e) = self.canvas.window_mut().set_brightness(1.0) {
            warn!("Could not set window brightness: {}", e);
        }
    }

    fn enter_immersive(&mut self) {
        if self.windowed {
            return;
        }
        if let Err(e) = self.canvas.window_mut().set_fullscreen(FullscreenType::Desktop) {
            warn!("Could not enter fullscreen: {}", e);
        }
    }
}

fn open_haptic(sdl: &sdl2::Sdl) -> Option<Haptic> {
    let haptic = match sdl.haptic() {
        Ok(haptic) => haptic,
        Err(e) => {
            debug!("Haptic subsystem unavailable: {}", e);
            return None;
        }
    };
    match haptic.open_from_joystick_id(0) {
        Ok(device) => {
            info!("Rumble device opened");
            Some(device)
        }
        Err(e) => {
            debug!("No rumble device: {}", e);
            None
        }
    }
}

fn draw(canvas: &mut WindowCanvas, rects: &[(Rect, Color)]) -> Result<()> {
    for (rect, color) in rects {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            continue;
        }
        let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        canvas.set_draw_color(sdl2::pixels::Color::RGBA(r, g, b, a));
        canvas
            .fill_rect(sdl2::rect::Rect::new(
                rect.x.round() as i32,
                rect.y.round() as i32,
                rect.width.round().max(1.0) as u32,
                rect.height.round().max(1.0) as u32,
            ))
            .map_err(backend_err)?;
    }
    Ok(())
}

/// Map SDL's normalized finger coordinates to window pixels
fn finger_position(x: f32, y: f32, screen: Size) -> Point {
    Point::new(x as f64 * screen.w as f64, y as f64 * screen.h as f64)
}

pub fn run(config: &Config, windowed: bool) -> Result<()> {
    info!("Starting SDL backend");

    // Touch should not also arrive as synthetic mouse input
    sdl2::hint::set("SDL_TOUCH_MOUSE_EVENTS", "0");

    let sdl = sdl2::init().map_err(backend_err)?;
    let video = sdl.video().map_err(backend_err)?;

    let mut builder = video.window("Spotcheck", config.display.width, config.display.height);
    builder.position_centered().resizable();
    if !windowed {
        builder.fullscreen_desktop();
    }
    let window = builder.build().map_err(backend_err)?;
    let (w, h) = window.size();
    let screen = Size::new(w, h);
    sdl.mouse().show_cursor(false);

    let mut canvas = window.into_canvas().present_vsync().build().map_err(backend_err)?;
    canvas.set_blend_mode(BlendMode::Blend);
    let mut event_pump = sdl.event_pump().map_err(backend_err)?;

    let backlight = if config.display.backlight_boost { Backlight::new() } else { None };
    if let Some(backlight) = &backlight {
        backlight.set(1.0);
    }

    let density = config.display.density;
    let icons = [OverlayIcon::Lock, OverlayIcon::Hint];
    let host = SdlHost {
        scene: Scene::new(OverlayLayout::new(screen, density), &icons),
        canvas,
        video,
        windowed,
        haptic: if config.haptics.enabled { open_haptic(&sdl) } else { None },
        haptics_enabled: config.haptics.enabled,
        rumble: Vec::new(),
    };

    let mut event_loop: EventLoop<'static, Spotcheck<SdlHost>> = EventLoop::try_new()?;
    let mut state = Spotcheck::new(event_loop.handle(), host, screen, density);
    state.start();

    let result = (|| -> Result<()> {
        'running: loop {
            let frame_start = Instant::now();
            let mut screen = state.input.layout().screen();

            for event in event_pump.poll_iter() {
                let pointer = match event {
                    Event::Quit { .. }
                    | Event::KeyDown { keycode: Some(Keycode::Escape | Keycode::Q), .. } => {
                        break 'running;
                    }
                    Event::Window { win_event: WindowEvent::FocusGained, .. } => {
                        state.on_focus_gained();
                        None
                    }
                    Event::Window { win_event: WindowEvent::SizeChanged(w, h), .. } => {
                        screen = Size::new(w.max(1) as u32, h.max(1) as u32);
                        state.resize(screen);
                        state.host.scene.set_layout(OverlayLayout::new(screen, density));
                        None
                    }
                    Event::MouseButtonDown { mouse_btn: MouseButton::Left, x, y, .. } => {
                        Some(PointerEvent::Down { position: Point::new(x as f64, y as f64), time: Instant::now() })
                    }
                    Event::MouseMotion { mousestate, x, y, .. } if mousestate.left() => {
                        Some(PointerEvent::Motion { position: Point::new(x as f64, y as f64), time: Instant::now() })
                    }
                    Event::MouseButtonUp { mouse_btn: MouseButton::Left, x, y, .. } => {
                        Some(PointerEvent::Up { position: Point::new(x as f64, y as f64), time: Instant::now() })
                    }
                    Event::FingerDown { x, y, .. } => {
                        Some(PointerEvent::Down { position: finger_position(x, y, screen), time: Instant::now() })
                    }
                    Event::FingerMotion { x, y, .. } => {
                        Some(PointerEvent::Motion { position: finger_position(x, y, screen), time: Instant::now() })
                    }
                    Event::FingerUp { x, y, .. } => {
                        Some(PointerEvent::Up { position: finger_position(x, y, screen), time: Instant::now() })
                    }
                    _ => None,
                };

                if let Some(pointer) = pointer {
                    state.handle_pointer(pointer)?;
                }
            }

            // Run any deferred actions that are due
            event_loop.dispatch(Some(Duration::ZERO), &mut state)?;

            let now = Instant::now();
            state.host.pump_haptics(now);
            state.host.scene.tick(now);

            state.host.render(now)?;

            if let Some(left) = FRAME.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(left);
            }
        }
        Ok(())
    })();

    if let Some(backlight) = &backlight {
        backlight.restore();
    }
    info!("SDL backend stopped");
    result
}
