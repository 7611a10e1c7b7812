//! Host capabilities
//!
//! The core only reaches the outside world through these traits:
//! - Render surface (solid background)
//! - Icon surfaces (image, opacity, opacity fades)
//! - Transient notifications
//! - Haptics
//! - Display power (keep awake, brightness, immersive mode)
//!
//! Plus the sysfs backlight controller used by the optional brightness boost.

use std::fs;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::shell::assets::{IconAsset, OverlayIcon};
use crate::shell::primitives::Rgb;

/// Vibration timings in ms, alternating on/off starting with "on"; never repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationPattern {
    timings: &'static [u64],
}

impl VibrationPattern {
    pub const fn new(timings: &'static [u64]) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> &'static [u64] {
        self.timings
    }

    /// The "on" segments as (offset from start, length)
    pub fn pulses(&self) -> Vec<(Duration, Duration)> {
        let mut offset = 0;
        let mut pulses = Vec::new();
        for (i, &ms) in self.timings.iter().enumerate() {
            if i % 2 == 0 && ms > 0 {
                pulses.push((Duration::from_millis(offset), Duration::from_millis(ms)));
            }
            offset += ms;
        }
        pulses
    }
}

pub trait RenderSurface {
    fn set_background(&mut self, color: Rgb);
}

pub trait IconSurface {
    fn set_image(&mut self, icon: OverlayIcon, asset: IconAsset);
    fn set_opacity(&mut self, icon: OverlayIcon, alpha: f32);
    fn animate_opacity(&mut self, icon: OverlayIcon, target: f32, duration: Duration);
}

pub trait Notifier {
    fn show_message(&mut self, text: &str, duration: Duration);
}

pub trait Haptics {
    /// Hosts without a vibration device do nothing
    fn vibrate(&mut self, pattern: &VibrationPattern);
}

pub trait DisplayPower {
    fn keep_awake(&mut self);
    fn max_brightness(&mut self);
    /// Hide system chrome; called at start and on every focus gain
    fn enter_immersive(&mut self);
}

/// Everything the app needs from a backend
pub trait Host: RenderSurface + IconSurface + Notifier + Haptics + DisplayPower {}

impl<T> Host for T where T: RenderSurface + IconSurface + Notifier + Haptics + DisplayPower {}

/// Backlight controller
pub struct Backlight {
    path: String,
    max_brightness: u32,
    /// Raw value found at startup, written back by `restore`
    original: Option<u32>,
}

impl Backlight {
    /// Find and initialize backlight control
    pub fn new() -> Option<Self> {
        let backlight_dir = "/sys/class/backlight";
        let entries = fs::read_dir(backlight_dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if let Ok(max) = fs::read_to_string(path.join("max_brightness")) {
                if let Ok(max_brightness) = max.trim().parse() {
                    let original = fs::read_to_string(path.join("brightness"))
                        .ok()
                        .and_then(|v| v.trim().parse().ok());
                    debug!(path = %path.display(), max_brightness, "Found backlight");
                    return Some(Self {
                        path: path.to_string_lossy().to_string(),
                        max_brightness,
                        original,
                    });
                }
            }
        }
        None
    }

    /// Set brightness (0.0-1.0)
    pub fn set(&self, value: f32) {
        let clamped = value.clamp(0.05, 1.0); // Minimum 5% to avoid black screen
        let raw_value = (clamped * self.max_brightness as f32) as u32;
        self.write_raw(raw_value, (clamped * 100.0) as u32);
    }

    /// Put back the brightness found at startup
    pub fn restore(&self) {
        if let Some(raw) = self.original {
            let percent = raw * 100 / self.max_brightness.max(1);
            self.write_raw(raw, percent);
            info!(raw, "Backlight restored");
        }
    }

    fn write_raw(&self, raw_value: u32, percent: u32) {
        let brightness_path = format!("{}/brightness", self.path);

        // Try writing directly (requires permissions)
        if fs::write(&brightness_path, raw_value.to_string()).is_err() {
            // Fallback: brightnessctl
            match Command::new("brightnessctl")
                .args(["set", &format!("{}%", percent)])
                .output()
            {
                Ok(_) => debug!(percent, "Backlight set via brightnessctl"),
                Err(e) => warn!("Failed to set backlight: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_pattern_pulses() {
        let pattern = VibrationPattern::new(&[200, 200]);
        assert_eq!(
            pattern.pulses(),
            vec![(Duration::ZERO, Duration::from_millis(200))]
        );
    }

    #[test]
    fn test_multi_pulse_offsets() {
        let pattern = VibrationPattern::new(&[100, 50, 0, 25, 80]);
        assert_eq!(
            pattern.pulses(),
            vec![
                (Duration::ZERO, Duration::from_millis(100)),
                (Duration::from_millis(175), Duration::from_millis(80)),
            ]
        );
    }
}
