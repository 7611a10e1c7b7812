//! Host configuration
//!
//! Only describes the host: display geometry and which optional hardware to
//! drive. The palette, gesture thresholds and timings are fixed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::shell::primitives::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pixels per dp
    pub density: f64,
    /// Window size used by the windowed and headless backends
    pub width: u32,
    pub height: u32,
    /// Push the sysfs backlight to 100% while running (restored on exit)
    pub backlight_boost: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            density: 2.75,
            width: 1080,
            height: 2400,
            backlight_boost: false,
        }
    }
}

impl DisplayConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub haptics: HapticsConfig,
}

impl Config {
    /// `$XDG_CONFIG_HOME/flick-spotcheck/config.toml`, falling back to `~/.config`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok()
            .map(|dir| dir.join("flick-spotcheck").join("config.toml"))
    }

    /// Load config from file; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = Self::parse(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        if !(config.display.density.is_finite() && config.display.density > 0.0) {
            config.display.density = DisplayConfig::default().density;
        }
        Ok(config)
    }
}
