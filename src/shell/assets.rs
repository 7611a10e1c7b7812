//! Overlay icon assets
//!
//! Each overlay icon comes in a light and a dark rendering; the light set is
//! used on the black background only.

use serde::Serialize;

/// The overlay icons, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayIcon {
    Lock,
    Hint,
}

/// Rendering variant, picked by background luminance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconTone {
    Light,
    Dark,
}

impl IconTone {
    pub fn for_background(is_black: bool) -> Self {
        if is_black { IconTone::Light } else { IconTone::Dark }
    }
}

/// Logical image id shown by an icon surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "image", content = "tone", rename_all = "snake_case")]
pub enum IconAsset {
    LockOpen(IconTone),
    LockClosed(IconTone),
    Hint(IconTone),
}

impl IconAsset {
    pub fn lock(locked: bool, on_black: bool) -> Self {
        let tone = IconTone::for_background(on_black);
        if locked {
            IconAsset::LockClosed(tone)
        } else {
            IconAsset::LockOpen(tone)
        }
    }

    pub fn hint(on_black: bool) -> Self {
        IconAsset::Hint(IconTone::for_background(on_black))
    }

    pub fn tone(&self) -> IconTone {
        match *self {
            IconAsset::LockOpen(tone) | IconAsset::LockClosed(tone) | IconAsset::Hint(tone) => tone,
        }
    }

    /// Stable id, used in logs and state reports
    pub fn id(&self) -> &'static str {
        match self {
            IconAsset::LockOpen(IconTone::Light) => "lock-open-light",
            IconAsset::LockOpen(IconTone::Dark) => "lock-open-dark",
            IconAsset::LockClosed(IconTone::Light) => "lock-closed-light",
            IconAsset::LockClosed(IconTone::Dark) => "lock-closed-dark",
            IconAsset::Hint(IconTone::Light) => "hint-light",
            IconAsset::Hint(IconTone::Dark) => "hint-dark",
        }
    }
}
