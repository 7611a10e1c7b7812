//! Backend implementations for spotcheck
//!
//! - `headless`: Scripted replay with no display - for checks and CI
//! - `sdl`: Fullscreen SDL window - for phones and desktops

pub mod headless;

#[cfg(feature = "sdl")]
pub mod sdl;
