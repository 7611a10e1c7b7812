//! The inspection screen
//!
//! - palette: the fixed test colors
//! - view: color/lock/icon state machine
//! - assets, layout, glyphs: the overlay icons
//! - scene, text, primitives: software rendering model for backends

pub mod assets;
pub mod glyphs;
pub mod layout;
pub mod palette;
pub mod primitives;
pub mod scene;
pub mod text;
pub mod view;
