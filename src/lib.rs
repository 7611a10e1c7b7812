//! Flick spotcheck - solid color panel inspection
//!
//! Fills the screen with one color from a fixed palette so dead, stuck and
//! hot pixels stand out. Horizontal swipes change the color, vertical swipes
//! buzz and show a hint, taps toggle the overlay icons or the lock.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod shell;
pub mod state;
pub mod system;

pub use error::{Error, Result};
pub use state::Spotcheck;
