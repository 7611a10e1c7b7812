//! Input handling - pointer tracking, gesture classification
//!
//! This module provides:
//! - Single-pointer touch tracking with release velocity
//! - Gesture classification (guard strips, color swipes, alert swipes)
//! - The shared pointer handler every backend feeds

mod gestures;
mod handler;
mod touch;

pub use gestures::*;
pub use handler::*;
pub use touch::*;
