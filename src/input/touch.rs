//! Single-pointer touch tracking

use std::time::Instant;

use crate::shell::primitives::Point;

/// Raw pointer event from a backend (mouse button or first finger)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, time: Instant },
    Motion { position: Point, time: Instant },
    Up { position: Point, time: Instant },
    Cancel,
}

/// Touch point tracking
#[derive(Debug, Clone)]
pub struct TouchPoint {
    pub start_pos: Point,
    pub current_pos: Point,
    pub start_time: Instant,
    pub last_time: Instant,
    /// Last measured velocity in px/s
    pub velocity: Point,
    /// Largest distance from the start seen so far
    pub max_distance: f64,
}

impl TouchPoint {
    pub fn new(pos: Point, time: Instant) -> Self {
        Self {
            start_pos: pos,
            current_pos: pos,
            start_time: time,
            last_time: time,
            velocity: Point::default(),
            max_distance: 0.0,
        }
    }

    pub fn update(&mut self, pos: Point, time: Instant) {
        let dt = time.saturating_duration_since(self.last_time).as_secs_f64();

        if dt > 0.001 {
            self.velocity = Point::new(
                (pos.x - self.current_pos.x) / dt,
                (pos.y - self.current_pos.y) / dt,
            );
            self.last_time = time;
        }

        self.current_pos = pos;
        self.max_distance = self.max_distance.max(self.start_pos.distance_to(pos));
    }
}

/// A finished touch: where it started, where it ended and how it was moving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub start: Point,
    pub end: Point,
    pub velocity: Point,
    pub max_distance: f64,
}

/// Tracks one pointer at a time; extra pointers are not supported
#[derive(Debug, Default)]
pub struct TouchTracker {
    point: Option<TouchPoint>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new press restarts tracking, dropping any unfinished touch
    pub fn down(&mut self, pos: Point, time: Instant) {
        self.point = Some(TouchPoint::new(pos, time));
    }

    pub fn motion(&mut self, pos: Point, time: Instant) {
        if let Some(point) = self.point.as_mut() {
            point.update(pos, time);
        }
    }

    pub fn up(&mut self, pos: Point, time: Instant) -> Option<Release> {
        let mut point = self.point.take()?;
        point.update(pos, time);
        Some(Release {
            start: point.start_pos,
            end: point.current_pos,
            velocity: point.velocity,
            max_distance: point.max_distance,
        })
    }

    pub fn cancel(&mut self) {
        self.point = None;
    }
}
