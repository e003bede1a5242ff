//! Platform abstraction traits so `cursor-trail-core` stays host-agnostic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use cursor_trail_core::TrailMesh;
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Drawable area in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Converts a screen position into viewport-local coordinates.
    pub fn to_local(&self, screen: Vec2) -> Vec2 {
        screen - self.origin()
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        let local = self.to_local(screen);
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.width && local.y < self.height
    }
}

/// A timestamped pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: Vec2,
    pub timestamp: f64,
}

/// Source of pointer positions, polled on every timer tick.
pub trait PointerSource: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    /// Current pointer position, or `None` if the pointer is unavailable.
    fn sample(&mut self, now: f64) -> Option<PointerSample>;
}

/// Where finished trail meshes are drawn (line strip, alpha blending).
pub trait TrailSurface {
    fn viewport(&self) -> ViewportRect;
    fn draw_line_strip(&mut self, mesh: &TrailMesh, line_width: f32) -> Result<()>;
}

/// Monotonic seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock backed [`Clock`] counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-advanced [`Clock`] for deterministic runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            bits: AtomicU64::new(start.to_bits()),
        }
    }

    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + seconds).to_bits())
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}
