//! Trail buffer: accumulates pointer samples, ages and prunes them.
//!
//! Every `update` turns one raw pointer sample into at most one
//! [`TrailPoint`]. Points sit slightly behind the cursor (a smoothed offset
//! opposite the direction of travel) and are jittered in proportion to the
//! pointer speed. Points older than [`FADE_DURATION`] are dropped, and the
//! buffer never holds more than `trail_length` points.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::TrailConfig;

/// Hard prune window in seconds.
pub const FADE_DURATION: f64 = 0.5;
/// Speed (units per second) above which the pointer counts as moving.
pub const MOVEMENT_THRESHOLD: f32 = 1.0;
/// Speed at which jitter reaches its configured maximum.
pub const MAX_SPEED: f32 = 1000.0;
/// Distance the trail is biased behind the cursor.
pub const TRAIL_OFFSET: f32 = 3.0;
/// Exponential smoothing factor applied to the offset per update.
pub const OFFSET_SMOOTHING: f32 = 0.2;
/// Divisor floor for samples sharing a timestamp.
pub const MIN_ELAPSED: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Monotonic seconds.
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TrailBuffer {
    points: Vec<TrailPoint>,
    last_position: Vec2,
    /// `None` until the first sample primes the buffer.
    last_update_time: Option<f64>,
    smoothed_offset: Vec2,
    is_moving: bool,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points in chronological order, tail first.
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn smoothed_offset(&self) -> Vec2 {
        self.smoothed_offset
    }

    /// True once a sample has been seen since construction or the last `clear`.
    pub fn is_primed(&self) -> bool {
        self.last_update_time.is_some()
    }

    /// Feeds one pointer sample in viewport-local coordinates.
    ///
    /// The first call after construction or [`clear`](Self::clear) only
    /// records the position. Non-finite samples are ignored.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        raw_position: Vec2,
        now: f64,
        config: &TrailConfig,
        rng: &mut R,
    ) {
        if !raw_position.is_finite() || !now.is_finite() {
            trace!(?raw_position, now, "ignoring non-finite pointer sample");
            return;
        }

        if let Some(last_time) = self.last_update_time {
            let delta = raw_position - self.last_position;
            let distance = delta.length();
            let elapsed = (now - last_time).max(MIN_ELAPSED);
            let speed = (f64::from(distance) / elapsed) as f32;
            self.is_moving = speed > MOVEMENT_THRESHOLD;

            if self.is_moving {
                let direction = delta.normalize_or_zero();
                let target_offset = direction * -TRAIL_OFFSET;
                self.smoothed_offset = self.smoothed_offset.lerp(target_offset, OFFSET_SMOOTHING);

                let speed_factor = (speed / MAX_SPEED).clamp(0.0, 1.0);
                let jitter = jitter_offset(rng, config.trail_jitter * speed_factor);

                // Keep timestamps non-decreasing even if the host clock stutters.
                let timestamp = now.max(last_time);
                self.points.push(TrailPoint {
                    position: raw_position + self.smoothed_offset + jitter,
                    timestamp,
                });
            } else {
                self.smoothed_offset = self.smoothed_offset.lerp(Vec2::ZERO, OFFSET_SMOOTHING);
            }
        } else {
            self.is_moving = false;
        }

        self.last_position = raw_position;
        self.last_update_time = Some(self.last_update_time.map_or(now, |last| now.max(last)));

        self.prune(now);
        self.enforce_capacity(config.trail_length);
    }

    /// Empties the buffer and forgets the previous sample, so the next
    /// `update` only primes state again.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Removes every point with `now - timestamp >= FADE_DURATION`.
    fn prune(&mut self, now: f64) {
        let expired = self
            .points
            .partition_point(|point| now - point.timestamp >= FADE_DURATION);
        if expired > 0 {
            self.points.drain(..expired);
        }
    }

    /// Drops the oldest points until at most `capacity` remain.
    fn enforce_capacity(&mut self, capacity: usize) {
        if self.points.len() > capacity {
            let excess = self.points.len() - capacity;
            self.points.drain(..excess);
        }
    }
}

/// Independent uniform draw in `[-amount, amount)` per axis.
///
/// Scales a unit draw rather than building a range, so any finite amount
/// (even one whose doubled width overflows) stays finite.
fn jitter_offset<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> Vec2 {
    if amount > 0.0 && amount.is_finite() {
        let x = rng.gen::<f32>() * 2.0 - 1.0;
        let y = rng.gen::<f32>() * 2.0 - 1.0;
        Vec2::new(x, y) * amount
    } else {
        Vec2::ZERO
    }
}
