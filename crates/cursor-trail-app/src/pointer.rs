//! Scripted pointer used by the headless host.

use std::f64::consts::TAU;

use cursor_trail_platform::{PointerSample, PointerSource, Result, ViewportRect};
use glam::Vec2;
use tracing::info;

/// Length of one move-then-rest cycle, in seconds.
const CYCLE_SECONDS: f64 = 4.0;
/// Portion of each cycle the pointer holds still.
const REST_SECONDS: f64 = 1.0;

/// Traces a Lissajous figure across the viewport, pausing once per cycle so
/// the trail can fade out.
pub struct LissajousPointer {
    viewport: ViewportRect,
    running: bool,
    /// Figure time, frozen while resting.
    path_time: f64,
    last_now: Option<f64>,
}

impl LissajousPointer {
    pub fn new(viewport: ViewportRect) -> Self {
        Self {
            viewport,
            running: false,
            path_time: 0.0,
            last_now: None,
        }
    }

    fn position_at(&self, t: f64) -> Vec2 {
        let half = Vec2::new(self.viewport.width, self.viewport.height) * 0.5;
        let local = Vec2::new(
            (TAU * 0.5 * t).sin() as f32,
            (TAU * 0.75 * t + 0.5).sin() as f32,
        );
        self.viewport.origin() + half + local * half * 0.8
    }
}

impl PointerSource for LissajousPointer {
    fn start(&mut self) -> Result<()> {
        self.running = true;
        self.last_now = None;
        info!("synthetic pointer started");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        info!("synthetic pointer stopped");
        Ok(())
    }

    fn sample(&mut self, now: f64) -> Option<PointerSample> {
        if !self.running {
            return None;
        }
        let delta = self.last_now.map_or(0.0, |last| (now - last).max(0.0));
        self.last_now = Some(now);
        if now.rem_euclid(CYCLE_SECONDS) < CYCLE_SECONDS - REST_SECONDS {
            self.path_time += delta;
        }
        Some(PointerSample {
            position: self.position_at(self.path_time),
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_pointer_yields_nothing() {
        let mut pointer = LissajousPointer::new(ViewportRect::new(0.0, 0.0, 640.0, 480.0));
        assert!(pointer.sample(0.0).is_none());
        pointer.start().unwrap();
        assert!(pointer.sample(0.0).is_some());
        pointer.stop().unwrap();
        assert!(pointer.sample(0.1).is_none());
    }

    #[test]
    fn samples_stay_inside_viewport() {
        let viewport = ViewportRect::new(200.0, 100.0, 640.0, 480.0);
        let mut pointer = LissajousPointer::new(viewport);
        pointer.start().unwrap();
        for tick in 0..1000 {
            let sample = pointer.sample(tick as f64 * 0.016).unwrap();
            assert!(viewport.contains(sample.position), "{sample:?}");
        }
    }

    #[test]
    fn pointer_rests_at_end_of_cycle() {
        let mut pointer = LissajousPointer::new(ViewportRect::new(0.0, 0.0, 640.0, 480.0));
        pointer.start().unwrap();
        pointer.sample(3.0);
        let resting = pointer.sample(3.2).unwrap().position;
        assert_eq!(pointer.sample(3.5).unwrap().position, resting);
        assert_ne!(pointer.sample(4.2).unwrap().position, resting);
    }
}
