//! Per-viewport trail engine tying the buffer, renderer and parameters together.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::buffer::TrailBuffer;
use crate::config::{TrailConfig, TrailSettings};
use crate::render::{self, TrailMesh};

/// One trail effect instance. Hosts create one per active viewport and drive
/// it from their own event and redraw loop.
///
/// The random source feeding the jitter is injected so runs can be replayed.
pub struct TrailEngine<R = ChaCha8Rng> {
    config: TrailConfig,
    buffer: TrailBuffer,
    enabled: bool,
    rng: R,
}

impl TrailEngine<ChaCha8Rng> {
    /// Disabled engine with an entropy-seeded random source.
    pub fn new(config: TrailConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Disabled engine whose jitter is reproducible from `seed`.
    pub fn seeded(config: TrailConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Engine configured from a settings record, enabled if the record says so.
    pub fn from_settings(settings: &TrailSettings, seed: Option<u64>) -> Self {
        let mut engine = match seed {
            Some(seed) => Self::seeded(settings.trail, seed),
            None => Self::new(settings.trail),
        };
        if settings.enabled {
            engine.enable();
        }
        engine
    }
}

impl<R: Rng> TrailEngine<R> {
    pub fn with_rng(config: TrailConfig, rng: R) -> Self {
        Self {
            config: config.clamped(),
            buffer: TrailBuffer::new(),
            enabled: false,
            rng,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn buffer(&self) -> &TrailBuffer {
        &self.buffer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Line width the host should draw the mesh with.
    pub fn line_width(&self) -> f32 {
        self.config.trail_width
    }

    /// Replaces the parameters. A shorter `trail_length` applies on the next sample.
    pub fn set_config(&mut self, config: TrailConfig) {
        self.config = config.clamped();
        debug!(config = ?self.config, "trail config updated");
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            info!("cursor trail enabled");
        }
    }

    /// Stops the effect and drops every buffered point before returning.
    pub fn disable(&mut self) {
        self.buffer.clear();
        if self.enabled {
            self.enabled = false;
            info!("cursor trail disabled");
        }
    }

    /// Empties the trail without changing the enabled state.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Pointer sample in viewport-local coordinates, `now` in monotonic seconds.
    pub fn on_sample(&mut self, position: Vec2, now: f64) {
        if !self.enabled {
            return;
        }
        self.buffer.update(position, now, &self.config, &mut self.rng);
        trace!(points = self.buffer.len(), moving = self.buffer.is_moving(), "trail sample");
    }

    /// Mesh to draw for the frame at `now`; empty while disabled.
    pub fn on_redraw(&self, now: f64) -> TrailMesh {
        if !self.enabled {
            return TrailMesh::default();
        }
        render::build(
            self.buffer.points(),
            now,
            self.config.start_color,
            self.config.end_color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_engine() -> TrailEngine {
        let mut engine = TrailEngine::seeded(TrailConfig::default(), 17);
        engine.enable();
        engine.on_sample(Vec2::ZERO, 0.0);
        for step in 1..=5 {
            engine.on_sample(Vec2::new(step as f32 * 20.0, 0.0), step as f64 * 0.02);
        }
        engine
    }

    #[test]
    fn starts_disabled_and_ignores_samples() {
        let mut engine = TrailEngine::seeded(TrailConfig::default(), 1);
        engine.on_sample(Vec2::ZERO, 0.0);
        engine.on_sample(Vec2::new(100.0, 0.0), 0.1);
        assert!(!engine.is_enabled());
        assert!(!engine.buffer().is_primed());
        assert!(engine.on_redraw(0.1).is_empty());
    }

    #[test]
    fn enabled_engine_renders_trail() {
        let engine = moving_engine();
        assert_eq!(engine.buffer().len(), 5);
        let mesh = engine.on_redraw(0.1);
        assert_eq!(mesh.len(), 5);
        assert_eq!(mesh.colors.len(), 5);
    }

    #[test]
    fn disable_clears_before_next_frame() {
        let mut engine = moving_engine();
        engine.disable();
        assert!(engine.buffer().is_empty());
        assert!(engine.on_redraw(0.1).is_empty());

        // Re-enabling starts from a fresh priming sample.
        engine.enable();
        engine.on_sample(Vec2::new(1000.0, 0.0), 0.12);
        assert!(engine.buffer().is_empty());
    }

    #[test]
    fn same_seed_same_jitter() {
        let config = TrailConfig {
            trail_jitter: 15.0,
            ..TrailConfig::default()
        };
        let run = |seed| {
            let mut engine = TrailEngine::seeded(config, seed);
            engine.enable();
            engine.on_sample(Vec2::ZERO, 0.0);
            for step in 1..=8 {
                engine.on_sample(Vec2::new(step as f32 * 30.0, step as f32 * 5.0), step as f64 * 0.016);
            }
            engine.buffer().points().to_vec()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    #[test]
    fn set_config_clamps_and_shrinks_on_next_sample() {
        let mut engine = TrailEngine::seeded(TrailConfig::default(), 2);
        engine.enable();
        engine.on_sample(Vec2::ZERO, 0.0);
        for step in 1..=30 {
            engine.on_sample(Vec2::new(step as f32 * 10.0, 0.0), step as f64 * 0.01);
        }
        assert_eq!(engine.buffer().len(), 30);

        engine.set_config(TrailConfig {
            trail_length: 1,
            trail_width: 50.0,
            ..TrailConfig::default()
        });
        assert_eq!(engine.config().trail_length, 10);
        assert_eq!(engine.line_width(), 10.0);

        engine.on_sample(Vec2::new(320.0, 0.0), 0.32);
        assert_eq!(engine.buffer().len(), 10);
    }

    #[test]
    fn from_settings_honours_enabled_flag() {
        let settings = TrailSettings {
            enabled: true,
            ..TrailSettings::default()
        };
        assert!(TrailEngine::from_settings(&settings, Some(4)).is_enabled());
        assert!(!TrailEngine::from_settings(&TrailSettings::default(), None).is_enabled());
    }
}
