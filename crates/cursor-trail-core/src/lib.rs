//! Cursor trail core engine: platform-agnostic logic for the trail buffer,
//! its time-decayed renderer, and the persisted trail settings.

pub mod buffer;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod render;

pub use buffer::{TrailBuffer, TrailPoint, FADE_DURATION};
pub use config::{TrailConfig, TrailSettings};
pub use engine::TrailEngine;
pub use error::{ConfigError, Result};
pub use render::{build, TrailMesh, TrailVertex, FADE_WINDOW};
