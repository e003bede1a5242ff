//! Trail parameters and the persisted settings record.
//!
//! Settings are stored as TOML (or JSON, picked by file extension) through
//! serde. Values read from disk go through [`TrailConfig::clamped`] before
//! they reach the engine, so the buffer and renderer only ever see in-range
//! parameters.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color;
use crate::error::{ConfigError, Result};

pub const TRAIL_LENGTH_RANGE: RangeInclusive<usize> = 10..=500;
pub const TRAIL_WIDTH_RANGE: RangeInclusive<f32> = 1.0..=10.0;
pub const TRAIL_JITTER_RANGE: RangeInclusive<f32> = 0.0..=20.0;

/// Tunable trail parameters.
///
/// The gradient runs from `start_color` at the oldest point (tail) to
/// `end_color` at the newest point (head, under the cursor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub trail_length: usize,
    pub trail_width: f32,
    pub trail_jitter: f32,
    pub start_color: Vec4,
    pub end_color: Vec4,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            trail_length: 50,
            trail_width: 5.0,
            trail_jitter: 0.0,
            start_color: Vec4::new(0.0, 0.1, 1.0, 0.0),
            end_color: Vec4::new(1.0, 0.3, 0.0, 0.75),
        }
    }
}

impl TrailConfig {
    /// Returns a copy with every field forced into its valid range.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();

        let trail_length = self
            .trail_length
            .clamp(*TRAIL_LENGTH_RANGE.start(), *TRAIL_LENGTH_RANGE.end());
        if trail_length != self.trail_length {
            warn!(requested = self.trail_length, applied = trail_length, "trail_length out of range");
        }

        let trail_width = clamp_float("trail_width", self.trail_width, &TRAIL_WIDTH_RANGE, defaults.trail_width);
        let trail_jitter = clamp_float("trail_jitter", self.trail_jitter, &TRAIL_JITTER_RANGE, defaults.trail_jitter);

        let start_color = color::sanitize(self.start_color, defaults.start_color);
        if start_color != self.start_color {
            warn!(requested = ?self.start_color, applied = ?start_color, "start_color out of range");
        }
        let end_color = color::sanitize(self.end_color, defaults.end_color);
        if end_color != self.end_color {
            warn!(requested = ?self.end_color, applied = ?end_color, "end_color out of range");
        }

        Self {
            trail_length,
            trail_width,
            trail_jitter,
            start_color,
            end_color,
        }
    }
}

fn clamp_float(name: &str, value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    let applied = if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    };
    if applied != value {
        warn!(field = name, requested = value, applied, "trail parameter out of range");
    }
    applied
}

/// The host-side record: on/off state, the active parameters, and an optional
/// user-saved default that "reset" returns to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    pub enabled: bool,
    pub trail: TrailConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_default: Option<TrailConfig>,
}

impl TrailSettings {
    /// Restores the saved default (or the factory default) and turns the effect off.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.trail = self.saved_default.unwrap_or_default();
        debug!(saved = self.saved_default.is_some(), "trail settings reset");
    }

    /// Remembers the current parameters as the target of future resets.
    pub fn save_as_default(&mut self) {
        self.saved_default = Some(self.trail);
        debug!("current trail settings saved as default");
    }

    /// Clamps both the active and the saved parameters.
    pub fn clamped(self) -> Self {
        Self {
            enabled: self.enabled,
            trail: self.trail.clamped(),
            saved_default: self.saved_default.map(TrailConfig::clamped),
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self = toml::from_str(source)?;
        Ok(settings.clamped())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(source)?;
        Ok(settings.clamped())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads settings from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path)?;
        let source = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let settings = match format {
            SettingsFormat::Toml => Self::from_toml_str(&source)?,
            SettingsFormat::Json => Self::from_json_str(&source)?,
        };
        debug!(path = %path.display(), "loaded trail settings");
        Ok(settings)
    }

    /// Writes settings to a `.toml` or `.json` file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let encoded = match SettingsFormat::from_path(path)? {
            SettingsFormat::Toml => self.to_toml_string()?,
            SettingsFormat::Json => self.to_json_string()?,
        };
        fs::write(path, encoded).map_err(|e| ConfigError::io(path, e))?;
        debug!(path = %path.display(), "saved trail settings");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Toml,
    Json,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_factory_values() {
        let config = TrailConfig::default();
        assert_eq!(config.trail_length, 50);
        assert_eq!(config.trail_width, 5.0);
        assert_eq!(config.trail_jitter, 0.0);
        assert_eq!(config.clamped(), config);
    }

    #[test]
    fn clamped_forces_ranges() {
        let config = TrailConfig {
            trail_length: 5000,
            trail_width: 0.0,
            trail_jitter: f32::NAN,
            start_color: Vec4::new(2.0, -1.0, 0.5, 0.5),
            end_color: Vec4::ONE,
        }
        .clamped();
        assert_eq!(config.trail_length, 500);
        assert_eq!(config.trail_width, 1.0);
        assert_eq!(config.trail_jitter, 0.0);
        assert_eq!(config.start_color, Vec4::new(1.0, 0.0, 0.5, 0.5));
    }

    #[test]
    fn partial_toml_fills_defaults_and_clamps() {
        let settings = TrailSettings::from_toml_str(
            r#"
            enabled = true

            [trail]
            trail_length = 3
            trail_jitter = 4.5
            "#,
        )
        .unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.trail.trail_length, 10);
        assert_eq!(settings.trail.trail_jitter, 4.5);
        assert_eq!(settings.trail.trail_width, 5.0);
        assert!(settings.saved_default.is_none());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = TrailSettings::from_toml_str("enabled = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml(_)));
    }

    #[test]
    fn reset_prefers_saved_default() {
        let mut settings = TrailSettings {
            enabled: true,
            ..TrailSettings::default()
        };
        settings.trail.trail_jitter = 12.0;
        settings.save_as_default();
        settings.trail.trail_jitter = 1.0;

        settings.reset();
        assert!(!settings.enabled);
        assert_eq!(settings.trail.trail_jitter, 12.0);

        settings.saved_default = None;
        settings.reset();
        assert_eq!(settings.trail, TrailConfig::default());
    }

    #[test]
    fn toml_and_json_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = TrailSettings::default();
        settings.enabled = true;
        settings.trail.end_color = Vec4::new(0.2, 0.4, 0.6, 0.8);
        settings.save_as_default();

        for name in ["trail.toml", "trail.json"] {
            let path = dir.path().join(name);
            settings.save(&path).unwrap();
            assert_eq!(TrailSettings::load(&path).unwrap(), settings);
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = TrailSettings::default().save("trail.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TrailSettings::load("/definitely/not/here/trail.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/trail.toml"));
    }
}
