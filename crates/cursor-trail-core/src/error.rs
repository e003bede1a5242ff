//! Error types for loading and storing trail settings.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised by the configuration layer. The trail engine itself is total.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML settings: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("failed to encode settings as TOML: {0}")]
    SerializeToml(#[from] toml::ser::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// Only `.toml` and `.json` files are understood.
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
