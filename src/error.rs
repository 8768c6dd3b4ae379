//! Error types for the collaborator boundaries
//!
//! None of these ever cross into the per-frame update: callers log them and
//! fall back to a degraded value.

use thiserror::Error;

/// Failure to produce an image
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read {name}: {message}")]
    Io { name: String, message: String },
    #[error("asset {0} is missing")]
    Missing(String),
}

/// Failure talking to the score store
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score storage unavailable: {0}")]
    Unavailable(String),
    #[error("score storage error: {0}")]
    Storage(String),
    #[error("score data malformed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
