//! Error types shared across gazelog crates.

use std::path::PathBuf;

/// Top-level error type for gazelog operations.
#[derive(Debug, thiserror::Error)]
pub enum GazeError {
    #[error("Landmark error: {message}")]
    Landmarks { message: String },

    #[error("Recorder error: {message}")]
    Recorder { message: String },

    #[error("Screenshot error: {message}")]
    Screenshot { message: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Upload destination error: {message}")]
    Destination { message: String },

    #[error("Upload error: {message}")]
    Upload { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GazeError.
pub type GazeResult<T> = Result<T, GazeError>;

impl GazeError {
    pub fn landmarks(msg: impl Into<String>) -> Self {
        Self::Landmarks {
            message: msg.into(),
        }
    }

    pub fn recorder(msg: impl Into<String>) -> Self {
        Self::Recorder {
            message: msg.into(),
        }
    }

    pub fn screenshot(msg: impl Into<String>) -> Self {
        Self::Screenshot {
            message: msg.into(),
        }
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive {
            message: msg.into(),
        }
    }

    pub fn destination(msg: impl Into<String>) -> Self {
        Self::Destination {
            message: msg.into(),
        }
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
