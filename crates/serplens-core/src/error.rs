use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading snapshots or preparing an analysis.
///
/// Detector math itself is total and never fails; everything that can go
/// wrong happens at the input/config boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed keyword snapshot: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid category pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
