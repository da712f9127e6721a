//! Error types for Crucible CI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors: fatal, reported before any job instance exists
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid toggle value: {0:?} (expected ON or OFF)")]
    InvalidToggle(String),

    // Stage errors: scoped to one job instance, siblings are unaffected
    #[error("Stage {stage} failed with exit code {exit_code}")]
    StageFailed { stage: String, exit_code: i32 },

    #[error("Stage {stage} timed out after {seconds}s")]
    StageTimeout { stage: String, seconds: u64 },

    // Infrastructure errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
