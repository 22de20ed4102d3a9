//! Error types for the schedule engine.

use thiserror::Error;

/// Errors that can occur in schedule operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Account(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Serialization(err.to_string())
    }
}

/// Result type alias for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
