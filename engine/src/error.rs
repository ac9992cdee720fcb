//! Error handling for the Crop Advisory engine
//!
//! The surfaced taxonomy is deliberately small: callers of the
//! orchestrator can only ever see `InvalidInput` (their own malformed
//! fields) and `ModelUnavailable` (no trained artifact yet). Weather
//! failures are absorbed into the fallback observation, and the
//! remaining variants are training-time or plumbing errors.

use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Caller errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Training-time errors
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    // Inference-time, user-actionable: remediation is named in the message
    #[error(
        "No trained model found at {}. Run `advisory-train` to fit and persist a classifier first.",
        path.display()
    )]
    ModelUnavailable { path: PathBuf },

    // Internal to the weather provider; always absorbed into a
    // fallback observation, never returned to orchestrator callers.
    #[error("Weather provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<shared::ValidationError> for AppError {
    fn from(err: shared::ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
