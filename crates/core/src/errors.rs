//! Error types for the decision engine.

use thiserror::Error;

/// Errors that can occur during inference or artifact handling.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or missing sample field
    #[error("invalid input: {0}")]
    Input(String),

    /// Model artifact missing, unreadable, or corrupt
    #[error("failed to load model artifact: {0}")]
    ArtifactLoad(String),

    /// Feature vector shape or order inconsistent with the artifact schema
    #[error("feature schema mismatch: {0}")]
    FeatureMismatch(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
