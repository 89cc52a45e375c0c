use thiserror::Error;

/// Errors returned by the training pipeline. All are fatal: the trainer
/// never proceeds on a degraded dataset.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// A required column is absent after header normalization
    #[error("dataset schema error: {0}")]
    Schema(String),

    /// Too few usable rows, or only one class present
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Grid or fold configuration incompatible with the available data
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Malformed cell value or row shape
    #[error("dataset parse error: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact persistence error
    #[error(transparent)]
    Core(#[from] waterwise_core::CoreError),
}

/// Result type for trainer operations
pub type Result<T> = std::result::Result<T, TrainerError>;
