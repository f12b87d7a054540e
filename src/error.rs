//! Error types for the transformation pipeline

use thiserror::Error;

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline operation errors
///
/// Input-shape problems are fatal: a malformed snapshot has no sensible
/// partial output. Missing optional values are not errors and never surface
/// here; they propagate as `None` through the derived entities.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Required source column absent or a mandatory value unparseable
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Benchmark harness error
    #[error("Benchmark error: {0}")]
    Bench(String),
}

impl From<tokio_postgres::Error> for PipelineError {
    fn from(err: tokio_postgres::Error) -> Self {
        PipelineError::Bench(err.to_string())
    }
}
