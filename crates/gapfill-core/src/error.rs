//! Error taxonomy for gapfill.
//!
//! Scoring itself is total and never produces these; they come from the
//! layers around it (gap-marker handling, configuration, parallel batches,
//! file I/O).

/// Gapfill errors.
#[derive(Debug, thiserror::Error)]
pub enum GapfillError {
    #[error("invalid gap text: {0}")]
    InvalidText(String),

    #[error("removal percent must be within 0-100, got {0}")]
    InvalidRemovalPercent(f64),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("evaluation task failed: {0}")]
    Task(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gapfill operations.
pub type Result<T> = std::result::Result<T, GapfillError>;
