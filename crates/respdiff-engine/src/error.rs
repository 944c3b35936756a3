//! Error types for the diff engine.

use crate::engine::Side;

/// Errors that can occur when configuring or running the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The supplied configuration is not usable.
    #[error("invalid diff configuration: {0}")]
    InvalidConfig(String),

    /// One side of the comparison exceeded the configured size threshold.
    #[error("{side} input is too large to diff: {bytes} bytes exceeds limit of {limit}")]
    InputTooLarge {
        side: Side,
        bytes: usize,
        limit: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
