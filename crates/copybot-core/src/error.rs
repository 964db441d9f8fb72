//! Error types for copybot-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Invalid Move function target: {0}")]
    InvalidMoveFunction(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
