//! Executor error types.

use thiserror::Error;

/// Errors from the ledger query/submission interface.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Ledger query failed: {0}")]
    QueryFailure(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors during trade execution. Always surfaced as a `TradeOutcome`,
/// never allowed to crash the pipeline.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Transaction build failed: {0}")]
    Build(String),

    #[error("Dry run rejected: {0}")]
    DryRunRejected(String),

    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
