//! Ledger access capability.
//!
//! The query service and submission interface live behind this trait so
//! the engine can be exercised against a recording mock.

use crate::error::LedgerResult;
use crate::signer::SignatureBundle;
use copybot_core::SuiAddress;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Status returned by submission (and dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStatus {
    /// Raw status string, `"success"` on success.
    pub status: String,
    /// Transaction digest when available.
    pub digest: Option<String>,
    /// Raw failure detail when the chain reported one.
    pub error: Option<String>,
}

impl SubmitStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The failure detail, falling back to the raw status.
    pub fn failure_reason(&self) -> String {
        self.error.clone().unwrap_or_else(|| self.status.clone())
    }
}

/// Ledger query and submission interface.
pub trait Ledger: Send + Sync {
    /// Initial shared version of a shared object, or `None` when the
    /// object does not exist or is not shared.
    fn object_version(&self, id: &SuiAddress) -> BoxFuture<'_, LedgerResult<Option<u64>>>;

    /// Current network reference gas price.
    fn reference_gas_price(&self) -> BoxFuture<'_, LedgerResult<u64>>;

    /// Simulate a transaction without submitting it.
    fn dry_run(&self, tx_bytes: &[u8]) -> BoxFuture<'_, LedgerResult<SubmitStatus>>;

    /// Submit a signed transaction and wait for its status.
    fn submit(
        &self,
        tx_bytes: &[u8],
        signature: &SignatureBundle,
    ) -> BoxFuture<'_, LedgerResult<SubmitStatus>>;
}

/// Arc wrapper for ledger trait objects.
pub type DynLedger = Arc<dyn Ledger>;
