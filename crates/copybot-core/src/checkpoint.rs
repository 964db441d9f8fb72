//! Checkpoint stream records.
//!
//! A checkpoint is a batch of finalized transactions at a ledger
//! sequence number. These records are created by the stream transport,
//! consumed within one pipeline pass, and discarded.

use crate::types::{SuiAddress, TransactionDigest};
use serde::{Deserialize, Serialize};

/// A finalized checkpoint delivered by the subscription feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Ledger sequence number. Non-decreasing within a single
    /// connection; gaps or overlap are possible across a reconnect.
    pub sequence_number: u64,
    /// Checkpoint digest (base58 wire form).
    pub digest: String,
    /// Checkpoint timestamp in unix milliseconds, when requested in the
    /// read mask.
    pub timestamp_ms: Option<u64>,
    /// Transactions in checkpoint order.
    pub transactions: Vec<CheckpointTransaction>,
}

/// A transaction embedded in a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointTransaction {
    pub digest: TransactionDigest,
    /// Emitted events in execution order.
    pub events: Vec<RawEvent>,
}

/// An undecoded on-chain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Fully-qualified Move type tag, possibly with generic arguments.
    pub event_type: String,
    /// Address that sent the emitting transaction.
    pub sender: SuiAddress,
    /// BCS-encoded event contents, opaque until decoded.
    pub payload: Vec<u8>,
}
