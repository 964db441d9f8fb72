//! Decoded Cetus event types.

use crate::types::{SuiAddress, TransactionDigest};
use serde::{Deserialize, Serialize};

/// A decoded Cetus pool swap.
///
/// Invariants: `token_a != token_b`; amounts are raw on-chain units
/// (MIST for SUI, 9 decimals).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEvent {
    /// Pool object the swap executed against.
    pub pool: SuiAddress,
    /// Input amount in raw units.
    pub amount_in: u64,
    /// Output amount in raw units.
    pub amount_out: u64,
    /// Swap direction: true = A -> B.
    pub a_to_b: bool,
    /// Coin type tag of side A.
    pub token_a: String,
    /// Coin type tag of side B.
    pub token_b: String,
    /// Original trader.
    pub sender: SuiAddress,
    /// Digest of the transaction that emitted the event.
    pub tx_digest: TransactionDigest,
    /// Sequence number of the containing checkpoint.
    pub checkpoint_seq: u64,
    /// Checkpoint timestamp, when available.
    pub timestamp_ms: Option<u64>,
}

impl SwapEvent {
    /// Human-readable direction label for logging.
    pub fn direction(&self) -> &'static str {
        if self.a_to_b {
            "A->B"
        } else {
            "B->A"
        }
    }
}

/// A decoded Cetus pool-creation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCreatedEvent {
    pub pool: SuiAddress,
    /// Coin type of side A, taken from the tag's generic arguments.
    pub coin_type_a: String,
    /// Coin type of side B, taken from the tag's generic arguments.
    pub coin_type_b: String,
    pub tick_spacing: u32,
}
