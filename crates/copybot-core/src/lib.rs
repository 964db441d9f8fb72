//! Core domain types for the Cetus copy-trade bot.
//!
//! This crate provides the fundamental types used throughout the pipeline:
//! - `SuiAddress`, `TransactionDigest`: chain identifiers
//! - `Checkpoint`, `CheckpointTransaction`, `RawEvent`: stream records
//! - `SwapEvent`, `PoolCreatedEvent`: decoded Cetus events
//! - `SwapOrder`, `TradeOutcome`: execution intent and result
//! - Type-tag utilities for Move event type strings

pub mod checkpoint;
pub mod error;
pub mod event;
pub mod order;
pub mod type_tag;
pub mod types;

pub use checkpoint::{Checkpoint, CheckpointTransaction, RawEvent};
pub use error::{CoreError, Result};
pub use event::{PoolCreatedEvent, SwapEvent};
pub use order::{MoveFunction, SwapOrder, TradeOutcome};
pub use type_tag::{base_type, extract_type_arguments, normalize_type_tag};
pub use types::{SuiAddress, TransactionDigest, SUI_TYPE_TAG};
