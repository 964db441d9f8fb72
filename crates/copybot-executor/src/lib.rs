//! Swap execution for the Cetus copy-trade bot.
//!
//! Builds the programmable swap transaction for a `SwapOrder`, attaches
//! a priority gas bid, signs it through the `Signer` capability, and
//! submits it through the `Ledger` capability, classifying the result
//! as a `TradeOutcome`.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod rpc;
pub mod signer;
pub mod tx;

pub use engine::{ExecutionConfig, TradeExecutionEngine};
pub use error::{ExecutorError, ExecutorResult, LedgerError, LedgerResult};
pub use ledger::{DynLedger, Ledger, SubmitStatus};
pub use rpc::RpcLedger;
pub use signer::{Ed25519Signer, SignatureBundle, Signer, SIGNATURE_SCHEME_ED25519};
pub use tx::{
    sqrt_price_limit, Argument, CallInput, Command, TransactionBuilder, CLOCK_OBJECT_ID,
    MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64,
};
