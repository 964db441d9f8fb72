//! Execution intent and outcome types.

use crate::error::{CoreError, Result};
use crate::types::SuiAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fully-qualified Move entry function, e.g.
/// `0xfbb3..b9c3::router::swap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveFunction {
    pub package: SuiAddress,
    pub module: String,
    pub function: String,
}

impl MoveFunction {
    pub fn new(package: SuiAddress, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
        }
    }
}

impl FromStr for MoveFunction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split("::");
        let (package, module, function) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(m), Some(f), None) if !m.is_empty() && !f.is_empty() => (p, m, f),
            _ => return Err(CoreError::InvalidMoveFunction(s.to_string())),
        };
        Ok(MoveFunction {
            package: SuiAddress::from_hex(package)
                .map_err(|_| CoreError::InvalidMoveFunction(s.to_string()))?,
            module: module.to_string(),
            function: function.to_string(),
        })
    }
}

impl TryFrom<String> for MoveFunction {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MoveFunction> for String {
    fn from(f: MoveFunction) -> String {
        f.to_string()
    }
}

impl fmt::Display for MoveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Execution intent for one copied swap.
///
/// Constructed fresh per trade decision and consumed by submission;
/// a given order must be submitted at most once.
#[derive(Debug, Clone)]
pub struct SwapOrder {
    /// Router swap entry point.
    pub router: MoveFunction,
    /// Cetus global config object.
    pub global_config: SuiAddress,
    /// Initial shared version of the global config object.
    pub global_config_shared_version: u64,
    /// Target pool.
    pub pool: SuiAddress,
    /// Initial shared version of the pool. Resolved by the execution
    /// engine from the ledger when absent.
    pub pool_shared_version: Option<u64>,
    pub token_a: String,
    pub token_b: String,
    /// Swap direction, same as the observed event.
    pub a_to_b: bool,
    /// Amount to swap, in raw input units.
    pub amount: u64,
    /// Whether `amount` denominates the input side.
    pub by_amount_in: bool,
    /// Slippage bound as a sqrt fixed-point price.
    pub sqrt_price_limit: u128,
    /// Gas budget ceiling in MIST.
    pub gas_budget: u64,
    /// Priority bid: gas price = reference price x this multiplier
    /// (floored at 2x the reference).
    pub gas_price_multiplier: f64,
}

/// Result of one trade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// Transaction executed with `success` status.
    Success { digest: String },
    /// Submission went through but the chain reported failure, or an
    /// execution step errored. Carries the raw detail.
    Failed { reason: String },
    /// Execution was not attempted (e.g. pool version unresolvable).
    Skipped { reason: String },
}

impl TradeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TradeOutcome::Success { .. })
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Success { digest } => write!(f, "success ({digest})"),
            TradeOutcome::Failed { reason } => write!(f, "failed: {reason}"),
            TradeOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_move_function() {
        let target =
            "0xfbb32ac0fa89a3cb0c56c745b688c6d2a53ac8e43447119ad822763997ffb9c3::router::swap";
        let f: MoveFunction = target.parse().unwrap();
        assert_eq!(f.module, "router");
        assert_eq!(f.function, "swap");
        assert_eq!(f.to_string(), target);
    }

    #[test]
    fn reject_malformed_targets() {
        assert!("0x2::coin".parse::<MoveFunction>().is_err());
        assert!("0x2::a::b::c".parse::<MoveFunction>().is_err());
        assert!("not-hex::a::b".parse::<MoveFunction>().is_err());
    }
}
