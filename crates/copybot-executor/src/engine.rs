//! Trade execution engine.
//!
//! Turns an accepted `SwapOrder` into a signed, priority-bid
//! transaction and classifies the submission result. Every failure
//! path maps to a `TradeOutcome`; a bad trade attempt never takes the
//! monitoring pipeline down with it.

use crate::error::LedgerError;
use crate::ledger::DynLedger;
use crate::signer::Signer;
use crate::tx::build_swap;
use copybot_core::{SwapOrder, TradeOutcome};
use std::sync::Arc;
use tracing::{info, warn};

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Simulate each transaction before submitting it. Costs one extra
    /// round trip but catches router aborts without burning gas.
    pub dry_run_first: bool,
}

/// Builds, signs and submits swap transactions.
pub struct TradeExecutionEngine {
    signer: Arc<dyn Signer>,
    ledger: DynLedger,
    config: ExecutionConfig,
}

impl TradeExecutionEngine {
    pub fn new(signer: Arc<dyn Signer>, ledger: DynLedger, config: ExecutionConfig) -> Self {
        Self {
            signer,
            ledger,
            config,
        }
    }

    /// Priority gas bid: the reference price scaled by the multiplier,
    /// floored at double the reference so the bid always outranks
    /// default-priced transactions.
    pub fn priority_gas_price(reference: u64, multiplier: f64) -> u64 {
        let scaled = (reference as f64 * multiplier).ceil() as u64;
        scaled.max(reference.saturating_mul(2))
    }

    /// Execute one order. The order is consumed: constructing a fresh
    /// order per decision plus this move is what enforces at-most-once
    /// submission.
    pub async fn execute(&self, order: SwapOrder) -> TradeOutcome {
        let pool_version = match order.pool_shared_version {
            Some(version) => version,
            None => match self.ledger.object_version(&order.pool).await {
                Ok(Some(version)) => version,
                Ok(None) => {
                    // Never guess a version for a shared object.
                    warn!(pool = %order.pool, "pool has no shared version, skipping");
                    return TradeOutcome::Skipped {
                        reason: format!("pool {} has no shared version", order.pool),
                    };
                }
                Err(err) => {
                    return TradeOutcome::Failed {
                        reason: format!("pool version lookup failed: {err}"),
                    };
                }
            },
        };

        let reference = match self.ledger.reference_gas_price().await {
            Ok(price) => price,
            Err(err) => {
                return TradeOutcome::Failed {
                    reason: format!("reference gas price unavailable: {err}"),
                };
            }
        };
        let gas_price = Self::priority_gas_price(reference, order.gas_price_multiplier);

        let sender = self.signer.address();
        let tx = match build_swap(&order, sender, pool_version, gas_price) {
            Ok(tx) => tx,
            Err(err) => {
                return TradeOutcome::Failed {
                    reason: format!("build failed: {err}"),
                };
            }
        };
        let tx_bytes = tx.to_bytes();

        let signature = match self.signer.sign(&tx_bytes) {
            Ok(signature) => signature,
            Err(err) => {
                return TradeOutcome::Failed {
                    reason: format!("signing failed: {err}"),
                };
            }
        };

        if self.config.dry_run_first {
            match self.ledger.dry_run(&tx_bytes).await {
                Ok(status) if !status.is_success() => {
                    return TradeOutcome::Failed {
                        reason: format!("dry run rejected: {}", status.failure_reason()),
                    };
                }
                Ok(_) => {}
                Err(err) => {
                    return TradeOutcome::Failed {
                        reason: format!("dry run failed: {err}"),
                    };
                }
            }
        }

        info!(
            pool = %order.pool,
            amount = order.amount,
            a_to_b = order.a_to_b,
            gas_price,
            reference_gas_price = reference,
            "submitting swap"
        );

        match self.ledger.submit(&tx_bytes, &signature).await {
            Ok(status) if status.is_success() => {
                let digest = status.digest.unwrap_or_default();
                info!(digest = %digest, "swap executed");
                TradeOutcome::Success { digest }
            }
            Ok(status) => {
                // Surface the raw status detail, never swallow it.
                warn!(status = %status.status, "swap rejected by chain");
                TradeOutcome::Failed {
                    reason: status.failure_reason(),
                }
            }
            Err(LedgerError::ObjectNotFound(what)) => TradeOutcome::Skipped {
                reason: format!("object vanished before submission: {what}"),
            },
            Err(err) => TradeOutcome::Failed {
                reason: format!("submission failed: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::MockLedger;
    use crate::ledger::SubmitStatus;
    use crate::signer::Ed25519Signer;
    use crate::tx::sqrt_price_limit;
    use copybot_core::SuiAddress;

    fn test_signer() -> Arc<dyn Signer> {
        Arc::new(Ed25519Signer::new(&[1u8; 32], SuiAddress::ZERO))
    }

    fn order() -> SwapOrder {
        SwapOrder {
            router: "0xfbb32ac0fa89a3cb0c56c745b688c6d2a53ac8e43447119ad822763997ffb9c3::router::swap"
                .parse()
                .unwrap(),
            global_config: SuiAddress::from_hex("0xdaa4").unwrap(),
            global_config_shared_version: 1_574_190,
            pool: SuiAddress::from_hex("0xb8d7").unwrap(),
            pool_shared_version: None,
            token_a: "0x2::sui::SUI".into(),
            token_b: "0xdba3::usdc::USDC".into(),
            a_to_b: true,
            amount: 100_000_000,
            by_amount_in: true,
            sqrt_price_limit: sqrt_price_limit(true),
            gas_budget: 100_000_000,
            gas_price_multiplier: 2.0,
        }
    }

    #[test]
    fn priority_bid_is_at_least_double() {
        assert_eq!(TradeExecutionEngine::priority_gas_price(750, 2.0), 1500);
        // A low multiplier still gets floored at 2x.
        assert_eq!(TradeExecutionEngine::priority_gas_price(750, 1.0), 1500);
        assert_eq!(TradeExecutionEngine::priority_gas_price(750, 3.0), 2250);
    }

    #[tokio::test]
    async fn successful_submission() {
        let ledger = Arc::new(MockLedger::success());
        let engine = TradeExecutionEngine::new(
            test_signer(),
            ledger.clone(),
            ExecutionConfig::default(),
        );

        let outcome = engine.execute(order()).await;
        assert_eq!(
            outcome,
            TradeOutcome::Success {
                digest: "Hx7digest".into()
            }
        );
        assert_eq!(ledger.submission_count(), 1);
    }

    #[tokio::test]
    async fn missing_shared_version_skips() {
        let mut ledger = MockLedger::success();
        ledger.shared_version = None;
        let ledger = Arc::new(ledger);
        let engine = TradeExecutionEngine::new(
            test_signer(),
            ledger.clone(),
            ExecutionConfig::default(),
        );

        let outcome = engine.execute(order()).await;
        assert!(matches!(outcome, TradeOutcome::Skipped { .. }));
        assert_eq!(ledger.submission_count(), 0);
    }

    #[tokio::test]
    async fn chain_failure_reason_is_surfaced() {
        let mut ledger = MockLedger::success();
        ledger.submit_status = Ok(SubmitStatus {
            status: "failure".into(),
            digest: None,
            error: Some("MoveAbort(router::swap, 4)".into()),
        });
        let engine = TradeExecutionEngine::new(
            test_signer(),
            Arc::new(ledger),
            ExecutionConfig::default(),
        );

        let outcome = engine.execute(order()).await;
        let TradeOutcome::Failed { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("MoveAbort"));
    }

    #[tokio::test]
    async fn dry_run_rejection_blocks_submission() {
        let mut ledger = MockLedger::success();
        ledger.dry_run_status = SubmitStatus {
            status: "failure".into(),
            digest: None,
            error: Some("InsufficientGas".into()),
        };
        let ledger = Arc::new(ledger);
        let engine = TradeExecutionEngine::new(
            test_signer(),
            ledger.clone(),
            ExecutionConfig {
                dry_run_first: true,
            },
        );

        let outcome = engine.execute(order()).await;
        let TradeOutcome::Failed { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("dry run"));
        assert_eq!(ledger.submission_count(), 0);
    }

    #[tokio::test]
    async fn preresolved_version_avoids_lookup() {
        let mut ledger = MockLedger::success();
        // Lookup would fail, but the order carries its version.
        ledger.shared_version = None;
        let ledger = Arc::new(ledger);
        let engine = TradeExecutionEngine::new(
            test_signer(),
            ledger.clone(),
            ExecutionConfig::default(),
        );

        let mut order = order();
        order.pool_shared_version = Some(373_623_018);
        let outcome = engine.execute(order).await;
        assert!(outcome.is_success());
    }
}
