//! Checkpoint pipeline coordination.
//!
//! Walks each checkpoint's transactions and events, decodes the
//! matching Cetus event payloads, applies the economic filter and
//! produces execution intents. Decode failures are counted and skipped
//! per event; nothing in here is fatal to the stream.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::stats::PipelineStats;
use copybot_core::{
    base_type, normalize_type_tag, Checkpoint, MoveFunction, SuiAddress, SwapEvent, SwapOrder,
};
use copybot_decode::{decode_pool_created, decode_swap};
use copybot_executor::sqrt_price_limit;
use copybot_filter::FilterRule;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Bound on the reconnect-overlap de-duplication window.
const RECENT_DIGEST_CAPACITY: usize = 4_096;

/// Bounded set of recently processed transaction digests.
///
/// A reconnect may redeliver checkpoints already seen; processing the
/// same transaction twice would double-trade. Insertion order is kept
/// so the oldest entry is evicted once the bound is reached.
struct RecentDigests {
    order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl RecentDigests {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns false when the digest was already present.
    fn insert(&mut self, digest: &str) -> bool {
        if self.seen.contains(digest) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        self.order.push_back(digest.to_string());
        self.seen.insert(digest.to_string());
        true
    }
}

/// Fixed per-trade parameters applied to every accepted event.
struct OrderTemplate {
    router: MoveFunction,
    global_config: SuiAddress,
    global_config_shared_version: u64,
    amount: u64,
    by_amount_in: bool,
    gas_budget: u64,
    gas_price_multiplier: f64,
}

/// Drives checkpoints through decode and filter, yielding orders.
pub struct PipelineCoordinator {
    rule: FilterRule,
    /// Target swap tags, normalized base types.
    swap_tags: Vec<String>,
    /// Pool creation tag, normalized base type.
    pool_created_tag: String,
    template: OrderTemplate,
    recent: RecentDigests,
    stats: PipelineStats,
}

impl PipelineCoordinator {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let router: MoveFunction = config
            .trade
            .router
            .parse()
            .map_err(|e| AppError::Config(format!("trade.router: {e}")))?;
        let global_config = SuiAddress::from_hex(&config.trade.global_config)
            .map_err(|e| AppError::Config(format!("trade.global_config: {e}")))?;

        Ok(Self {
            rule: FilterRule::new(&config.filter),
            swap_tags: config
                .events
                .swap_event_types
                .iter()
                .map(|t| normalize_type_tag(base_type(t)))
                .collect(),
            pool_created_tag: normalize_type_tag(base_type(&config.events.pool_created_event_type)),
            template: OrderTemplate {
                router,
                global_config,
                global_config_shared_version: config.trade.global_config_shared_version,
                amount: config.trade.amount,
                by_amount_in: config.trade.by_amount_in,
                gas_budget: config.trade.gas_budget,
                gas_price_multiplier: config.trade.gas_price_multiplier,
            },
            recent: RecentDigests::new(RECENT_DIGEST_CAPACITY),
            stats: PipelineStats::default(),
        })
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PipelineStats {
        &mut self.stats
    }

    /// Process one checkpoint, returning the accepted swaps with their
    /// execution intents. Transactions already seen (reconnect overlap)
    /// are skipped whole.
    pub fn process_checkpoint(&mut self, checkpoint: &Checkpoint) -> Vec<(SwapEvent, SwapOrder)> {
        self.stats.checkpoints += 1;
        let mut accepted = Vec::new();

        for tx in &checkpoint.transactions {
            self.stats.transactions += 1;

            if !self.recent.insert(tx.digest.as_str()) {
                debug!(digest = %tx.digest, "duplicate transaction, skipping");
                continue;
            }

            for event in &tx.events {
                let tag = normalize_type_tag(base_type(&event.event_type));

                if self.swap_tags.contains(&tag) {
                    self.stats.events_matched += 1;
                    match decode_swap(&event.payload) {
                        Ok(payload) => {
                            let swap = SwapEvent {
                                pool: payload.pool,
                                amount_in: payload.amount_in,
                                amount_out: payload.amount_out,
                                a_to_b: payload.a_to_b,
                                token_a: payload.token_a,
                                token_b: payload.token_b,
                                sender: event.sender,
                                tx_digest: tx.digest.clone(),
                                checkpoint_seq: checkpoint.sequence_number,
                                timestamp_ms: checkpoint.timestamp_ms,
                            };
                            if self.rule.should_act(&swap) {
                                self.stats.filter_accepted += 1;
                                info!(
                                    pool = %swap.pool,
                                    direction = swap.direction(),
                                    amount_in = swap.amount_in,
                                    amount_out = swap.amount_out,
                                    sender = %swap.sender,
                                    digest = %swap.tx_digest,
                                    "swap accepted"
                                );
                                let order = self.build_order(&swap);
                                accepted.push((swap, order));
                            }
                        }
                        Err(err) => {
                            self.stats.decode_failures += 1;
                            warn!(
                                digest = %tx.digest,
                                event_type = %event.event_type,
                                %err,
                                "swap payload decode failed"
                            );
                        }
                    }
                } else if tag == self.pool_created_tag {
                    match decode_pool_created(&event.event_type, &event.payload) {
                        Ok(pool) => {
                            self.stats.pools_seen += 1;
                            info!(
                                pool = %pool.pool,
                                coin_a = %pool.coin_type_a,
                                coin_b = %pool.coin_type_b,
                                tick_spacing = pool.tick_spacing,
                                "new pool created"
                            );
                        }
                        Err(err) => {
                            self.stats.decode_failures += 1;
                            warn!(digest = %tx.digest, %err, "pool creation decode failed");
                        }
                    }
                }
            }
        }

        accepted
    }

    /// Copy the observed swap's pool and direction into a fresh order
    /// with the configured funding amount.
    fn build_order(&self, swap: &SwapEvent) -> SwapOrder {
        SwapOrder {
            router: self.template.router.clone(),
            global_config: self.template.global_config,
            global_config_shared_version: self.template.global_config_shared_version,
            pool: swap.pool,
            pool_shared_version: None,
            token_a: swap.token_a.clone(),
            token_b: swap.token_b.clone(),
            a_to_b: swap.a_to_b,
            amount: self.template.amount,
            by_amount_in: self.template.by_amount_in,
            sqrt_price_limit: sqrt_price_limit(swap.a_to_b),
            gas_budget: self.template.gas_budget,
            gas_price_multiplier: self.template.gas_price_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamConfig;
    use copybot_core::{CheckpointTransaction, RawEvent, TransactionDigest, SUI_TYPE_TAG};
    use copybot_decode::BcsWriter;

    const USDC: &str =
        "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";

    fn test_config() -> AppConfig {
        AppConfig {
            mode: Default::default(),
            stream: StreamConfig {
                url: "wss://feed.test".into(),
                token: String::new(),
                reconnect_delay_ms: 5_000,
                max_reconnect_attempts: 0,
                channel_capacity: 16,
            },
            rpc: Default::default(),
            signer: None,
            filter: Default::default(),
            events: Default::default(),
            trade: Default::default(),
            shutdown: Default::default(),
        }
    }

    fn swap_payload(amount_in: u64, a_to_b: bool) -> Vec<u8> {
        let mut w = BcsWriter::new();
        w.write_address(&SuiAddress::from_hex("0xb8d7").unwrap())
            .write_u64_le(amount_in)
            .write_u64_le(123)
            .write_bool(a_to_b)
            .write_address(&SuiAddress::ZERO)
            .write_bool(false)
            .write_string(SUI_TYPE_TAG)
            .write_string(USDC);
        w.into_bytes()
    }

    fn checkpoint(digest: &str, events: Vec<RawEvent>) -> Checkpoint {
        Checkpoint {
            sequence_number: 100,
            digest: "cpdigest".into(),
            timestamp_ms: Some(1_700_000_000_000),
            transactions: vec![CheckpointTransaction {
                digest: TransactionDigest::new(digest),
                events,
            }],
        }
    }

    fn swap_event(amount_in: u64) -> RawEvent {
        RawEvent {
            event_type:
                "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb::pool::SwapEvent"
                    .into(),
            sender: SuiAddress::from_hex("0xcafe").unwrap(),
            payload: swap_payload(amount_in, true),
        }
    }

    #[test]
    fn large_swap_produces_one_order() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let orders = pipeline.process_checkpoint(&checkpoint("tx1", vec![swap_event(
            2_000_000_000_000,
        )]));

        assert_eq!(orders.len(), 1);
        let (event, order) = &orders[0];
        assert_eq!(event.amount_in, 2_000_000_000_000);
        assert_eq!(order.pool, event.pool);
        assert!(order.a_to_b);
        assert_eq!(order.amount, 100_000_000);
        assert_eq!(order.pool_shared_version, None);

        let stats = pipeline.stats();
        assert_eq!(stats.checkpoints, 1);
        assert_eq!(stats.events_matched, 1);
        assert_eq!(stats.filter_accepted, 1);
    }

    #[test]
    fn below_threshold_swap_is_filtered() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let orders =
            pipeline.process_checkpoint(&checkpoint("tx1", vec![swap_event(1_000_000_000)]));
        assert!(orders.is_empty());
        assert_eq!(pipeline.stats().events_matched, 1);
        assert_eq!(pipeline.stats().filter_accepted, 0);
    }

    #[test]
    fn duplicate_transaction_is_not_reprocessed() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let cp = checkpoint("tx1", vec![swap_event(2_000_000_000_000)]);

        assert_eq!(pipeline.process_checkpoint(&cp).len(), 1);
        // Reconnect overlap redelivers the same transaction.
        assert_eq!(pipeline.process_checkpoint(&cp).len(), 0);
        assert_eq!(pipeline.stats().filter_accepted, 1);
    }

    #[test]
    fn decode_failure_does_not_poison_siblings() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let bad = RawEvent {
            event_type:
                "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb::pool::SwapEvent"
                    .into(),
            sender: SuiAddress::ZERO,
            payload: vec![0u8; 10],
        };
        let orders = pipeline.process_checkpoint(&checkpoint(
            "tx1",
            vec![bad, swap_event(2_000_000_000_000)],
        ));

        assert_eq!(orders.len(), 1);
        assert_eq!(pipeline.stats().decode_failures, 1);
        assert_eq!(pipeline.stats().filter_accepted, 1);
    }

    #[test]
    fn unrelated_event_types_are_ignored() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let other = RawEvent {
            event_type: "0x3::staking_pool::StakeEvent".into(),
            sender: SuiAddress::ZERO,
            payload: vec![1, 2, 3],
        };
        let orders = pipeline.process_checkpoint(&checkpoint("tx1", vec![other]));
        assert!(orders.is_empty());
        assert_eq!(pipeline.stats().events_matched, 0);
        assert_eq!(pipeline.stats().decode_failures, 0);
    }

    #[test]
    fn pool_creation_is_counted() {
        let mut pipeline = PipelineCoordinator::new(&test_config()).unwrap();
        let mut w = BcsWriter::new();
        w.write_string("2::sui::SUI")
            .write_string("dba3::usdc::USDC")
            .write_address(&SuiAddress::from_hex("0xb8d7").unwrap())
            .write_u32_le(60);
        let event = RawEvent {
            event_type: format!(
                "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb::factory::CreatePoolEvent<{SUI_TYPE_TAG}, {USDC}>"
            ),
            sender: SuiAddress::ZERO,
            payload: w.into_bytes(),
        };
        let orders = pipeline.process_checkpoint(&checkpoint("tx1", vec![event]));
        assert!(orders.is_empty());
        assert_eq!(pipeline.stats().pools_seen, 1);
    }

    #[test]
    fn recent_digests_evict_oldest() {
        let mut recent = RecentDigests::new(2);
        assert!(recent.insert("a"));
        assert!(recent.insert("b"));
        assert!(!recent.insert("a"));
        assert!(recent.insert("c")); // evicts "a"
        assert!(recent.insert("a"));
        assert!(!recent.insert("c"));
    }
}
