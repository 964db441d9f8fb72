//! Pipeline counters.

use copybot_core::TradeOutcome;
use tracing::info;

/// Plain value accumulator owned by the pipeline coordinator. All
/// updates happen on the event-loop task, so no atomics are needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub checkpoints: u64,
    pub transactions: u64,
    /// Events whose type tag matched a target swap tag.
    pub events_matched: u64,
    /// Matched events whose payload failed to decode.
    pub decode_failures: u64,
    pub filter_accepted: u64,
    pub trades_submitted: u64,
    pub trades_succeeded: u64,
    pub trades_failed: u64,
    pub trades_skipped: u64,
    /// Pool creation events observed.
    pub pools_seen: u64,
}

impl PipelineStats {
    pub fn record_outcome(&mut self, outcome: &TradeOutcome) {
        match outcome {
            TradeOutcome::Success { .. } => self.trades_succeeded += 1,
            TradeOutcome::Failed { .. } => self.trades_failed += 1,
            TradeOutcome::Skipped { .. } => self.trades_skipped += 1,
        }
    }

    pub fn log_summary(&self) {
        info!(
            checkpoints = self.checkpoints,
            transactions = self.transactions,
            events_matched = self.events_matched,
            decode_failures = self.decode_failures,
            filter_accepted = self.filter_accepted,
            trades_submitted = self.trades_submitted,
            trades_succeeded = self.trades_succeeded,
            trades_failed = self.trades_failed,
            trades_skipped = self.trades_skipped,
            pools_seen = self.pools_seen,
            "pipeline statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_recording() {
        let mut stats = PipelineStats::default();
        stats.record_outcome(&TradeOutcome::Success {
            digest: "d".into(),
        });
        stats.record_outcome(&TradeOutcome::Failed {
            reason: "r".into(),
        });
        stats.record_outcome(&TradeOutcome::Skipped {
            reason: "r".into(),
        });
        stats.record_outcome(&TradeOutcome::Success {
            digest: "d2".into(),
        });
        assert_eq!(stats.trades_succeeded, 2);
        assert_eq!(stats.trades_failed, 1);
        assert_eq!(stats.trades_skipped, 1);
    }
}
