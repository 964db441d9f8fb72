//! Main application orchestration.
//!
//! Wires the checkpoint stream, pipeline coordinator and execution
//! engine together:
//! - stream task delivers checkpoints over a bounded channel
//! - the event loop decodes, filters and (in trade mode) spawns one
//!   submission task per accepted order
//! - ctrl-c cancels the stream, in-flight submissions get a grace
//!   period, final statistics are flushed

use crate::config::{AppConfig, OperatingMode};
use crate::error::{AppError, AppResult};
use crate::pipeline::PipelineCoordinator;
use crate::stats::PipelineStats;
use copybot_core::{SuiAddress, SwapEvent, TradeOutcome};
use copybot_executor::{
    DynLedger, Ed25519Signer, ExecutionConfig, RpcLedger, TradeExecutionEngine,
};
use copybot_stream::{
    BoxFuture, CheckpointStream, DynTransport, ReconnectPolicy, SubscribeRequest, WsConfig,
    WsTransport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Interval between periodic statistics summaries.
const STATS_INTERVAL: Duration = Duration::from_secs(60);

/// Ceiling for exponential reconnect backoff.
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Last gate before a trade is submitted.
///
/// Production wiring is `AutoConfirm`; the seam exists so a manual or
/// risk-checked confirmation can be dropped in without touching the
/// event loop.
pub trait TradeConfirmation: Send + Sync {
    fn confirm(&self, event: &SwapEvent) -> BoxFuture<'_, bool>;
}

/// Confirms every trade.
pub struct AutoConfirm;

impl TradeConfirmation for AutoConfirm {
    fn confirm(&self, _event: &SwapEvent) -> BoxFuture<'_, bool> {
        Box::pin(async { true })
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    confirmation: Arc<dyn TradeConfirmation>,
    shutdown: CancellationToken,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            confirmation: Arc::new(AutoConfirm),
            shutdown: CancellationToken::new(),
        })
    }

    /// Replace the confirmation gate.
    pub fn with_confirmation(mut self, confirmation: Arc<dyn TradeConfirmation>) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Token that stops the event loop when cancelled, same as ctrl-c.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run against the configured WebSocket feed and fullnode RPC.
    pub async fn run(self) -> AppResult<()> {
        let transport: DynTransport = Arc::new(WsTransport::new(WsConfig {
            url: self.config.stream.url.clone(),
            token: self.config.stream.token.clone(),
        }));
        let ledger: DynLedger = Arc::new(RpcLedger::new(self.config.rpc.url.clone()));

        self.run_with(transport, ledger).await?;
        Ok(())
    }

    fn reconnect_policy(&self) -> ReconnectPolicy {
        let delay = Duration::from_millis(self.config.stream.reconnect_delay_ms);
        match self.config.stream.max_reconnect_attempts {
            0 => ReconnectPolicy::FixedDelay { delay },
            max_attempts => ReconnectPolicy::ExponentialBackoff {
                base: delay,
                max: RECONNECT_MAX_DELAY,
                max_attempts,
            },
        }
    }

    fn build_engine(&self, ledger: DynLedger) -> AppResult<Option<Arc<TradeExecutionEngine>>> {
        if self.config.mode != OperatingMode::Trade {
            return Ok(None);
        }
        let signer_config = self
            .config
            .signer
            .as_ref()
            .ok_or_else(|| AppError::Config("Trade mode requires a [signer] section".into()))?;
        let address = SuiAddress::from_hex(&signer_config.address)
            .map_err(|e| AppError::Config(format!("signer.address: {e}")))?;
        let signer = Arc::new(Ed25519Signer::from_encoded(
            &signer_config.key_material()?,
            address,
        )?);
        Ok(Some(Arc::new(TradeExecutionEngine::new(
            signer,
            ledger,
            ExecutionConfig {
                dry_run_first: self.config.trade.dry_run_first,
            },
        ))))
    }

    /// Run the pipeline with explicit transport and ledger, returning
    /// the final counters. `run` is a thin wrapper over this.
    pub async fn run_with(
        self,
        transport: DynTransport,
        ledger: DynLedger,
    ) -> AppResult<PipelineStats> {
        info!(mode = ?self.config.mode, "starting application");

        let mut pipeline = PipelineCoordinator::new(&self.config)?;
        let engine = self.build_engine(ledger)?;

        let stream = Arc::new(CheckpointStream::new(
            transport,
            SubscribeRequest::for_events(),
            self.reconnect_policy(),
        ));
        let stream_shutdown = stream.shutdown_token();
        let (checkpoint_tx, mut checkpoint_rx) =
            mpsc::channel(self.config.stream.channel_capacity);

        let stream_task = {
            let stream = stream.clone();
            tokio::spawn(async move { stream.run(checkpoint_tx).await })
        };

        let mut submissions: JoinSet<TradeOutcome> = JoinSet::new();
        let mut stats_interval = tokio::time::interval(STATS_INTERVAL);
        stats_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately.
        stats_interval.tick().await;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    break;
                }

                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested");
                    break;
                }

                maybe_checkpoint = checkpoint_rx.recv() => {
                    match maybe_checkpoint {
                        Some(checkpoint) => {
                            for (event, order) in pipeline.process_checkpoint(&checkpoint) {
                                match &engine {
                                    Some(engine) => {
                                        if self.confirmation.confirm(&event).await {
                                            pipeline.stats_mut().trades_submitted += 1;
                                            let engine = engine.clone();
                                            submissions.spawn(async move {
                                                engine.execute(order).await
                                            });
                                        } else {
                                            pipeline.stats_mut().record_outcome(
                                                &TradeOutcome::Skipped {
                                                    reason: "not confirmed".into(),
                                                },
                                            );
                                        }
                                    }
                                    None => {
                                        info!(
                                            pool = %event.pool,
                                            digest = %event.tx_digest,
                                            "observe mode, trade not executed"
                                        );
                                    }
                                }
                            }
                        }
                        None => {
                            warn!("checkpoint stream ended");
                            break;
                        }
                    }
                }

                Some(result) = submissions.join_next(), if !submissions.is_empty() => {
                    record_submission(pipeline.stats_mut(), result);
                }

                _ = stats_interval.tick() => {
                    pipeline.stats().log_summary();
                }
            }
        }

        // Shutdown: stop the stream first so no new orders arrive, then
        // give in-flight submissions the configured grace period.
        stream_shutdown.cancel();

        let grace = Duration::from_millis(self.config.shutdown.grace_ms);
        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = submissions.join_next().await {
                record_submission(pipeline.stats_mut(), result);
            }
        })
        .await;
        if drained.is_err() {
            warn!(
                in_flight = submissions.len(),
                "grace period expired, abandoning in-flight submissions"
            );
            submissions.abort_all();
        }

        pipeline.stats().log_summary();

        match stream_task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(%err, "checkpoint stream terminated");
                return Err(err.into());
            }
            Err(err) => {
                error!(%err, "stream task panicked");
            }
        }

        Ok(*pipeline.stats())
    }
}

fn record_submission(
    stats: &mut PipelineStats,
    result: Result<TradeOutcome, tokio::task::JoinError>,
) {
    match result {
        Ok(outcome) => {
            match &outcome {
                TradeOutcome::Success { digest } => info!(%digest, "trade executed"),
                TradeOutcome::Failed { reason } => warn!(%reason, "trade failed"),
                TradeOutcome::Skipped { reason } => info!(%reason, "trade skipped"),
            }
            stats.record_outcome(&outcome);
        }
        Err(err) => {
            error!(%err, "submission task failed");
            stats.trades_failed += 1;
        }
    }
}
