//! Checkpoint stream state machine.
//!
//! Drives a `CheckpointTransport` through the
//! Connecting -> Streaming -> Reconnecting cycle, delivering
//! checkpoints over a bounded channel. Explicit cancellation moves the
//! stream to Closed and never triggers a reconnect.
//!
//! Ordering: checkpoints arrive in non-decreasing sequence order within
//! one connection only. A reconnect may introduce gaps or overlap;
//! downstream de-duplication tolerates both.

use crate::error::{StreamError, StreamResult};
use crate::subscription::SubscribeRequest;
use crate::transport::DynTransport;
use copybot_core::Checkpoint;
use futures_util::StreamExt;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reconnect behavior after a transport failure.
#[derive(Debug, Clone)]
pub enum ReconnectPolicy {
    /// Retry forever with a fixed delay between attempts. This is the
    /// observed production behavior; the default delay is 5 seconds.
    FixedDelay { delay: Duration },
    /// Exponential backoff with an optional attempt cap
    /// (0 = unlimited).
    ExponentialBackoff {
        base: Duration,
        max: Duration,
        max_attempts: u32,
    },
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None`
    /// when the policy gives up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self {
            ReconnectPolicy::FixedDelay { delay } => Some(*delay),
            ReconnectPolicy::ExponentialBackoff {
                base,
                max,
                max_attempts,
            } => {
                if *max_attempts != 0 && attempt > *max_attempts {
                    return None;
                }
                let exp = attempt.saturating_sub(1).min(20);
                let delay = base.saturating_mul(1u32 << exp);
                Some(delay.min(*max))
            }
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::FixedDelay {
            delay: Duration::from_secs(5),
        }
    }
}

/// Stream lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Streaming,
    Reconnecting,
    Closed,
}

/// Long-lived checkpoint subscription.
pub struct CheckpointStream {
    transport: DynTransport,
    request: SubscribeRequest,
    policy: ReconnectPolicy,
    state: Arc<RwLock<StreamState>>,
    shutdown: CancellationToken,
}

impl CheckpointStream {
    pub fn new(transport: DynTransport, request: SubscribeRequest, policy: ReconnectPolicy) -> Self {
        Self {
            transport,
            request,
            policy,
            state: Arc::new(RwLock::new(StreamState::Connecting)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        *self.state.read()
    }

    /// Token that closes the stream when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn set_state(&self, state: StreamState) {
        *self.state.write() = state;
        debug!(?state, "stream state changed");
    }

    /// Run the subscription until cancellation or a fatal error.
    ///
    /// Delivers checkpoints into `tx` in arrival order. Transport
    /// errors re-enter Connecting after the policy delay, re-issuing
    /// the identical subscription request; cancellation transitions
    /// directly to Closed.
    pub async fn run(&self, tx: mpsc::Sender<Checkpoint>) -> StreamResult<()> {
        let mut attempt: u32 = 0;

        loop {
            if self.shutdown.is_cancelled() {
                self.set_state(StreamState::Closed);
                return Ok(());
            }

            self.set_state(if attempt == 0 {
                StreamState::Connecting
            } else {
                StreamState::Reconnecting
            });

            let connected = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.set_state(StreamState::Closed);
                    return Ok(());
                }
                res = self.transport.connect(&self.request) => res,
            };

            match connected {
                Ok(mut source) => {
                    self.set_state(StreamState::Streaming);
                    attempt = 0;
                    info!("checkpoint stream connected");

                    loop {
                        tokio::select! {
                            _ = self.shutdown.cancelled() => {
                                self.set_state(StreamState::Closed);
                                info!("checkpoint stream cancelled");
                                return Ok(());
                            }
                            item = source.next() => match item {
                                Some(Ok(checkpoint)) => {
                                    let seq = checkpoint.sequence_number;
                                    if tx.send(checkpoint).await.is_err() {
                                        self.set_state(StreamState::Closed);
                                        if self.shutdown.is_cancelled() {
                                            return Ok(());
                                        }
                                        return Err(StreamError::ChannelClosed);
                                    }
                                    debug!(seq, "checkpoint delivered");
                                }
                                Some(Err(err)) if !err.is_recoverable() => {
                                    self.set_state(StreamState::Closed);
                                    return Err(err);
                                }
                                Some(Err(err)) => {
                                    warn!(error = %err, "stream error, will reconnect");
                                    break;
                                }
                                None => {
                                    warn!("stream ended by transport, will reconnect");
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(err) if !err.is_recoverable() => {
                    self.set_state(StreamState::Closed);
                    return Err(err);
                }
                Err(err) => {
                    warn!(error = %err, "connect failed");
                }
            }

            attempt += 1;
            let Some(delay) = self.policy.delay_for(attempt) else {
                self.set_state(StreamState::Closed);
                return Err(StreamError::ReconnectExhausted(attempt));
            };

            self.set_state(StreamState::Reconnecting);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.set_state(StreamState::Closed);
                    return Ok(());
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
