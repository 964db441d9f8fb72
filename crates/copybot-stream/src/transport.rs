//! Transport trait for the checkpoint feed.
//!
//! Abstracting the wire protocol behind a trait allows:
//! - Dependency injection for testing the reconnect state machine
//! - Different transport backends behind the same subscription API

use crate::error::StreamResult;
use crate::subscription::SubscribeRequest;
use copybot_core::Checkpoint;
use futures_util::stream::BoxStream;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// A live connection delivering checkpoints until it errors or ends.
pub type CheckpointSource = BoxStream<'static, StreamResult<Checkpoint>>;

/// A connectable checkpoint feed.
///
/// `connect` performs the handshake and issues the subscription
/// request; the returned source yields checkpoints until the transport
/// fails. Each reconnect attempt calls `connect` again with the
/// identical request.
pub trait CheckpointTransport: Send + Sync {
    fn connect(&self, request: &SubscribeRequest) -> BoxFuture<'_, StreamResult<CheckpointSource>>;
}

/// Arc wrapper for transport trait objects.
pub type DynTransport = Arc<dyn CheckpointTransport>;

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::StreamError;
    use futures_util::stream;
    use futures_util::StreamExt;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted outcome for one `connect` call.
    pub enum ConnectScript {
        /// Fail the connect itself.
        Fail(StreamError),
        /// Deliver these items, then end the stream (transport loss).
        DeliverThenEnd(Vec<StreamResult<Checkpoint>>),
        /// Deliver these items, then stay connected without yielding.
        DeliverThenPending(Vec<StreamResult<Checkpoint>>),
    }

    /// Mock transport replaying a script of connect outcomes.
    pub struct MockTransport {
        script: Mutex<Vec<ConnectScript>>,
        pub connects: AtomicUsize,
    }

    impl MockTransport {
        pub fn new(script: Vec<ConnectScript>) -> Self {
            Self {
                script: Mutex::new(script),
                connects: AtomicUsize::new(0),
            }
        }

        pub fn connect_count(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
    }

    impl CheckpointTransport for MockTransport {
        fn connect(
            &self,
            _request: &SubscribeRequest,
        ) -> BoxFuture<'_, StreamResult<CheckpointSource>> {
            Box::pin(async move {
                self.connects.fetch_add(1, Ordering::SeqCst);
                let mut script = self.script.lock();
                if script.is_empty() {
                    // Script exhausted: behave like a dead endpoint.
                    return Err(StreamError::TransportFailure("script exhausted".into()));
                }
                match script.remove(0) {
                    ConnectScript::Fail(err) => Err(err),
                    ConnectScript::DeliverThenEnd(items) => {
                        Ok(Box::pin(stream::iter(items)) as CheckpointSource)
                    }
                    ConnectScript::DeliverThenPending(items) => Ok(Box::pin(
                        stream::iter(items).chain(stream::pending()),
                    )
                        as CheckpointSource),
                }
            })
        }
    }
}
