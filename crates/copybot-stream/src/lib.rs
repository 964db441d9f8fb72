//! Checkpoint subscription stream for the Cetus copy-trade bot.
//!
//! Provides the long-lived push subscription to the checkpoint feed:
//! - `CheckpointTransport` trait decoupling the wire protocol from the
//!   consumer, with a WebSocket implementation
//! - Automatic reconnection with an injectable policy (fixed delay by
//!   default, exponential backoff available)
//! - Channel-based delivery to the pipeline
//! - Clean shutdown via `CancellationToken`, never reconnecting after
//!   an explicit cancellation

pub mod error;
pub mod stream;
pub mod subscription;
pub mod transport;
pub mod ws;

pub use error::{StreamError, StreamResult};
pub use stream::{CheckpointStream, ReconnectPolicy, StreamState};
pub use subscription::SubscribeRequest;
pub use transport::{BoxFuture, CheckpointSource, CheckpointTransport, DynTransport};
pub use ws::{WsConfig, WsTransport};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
