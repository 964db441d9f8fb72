//! Stream error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    /// Transport-level failure: triggers the reconnect transition.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Credential rejected by the feed. Fatal: aborts before the
    /// Streaming state instead of reconnecting.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Connection handshake failed.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// A delivered frame could not be interpreted.
    #[error("Malformed frame: {0}")]
    Frame(String),

    /// The downstream consumer dropped its receiver.
    #[error("Delivery channel closed")]
    ChannelClosed,

    /// Reconnect policy exhausted its attempts.
    #[error("Reconnect attempts exhausted after {0} tries")]
    ReconnectExhausted(u32),

    #[error("WebSocket error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StreamError {
    /// Whether the stream should attempt to reconnect after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            StreamError::Unauthorized(_)
                | StreamError::ChannelClosed
                | StreamError::ReconnectExhausted(_)
        )
    }
}

pub type StreamResult<T> = Result<T, StreamError>;
