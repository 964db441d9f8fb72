//! WebSocket transport for the checkpoint feed.
//!
//! Protocol: after the TLS/WebSocket handshake the client sends one
//! subscribe frame carrying the auth token and read mask, then waits
//! for an ack before treating the connection as live. Every following
//! text frame is a JSON checkpoint. A rejected token surfaces as
//! `StreamError::Unauthorized` from `connect`, before the stream ever
//! enters the Streaming state.

use crate::error::{StreamError, StreamResult};
use crate::subscription::SubscribeRequest;
use crate::transport::{BoxFuture, CheckpointSource, CheckpointTransport};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use copybot_core::{Checkpoint, CheckpointTransaction, RawEvent, SuiAddress, TransactionDigest};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Deserializer, Serialize};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

/// WebSocket transport configuration.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Feed endpoint URL (wss://...).
    pub url: String,
    /// Auth token sent in the subscribe frame.
    pub token: String,
}

/// Checkpoint feed over a WebSocket connection.
pub struct WsTransport {
    config: WsConfig,
}

impl WsTransport {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }
}

impl CheckpointTransport for WsTransport {
    fn connect(&self, request: &SubscribeRequest) -> BoxFuture<'_, StreamResult<CheckpointSource>> {
        let subscribe = SubscribeFrame {
            token: self.config.token.clone(),
            subscribe: request.clone(),
        };
        Box::pin(async move {
            let (mut ws, _response) = connect_async(&self.config.url)
                .await
                .map_err(|e| StreamError::Handshake(e.to_string()))?;

            let payload = serde_json::to_string(&subscribe)?;
            ws.send(Message::Text(payload.into())).await?;

            // The ack must arrive before any checkpoint; a credential
            // rejection shows up here and is fatal.
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WireFrame>(&text)? {
                            WireFrame::Ack => break,
                            WireFrame::Error { message } => {
                                return Err(if is_auth_error(&message) {
                                    StreamError::Unauthorized(message)
                                } else {
                                    StreamError::TransportFailure(message)
                                });
                            }
                            WireFrame::Checkpoint { .. } => {
                                return Err(StreamError::Frame(
                                    "checkpoint before subscription ack".into(),
                                ));
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| f.reason.to_string())
                            .unwrap_or_else(|| "closed during subscribe".into());
                        return Err(if is_auth_error(&reason) {
                            StreamError::Unauthorized(reason)
                        } else {
                            StreamError::TransportFailure(reason)
                        });
                    }
                    Some(Ok(other)) => {
                        return Err(StreamError::Frame(format!(
                            "unexpected frame during subscribe: {other:?}"
                        )));
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        return Err(StreamError::TransportFailure(
                            "connection closed during subscribe".into(),
                        ));
                    }
                }
            }

            debug!(url = %self.config.url, "subscription acknowledged");

            let source = ws.filter_map(|message| async move {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<WireFrame>(&text) {
                        Ok(WireFrame::Checkpoint { checkpoint }) => {
                            Some(Ok(checkpoint.into_checkpoint()))
                        }
                        Ok(WireFrame::Ack) => None,
                        Ok(WireFrame::Error { message }) => {
                            Some(Err(StreamError::TransportFailure(message)))
                        }
                        Err(e) => {
                            // One malformed frame is not worth a
                            // reconnect cycle.
                            warn!(error = %e, "skipping malformed frame");
                            None
                        }
                    },
                    Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_)) => None,
                    Ok(Message::Close(frame)) => Some(Err(StreamError::TransportFailure(
                        frame
                            .map(|f| f.reason.to_string())
                            .unwrap_or_else(|| "connection closed".into()),
                    ))),
                    Ok(Message::Frame(_)) => None,
                    Err(e) => Some(Err(StreamError::TransportFailure(e.to_string()))),
                }
            });

            Ok(Box::pin(source) as CheckpointSource)
        })
    }
}

fn is_auth_error(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("unauthorized") || lower.contains("invalid token") || lower.contains("forbidden")
}

#[derive(Debug, Serialize)]
struct SubscribeFrame {
    token: String,
    subscribe: SubscribeRequest,
}

/// One frame from the feed.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireFrame {
    Ack,
    Error { message: String },
    Checkpoint { checkpoint: WireCheckpoint },
}

/// Checkpoint as delivered on the wire. Mirrors the gRPC response
/// shape: 64-bit integers may arrive as JSON strings.
#[derive(Debug, Deserialize)]
struct WireCheckpoint {
    #[serde(deserialize_with = "u64_lenient")]
    sequence_number: u64,
    #[serde(default)]
    digest: String,
    #[serde(default)]
    summary: Option<WireSummary>,
    #[serde(default)]
    transactions: Vec<WireTransaction>,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    #[serde(default, deserialize_with = "opt_u64_lenient")]
    timestamp_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireTransaction {
    digest: String,
    #[serde(default)]
    events: Option<WireEvents>,
}

#[derive(Debug, Deserialize)]
struct WireEvents {
    #[serde(default)]
    events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    event_type: String,
    sender: String,
    #[serde(default)]
    contents: Option<WireContents>,
}

#[derive(Debug, Deserialize)]
struct WireContents {
    /// Base64-encoded BCS payload.
    value: String,
}

impl WireCheckpoint {
    /// Convert to the domain record. Events that cannot be interpreted
    /// (bad sender address, undecodable payload encoding) are dropped
    /// individually with a warning; one bad event never discards its
    /// siblings.
    fn into_checkpoint(self) -> Checkpoint {
        let timestamp_ms = self.summary.and_then(|s| s.timestamp_ms);
        let transactions = self
            .transactions
            .into_iter()
            .map(|tx| {
                let events = tx
                    .events
                    .map(|e| e.events)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|event| {
                        let sender = match SuiAddress::from_hex(&event.sender) {
                            Ok(addr) => addr,
                            Err(e) => {
                                warn!(error = %e, "skipping event with bad sender");
                                return None;
                            }
                        };
                        let payload = match &event.contents {
                            Some(contents) => match BASE64.decode(&contents.value) {
                                Ok(bytes) => bytes,
                                Err(e) => {
                                    warn!(error = %e, "skipping event with bad payload encoding");
                                    return None;
                                }
                            },
                            None => Vec::new(),
                        };
                        Some(RawEvent {
                            event_type: event.event_type,
                            sender,
                            payload,
                        })
                    })
                    .collect();
                CheckpointTransaction {
                    digest: TransactionDigest::new(tx.digest),
                    events,
                }
            })
            .collect();

        Checkpoint {
            sequence_number: self.sequence_number,
            digest: self.digest,
            timestamp_ms,
            transactions,
        }
    }
}

fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Num(u64),
        Str(String),
    }
    match Lenient::deserialize(deserializer)? {
        Lenient::Num(n) => Ok(n),
        Lenient::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn opt_u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Num(u64),
        Str(String),
    }
    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Num(n)) => Ok(Some(n)),
        Some(Lenient::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
