//! JSON-RPC ledger backend.
//!
//! Talks to a Sui fullnode over HTTP. Response shapes are parsed
//! leniently where the node is known to vary (u64 fields arrive as
//! strings or numbers depending on the endpoint).

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{BoxFuture, Ledger, SubmitStatus};
use crate::signer::SignatureBundle;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use copybot_core::SuiAddress;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Ledger backed by a fullnode JSON-RPC endpoint.
pub struct RpcLedger {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcLedger {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc call");

        let response: Value = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.get("error") {
            return Err(LedgerError::Rpc {
                code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| LedgerError::MalformedResponse(format!("{method}: no result field")))
    }
}

impl Ledger for RpcLedger {
    fn object_version(&self, id: &SuiAddress) -> BoxFuture<'_, LedgerResult<Option<u64>>> {
        let id = *id;
        Box::pin(async move {
            let result = self
                .call(
                    "sui_getObject",
                    json!([id.to_string(), { "showOwner": true }]),
                )
                .await?;
            Ok(parse_shared_version(&result))
        })
    }

    fn reference_gas_price(&self) -> BoxFuture<'_, LedgerResult<u64>> {
        Box::pin(async move {
            let result = self.call("suix_getReferenceGasPrice", json!([])).await?;
            parse_u64(&result).ok_or_else(|| {
                LedgerError::MalformedResponse(format!("gas price not a u64: {result}"))
            })
        })
    }

    fn dry_run(&self, tx_bytes: &[u8]) -> BoxFuture<'_, LedgerResult<SubmitStatus>> {
        let encoded = BASE64.encode(tx_bytes);
        Box::pin(async move {
            let result = self
                .call("sui_dryRunTransactionBlock", json!([encoded]))
                .await?;
            parse_submit_status(&result)
        })
    }

    fn submit(
        &self,
        tx_bytes: &[u8],
        signature: &SignatureBundle,
    ) -> BoxFuture<'_, LedgerResult<SubmitStatus>> {
        let encoded_tx = BASE64.encode(tx_bytes);
        let encoded_sig = BASE64.encode(signature.to_wire_bytes());
        Box::pin(async move {
            let result = self
                .call(
                    "sui_executeTransactionBlock",
                    json!([
                        encoded_tx,
                        [encoded_sig],
                        { "showEffects": true },
                        "WaitForLocalExecution",
                    ]),
                )
                .await?;
            parse_submit_status(&result)
        })
    }
}

/// Accept both JSON numbers and decimal strings. Several fullnode
/// endpoints serialize u64 values as strings.
fn parse_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Pull `owner.Shared.initial_shared_version` out of a getObject
/// response. Missing or non-shared objects map to `None`.
fn parse_shared_version(result: &Value) -> Option<u64> {
    if result.get("error").is_some() {
        return None;
    }
    result
        .get("data")?
        .get("owner")?
        .get("Shared")?
        .get("initial_shared_version")
        .and_then(parse_u64)
}

/// Read the execution status and digest out of a transaction response.
fn parse_submit_status(result: &Value) -> LedgerResult<SubmitStatus> {
    let effects = result
        .get("effects")
        .ok_or_else(|| LedgerError::MalformedResponse("no effects in response".into()))?;
    let status = effects
        .get("status")
        .ok_or_else(|| LedgerError::MalformedResponse("no status in effects".into()))?;

    Ok(SubmitStatus {
        status: status
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        digest: result
            .get("digest")
            .or_else(|| effects.get("transactionDigest"))
            .and_then(Value::as_str)
            .map(str::to_string),
        error: status
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
