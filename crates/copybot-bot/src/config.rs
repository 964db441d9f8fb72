//! Application configuration.

use crate::error::{AppError, AppResult};
use copybot_filter::FilterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Decode, filter and log matching swaps without trading.
    #[default]
    Observe,
    /// Full pipeline with live execution.
    Trade,
}

/// Checkpoint stream subscription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Feed endpoint URL (wss://...).
    pub url: String,
    /// Auth token for the subscribe frame.
    #[serde(default)]
    pub token: String,
    /// Delay between reconnect attempts (ms).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Maximum reconnect attempts (0 = retry forever with a fixed
    /// delay; non-zero switches to exponential backoff with this cap).
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Bounded checkpoint channel capacity.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

fn default_channel_capacity() -> usize {
    1_024
}

/// Fullnode JSON-RPC settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,
}

fn default_rpc_url() -> String {
    "https://fullnode.mainnet.sui.io:443".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
        }
    }
}

/// Signing key configuration (Trade mode only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Secret key, hex or base64. Prefer leaving this unset and
    /// supplying COPYBOT_SIGNER_KEY instead.
    #[serde(default)]
    pub private_key: Option<String>,
    /// On-chain address of the signing key.
    pub address: String,
}

impl SignerConfig {
    /// Key material from config, falling back to the environment.
    pub fn key_material(&self) -> AppResult<String> {
        if let Some(key) = &self.private_key {
            return Ok(key.clone());
        }
        std::env::var("COPYBOT_SIGNER_KEY").map_err(|_| {
            AppError::Config(
                "Trade mode needs signer.private_key or COPYBOT_SIGNER_KEY".to_string(),
            )
        })
    }
}

/// Target event type tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Swap event tags to match, compared by base type. Covers both the
    /// CLMM pool event and the aggregator wrapper.
    #[serde(default = "default_swap_event_types")]
    pub swap_event_types: Vec<String>,
    /// Pool creation event tag, compared by base type.
    #[serde(default = "default_pool_created_event_type")]
    pub pool_created_event_type: String,
}

fn default_swap_event_types() -> Vec<String> {
    vec![
        "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb::pool::SwapEvent"
            .to_string(),
        "0xeffc8ae61f439bb34c9b905ff8f29ec56873dcedf81c7123ff2f1f67c45ec302::cetus::CetusSwapEvent"
            .to_string(),
    ]
}

fn default_pool_created_event_type() -> String {
    "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb::factory::CreatePoolEvent"
        .to_string()
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            swap_event_types: default_swap_event_types(),
            pool_created_event_type: default_pool_created_event_type(),
        }
    }
}

/// Copied-trade parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Router swap entry point.
    #[serde(default = "default_router")]
    pub router: String,
    /// Cetus global config object.
    #[serde(default = "default_global_config")]
    pub global_config: String,
    /// Initial shared version of the global config object.
    #[serde(default = "default_global_config_shared_version")]
    pub global_config_shared_version: u64,
    /// Fixed amount to swap per copied trade, raw units.
    #[serde(default = "default_amount")]
    pub amount: u64,
    /// Whether `amount` denominates the input side.
    #[serde(default = "default_by_amount_in")]
    pub by_amount_in: bool,
    /// Gas budget ceiling in MIST.
    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
    /// Priority bid multiplier over the reference gas price.
    #[serde(default = "default_gas_price_multiplier")]
    pub gas_price_multiplier: f64,
    /// Simulate before submitting.
    #[serde(default)]
    pub dry_run_first: bool,
}

fn default_router() -> String {
    "0xfbb32ac0fa89a3cb0c56c745b688c6d2a53ac8e43447119ad822763997ffb9c3::router::swap".to_string()
}

fn default_global_config() -> String {
    "0xdaa46292632c3c4d8f31f23ea0f9b36a28ff3677e9684980e4438403a67a3d8f".to_string()
}

fn default_global_config_shared_version() -> u64 {
    1_574_190
}

fn default_amount() -> u64 {
    100_000_000 // 0.1 SUI
}

fn default_by_amount_in() -> bool {
    true
}

fn default_gas_budget() -> u64 {
    100_000_000
}

fn default_gas_price_multiplier() -> f64 {
    2.0
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            router: default_router(),
            global_config: default_global_config(),
            global_config_shared_version: default_global_config_shared_version(),
            amount: default_amount(),
            by_amount_in: default_by_amount_in(),
            gas_budget: default_gas_budget(),
            gas_price_multiplier: default_gas_price_multiplier(),
            dry_run_first: false,
        }
    }
}

/// Shutdown behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// How long to wait for in-flight submissions on shutdown (ms).
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
}

fn default_grace_ms() -> u64 {
    5_000
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_ms: default_grace_ms(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Operating mode.
    #[serde(default)]
    pub mode: OperatingMode,
    /// Checkpoint feed settings.
    pub stream: StreamConfig,
    /// Fullnode RPC settings.
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Signing key (required for Trade mode).
    #[serde(default)]
    pub signer: Option<SignerConfig>,
    /// Economic filter settings.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Target event tags.
    #[serde(default)]
    pub events: EventsConfig,
    /// Copied-trade parameters.
    #[serde(default)]
    pub trade: TradeConfig,
    /// Shutdown behavior.
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// Load configuration, trying COPYBOT_CONFIG then the default path.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("COPYBOT_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            Err(AppError::Config(format!(
                "Config file not found: {config_path}"
            )))
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check mode-dependent requirements.
    pub fn validate(&self) -> AppResult<()> {
        if self.stream.url.is_empty() {
            return Err(AppError::Config("stream.url must be set".to_string()));
        }
        if self.mode == OperatingMode::Trade && self.signer.is_none() {
            return Err(AppError::Config(
                "Trade mode requires a [signer] section".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_observe_mode(&self) -> bool {
        self.mode == OperatingMode::Observe
    }
}
