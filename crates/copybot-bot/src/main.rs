//! Cetus copy-trade bot entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Cetus DEX copy-trade bot for Sui checkpoints
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via COPYBOT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // TLS crypto provider must be installed before any WS connection
    copybot_stream::init_crypto();

    let args = Args::parse();

    copybot_telemetry::init_logging()?;

    info!("Starting copybot v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var("COPYBOT_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = copybot_bot::AppConfig::from_file(&config_path)?;
    info!(?config.mode, stream_url = %config.stream.url, "Configuration loaded");

    let app = copybot_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
