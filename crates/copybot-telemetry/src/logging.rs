//! Structured logging initialization.

use crate::error::TelemetryResult;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format, chosen from `RUST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

fn detect_format() -> LogFormat {
    match std::env::var("RUST_ENV").as_deref() {
        Ok("production") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

/// Initialize structured logging for the whole process.
///
/// `RUST_LOG` overrides the default filter. Production (`RUST_ENV=production`)
/// gets JSON lines; anything else gets pretty console output.
pub fn init_logging() -> TelemetryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,copybot=debug"));

    match detect_format() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_thread_names(true),
                )
                .init();
        }
    }

    Ok(())
}
