//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] copybot_core::CoreError),

    #[error("Stream error: {0}")]
    Stream(#[from] copybot_stream::StreamError),

    #[error("Executor error: {0}")]
    Executor(#[from] copybot_executor::ExecutorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] copybot_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
