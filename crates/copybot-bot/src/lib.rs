//! Cetus copy-trade bot.
//!
//! Main application that orchestrates all components:
//! - Checkpoint stream subscription
//! - Event extraction and BCS decoding
//! - Economic filtering (base-token threshold)
//! - Priority-fee swap execution (trade mode) or logging (observe mode)

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use app::{Application, AutoConfirm, TradeConfirmation};
pub use config::{AppConfig, OperatingMode};
pub use error::{AppError, AppResult};
pub use pipeline::PipelineCoordinator;
pub use stats::PipelineStats;
