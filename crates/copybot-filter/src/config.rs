//! Filter configuration.

use copybot_core::SUI_TYPE_TAG;
use serde::{Deserialize, Serialize};

/// Filter configuration as loaded from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Base token type tags. A swap must involve one of these on either
    /// side to be considered.
    #[serde(default = "default_base_tokens")]
    pub base_tokens: Vec<String>,
    /// Minimum base-denominated amount in raw units (MIST for SUI).
    /// Default: 500 SUI.
    #[serde(default = "default_min_base_amount")]
    pub min_base_amount: u64,
}

fn default_base_tokens() -> Vec<String> {
    vec![SUI_TYPE_TAG.to_string()]
}

fn default_min_base_amount() -> u64 {
    500_000_000_000
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            base_tokens: default_base_tokens(),
            min_base_amount: default_min_base_amount(),
        }
    }
}
