//! Subscription request construction.

use serde::{Deserialize, Serialize};

/// A checkpoint subscription request.
///
/// The read mask lists the checkpoint sub-fields the feed should
/// populate. The default set covers everything the pipeline consumes:
/// sequence number, digests, timestamps, and nested event records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub read_mask: Vec<String>,
}

impl SubscribeRequest {
    /// Minimal mask for event-driven trading.
    pub fn for_events() -> Self {
        Self {
            read_mask: [
                "sequence_number",
                "digest",
                "summary",
                "summary.timestamp_ms",
                "transactions",
                "transactions.digest",
                "transactions.events",
                "transactions.events.events",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Extend the mask with additional paths.
    pub fn with_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.read_mask.extend(paths);
        self
    }
}

impl Default for SubscribeRequest {
    fn default() -> Self {
        Self::for_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mask_covers_nested_events() {
        let req = SubscribeRequest::default();
        assert!(req.read_mask.iter().any(|p| p == "sequence_number"));
        assert!(req.read_mask.iter().any(|p| p == "transactions.digest"));
        assert!(req
            .read_mask
            .iter()
            .any(|p| p == "transactions.events.events"));
    }
}
