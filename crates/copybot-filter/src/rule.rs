//! Filter rule evaluation.

use crate::config::FilterConfig;
use copybot_core::{normalize_type_tag, SwapEvent};
use tracing::trace;

/// A compiled filter rule.
///
/// Base token tags are normalized at construction so event-side tags in
/// either the short (`0x2::sui::SUI`) or fully-padded address form
/// match the same rule.
#[derive(Debug, Clone)]
pub struct FilterRule {
    base_tokens: Vec<String>,
    min_base_amount: u64,
}

impl FilterRule {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            base_tokens: config
                .base_tokens
                .iter()
                .map(|t| normalize_type_tag(t))
                .collect(),
            min_base_amount: config.min_base_amount,
        }
    }

    /// Minimum base amount this rule enforces.
    pub fn min_base_amount(&self) -> u64 {
        self.min_base_amount
    }

    /// The swap amount denominated in the matched base token, or `None`
    /// when neither side of the pair is a configured base token.
    ///
    /// When the base token is the input side of the swap (`a_to_b` with
    /// base == token A, or `!a_to_b` with base == token B) the input
    /// amount is base-denominated; otherwise the output amount is.
    pub fn base_amount(&self, event: &SwapEvent) -> Option<u64> {
        let token_a = normalize_type_tag(&event.token_a);
        let token_b = normalize_type_tag(&event.token_b);

        let base_is_a = self.base_tokens.contains(&token_a);
        let base_is_b = self.base_tokens.contains(&token_b);

        if base_is_a {
            if event.a_to_b {
                Some(event.amount_in)
            } else {
                Some(event.amount_out)
            }
        } else if base_is_b {
            if event.a_to_b {
                Some(event.amount_out)
            } else {
                Some(event.amount_in)
            }
        } else {
            None
        }
    }

    /// Whether the event warrants action.
    ///
    /// Comparison is exact unsigned integer arithmetic: an amount equal
    /// to the minimum is accepted, one below it is rejected. No
    /// floating point is involved so threshold-boundary trades cannot
    /// be misclassified by rounding.
    pub fn should_act(&self, event: &SwapEvent) -> bool {
        match self.base_amount(event) {
            Some(amount) => {
                let pass = amount >= self.min_base_amount;
                trace!(
                    amount,
                    min = self.min_base_amount,
                    pass,
                    pool = %event.pool,
                    "filter evaluated"
                );
                pass
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copybot_core::{SuiAddress, TransactionDigest, SUI_TYPE_TAG};

    const OTHER: &str = "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";
    const THRESHOLD: u64 = 10_000_000_000; // 10 SUI

    fn rule() -> FilterRule {
        FilterRule::new(&FilterConfig {
            base_tokens: vec![SUI_TYPE_TAG.to_string()],
            min_base_amount: THRESHOLD,
        })
    }

    fn swap(token_a: &str, token_b: &str, a_to_b: bool, amount_in: u64, amount_out: u64) -> SwapEvent {
        SwapEvent {
            pool: SuiAddress::ZERO,
            amount_in,
            amount_out,
            a_to_b,
            token_a: token_a.to_string(),
            token_b: token_b.to_string(),
            sender: SuiAddress::ZERO,
            tx_digest: TransactionDigest::new("test"),
            checkpoint_seq: 0,
            timestamp_ms: None,
        }
    }

    #[test]
    fn boundary_amount_is_accepted() {
        let rule = rule();
        assert!(rule.should_act(&swap(SUI_TYPE_TAG, OTHER, true, THRESHOLD, 1)));
        assert!(!rule.should_act(&swap(SUI_TYPE_TAG, OTHER, true, THRESHOLD - 1, 1)));
    }

    #[test]
    fn base_on_input_side_selects_amount_in() {
        let rule = rule();
        // SUI is token A and the swap is A->B: SUI is the input.
        let event = swap(SUI_TYPE_TAG, OTHER, true, 20_000_000_000, 5);
        assert_eq!(rule.base_amount(&event), Some(20_000_000_000));
    }

    #[test]
    fn base_on_output_side_selects_amount_out() {
        let rule = rule();
        // SUI is token A but the swap is B->A: SUI is the output.
        let event = swap(SUI_TYPE_TAG, OTHER, false, 5, 20_000_000_000);
        assert_eq!(rule.base_amount(&event), Some(20_000_000_000));
    }

    #[test]
    fn base_as_token_b_follows_direction() {
        let rule = rule();
        // SUI is token B, swap B->A: SUI is the input.
        let event = swap(OTHER, SUI_TYPE_TAG, false, 30_000_000_000, 7);
        assert_eq!(rule.base_amount(&event), Some(30_000_000_000));
        // SUI is token B, swap A->B: SUI is the output.
        let event = swap(OTHER, SUI_TYPE_TAG, true, 7, 30_000_000_000);
        assert_eq!(rule.base_amount(&event), Some(30_000_000_000));
    }

    #[test]
    fn non_base_pair_is_rejected() {
        let rule = rule();
        let event = swap(OTHER, "0xaa::x::X", true, u64::MAX, u64::MAX);
        assert_eq!(rule.base_amount(&event), None);
        assert!(!rule.should_act(&event));
    }

    #[test]
    fn padded_address_form_matches() {
        let rule = rule();
        let long_sui =
            "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";
        let event = swap(long_sui, OTHER, true, THRESHOLD, 1);
        assert!(rule.should_act(&event));
    }
}
