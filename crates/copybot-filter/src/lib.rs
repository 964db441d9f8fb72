//! Economic filtering of decoded swap events.
//!
//! A `FilterRule` decides whether an observed swap is worth copying:
//! one side of the pair must be a configured base token and the
//! base-denominated amount must meet the minimum. Rules are pure and
//! stateless; evaluation happens per event.

pub mod config;
pub mod rule;

pub use config::FilterConfig;
pub use rule::FilterRule;
