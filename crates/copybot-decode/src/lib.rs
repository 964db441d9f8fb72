//! Schema-less BCS decoding for Cetus pool events.
//!
//! Event payloads arrive as raw BCS bytes with no compiled schema. This
//! crate provides a bounds-checked cursor over the payload, the two
//! event decoders built on it, and the mirror-image writer used by the
//! transaction builder and tests.
//!
//! Any change to the source event struct layout breaks these decoders;
//! the event type tag carries the originating module path and serves as
//! the version key.

pub mod cursor;
pub mod error;
pub mod event;
pub mod writer;

pub use cursor::BcsCursor;
pub use error::{DecodeError, DecodeResult};
pub use event::{decode_pool_created, decode_swap, SwapPayload};
pub use writer::BcsWriter;
