//! Decode error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload ended before a read completed.
    #[error("Truncated payload: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A string length prefix outside the single-byte range.
    ///
    /// Only single-byte ULEB128 lengths (0..=127) are handled; a set
    /// continuation bit means a string longer than this decoder
    /// supports and must be reported, not guessed around.
    #[error("Unsupported string length prefix: {0:#04x}")]
    InvalidLength(u8),

    /// The event type tag carried no generic type arguments.
    #[error("Missing type arguments in event tag: {0}")]
    MissingTypeArguments(String),

    /// A length-prefixed string was not valid UTF-8.
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,
}

pub type DecodeResult<T> = Result<T, DecodeError>;
