//! Cetus event payload decoders.
//!
//! Swap payload layout (`pool::SwapEvent` / aggregator `CetusSwapEvent`):
//!
//! ```text
//! [0,32)   pool object id
//! [32,40)  amount_in, u64 LE
//! [40,48)  amount_out, u64 LE
//! 48       direction flag, 1 = A -> B
//! [49,82)  partner id (32) + one bool, skipped
//! 82..     token A type, length-prefixed
//! ..       token B type, length-prefixed
//! ```
//!
//! Pool-created payload (`factory::CreatePoolEvent<A, B>`) is read
//! sequentially: two length-prefixed TypeName strings, the 32-byte pool
//! id, then a u32 LE tick spacing. The coin types authoritative for the
//! pool come from the tag's generic arguments, not the payload bytes.

use crate::cursor::BcsCursor;
use crate::error::{DecodeError, DecodeResult};
use copybot_core::{extract_type_arguments, PoolCreatedEvent};
use tracing::trace;

/// Offset of the first variable-length field in a swap payload.
const SWAP_TOKENS_OFFSET: usize = 82;
/// Fixed bytes between the direction flag and the token strings:
/// partner object id (32) plus a bool.
const SWAP_RESERVED_LEN: usize = 33;

/// Fields recovered from a swap event payload.
///
/// Envelope fields (sender, digest, checkpoint) come from the
/// containing `RawEvent`; the coordinator combines both into a
/// `SwapEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPayload {
    pub pool: copybot_core::SuiAddress,
    pub amount_in: u64,
    pub amount_out: u64,
    pub a_to_b: bool,
    pub token_a: String,
    pub token_b: String,
}

/// Decode a swap event payload.
pub fn decode_swap(payload: &[u8]) -> DecodeResult<SwapPayload> {
    let mut cur = BcsCursor::new(payload);

    let pool = cur.read_address()?;
    let amount_in = cur.read_u64_le()?;
    let amount_out = cur.read_u64_le()?;
    let a_to_b = cur.read_bool()?;
    cur.skip(SWAP_RESERVED_LEN)?;
    debug_assert_eq!(cur.position(), SWAP_TOKENS_OFFSET);

    let token_a = cur.read_string()?;
    let token_b = cur.read_string()?;

    trace!(
        pool = %pool,
        amount_in,
        amount_out,
        a_to_b,
        trailing = cur.remaining(),
        "decoded swap payload"
    );

    Ok(SwapPayload {
        pool,
        amount_in,
        amount_out,
        a_to_b,
        token_a,
        token_b,
    })
}

/// Decode a pool-creation event.
///
/// The two coin types are carried as generic parameters of the event
/// type tag; a tag without the angle-bracket form fails with
/// `DecodeError::MissingTypeArguments`. The payload's own TypeName
/// copies are consumed but the tag values win, since the tag form
/// carries the full `0x`-prefixed addresses.
pub fn decode_pool_created(event_type: &str, payload: &[u8]) -> DecodeResult<PoolCreatedEvent> {
    let (coin_type_a, coin_type_b) = extract_type_arguments(event_type)
        .ok_or_else(|| DecodeError::MissingTypeArguments(event_type.to_string()))?;

    let mut cur = BcsCursor::new(payload);
    let _type_name_a = cur.read_string()?;
    let _type_name_b = cur.read_string()?;
    let pool = cur.read_address()?;
    let tick_spacing = cur.read_u32_le()?;

    Ok(PoolCreatedEvent {
        pool,
        coin_type_a,
        coin_type_b,
        tick_spacing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BcsWriter;
    use copybot_core::SuiAddress;

    const SUI: &str = "0x2::sui::SUI";
    const USDC: &str = "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";

    fn pool_addr() -> SuiAddress {
        SuiAddress::from_hex("0xb8d7d9e66a60c239e7a60110efcf8de6c705580ed924d0dde141f4a0e2c90105")
            .unwrap()
    }

    fn encode_swap(
        pool: &SuiAddress,
        amount_in: u64,
        amount_out: u64,
        a_to_b: bool,
        token_a: &str,
        token_b: &str,
    ) -> Vec<u8> {
        let mut w = BcsWriter::new();
        w.write_address(pool)
            .write_u64_le(amount_in)
            .write_u64_le(amount_out)
            .write_bool(a_to_b)
            .write_address(&SuiAddress::ZERO) // partner
            .write_bool(false)
            .write_string(token_a)
            .write_string(token_b);
        w.into_bytes()
    }

    #[test]
    fn swap_round_trip() {
        let pool = pool_addr();
        let payload = encode_swap(&pool, 2_000_000_000_000, 987_654_321, true, SUI, USDC);
        let decoded = decode_swap(&payload).unwrap();
        assert_eq!(decoded.pool, pool);
        assert_eq!(decoded.amount_in, 2_000_000_000_000);
        assert_eq!(decoded.amount_out, 987_654_321);
        assert!(decoded.a_to_b);
        assert_eq!(decoded.token_a, SUI);
        assert_eq!(decoded.token_b, USDC);
    }

    #[test]
    fn swap_direction_flag_zero_is_b_to_a() {
        let payload = encode_swap(&pool_addr(), 1, 2, false, SUI, USDC);
        assert!(!decode_swap(&payload).unwrap().a_to_b);
    }

    #[test]
    fn swap_truncated_below_fixed_region() {
        // Anything shorter than the 82-byte fixed region must be
        // Truncated, never a partial record.
        let payload = encode_swap(&pool_addr(), 1, 2, true, SUI, USDC);
        for len in [0, 31, 32, 47, 48, 81, 82] {
            let err = decode_swap(&payload[..len]).unwrap_err();
            assert!(
                matches!(err, DecodeError::Truncated { .. }),
                "len {len}: {err:?}"
            );
        }
    }

    #[test]
    fn swap_truncated_inside_token_string() {
        let payload = encode_swap(&pool_addr(), 1, 2, true, SUI, USDC);
        // Cut in the middle of the token B string body.
        let cut = payload.len() - 4;
        assert!(matches!(
            decode_swap(&payload[..cut]).unwrap_err(),
            DecodeError::Truncated { .. }
        ));
    }

    #[test]
    fn swap_rejects_multibyte_length_prefix() {
        let mut payload = encode_swap(&pool_addr(), 1, 2, true, SUI, USDC);
        // Corrupt token A's length byte with the continuation bit.
        payload[82] |= 0x80;
        assert!(matches!(
            decode_swap(&payload).unwrap_err(),
            DecodeError::InvalidLength(_)
        ));
    }

    fn encode_pool_created(pool: &SuiAddress, tick_spacing: u32) -> Vec<u8> {
        let mut w = BcsWriter::new();
        // Payload TypeNames carry the unprefixed form.
        w.write_string("2::sui::SUI")
            .write_string("dba3::usdc::USDC")
            .write_address(pool)
            .write_u32_le(tick_spacing);
        w.into_bytes()
    }

    #[test]
    fn pool_created_round_trip() {
        let pool = pool_addr();
        let tag = format!("0x1eab::factory::CreatePoolEvent<{SUI}, {USDC}>");
        let payload = encode_pool_created(&pool, 60);
        let decoded = decode_pool_created(&tag, &payload).unwrap();
        assert_eq!(decoded.pool, pool);
        assert_eq!(decoded.coin_type_a, SUI);
        assert_eq!(decoded.coin_type_b, USDC);
        assert_eq!(decoded.tick_spacing, 60);
    }

    #[test]
    fn pool_created_requires_type_arguments() {
        let payload = encode_pool_created(&pool_addr(), 2);
        let err = decode_pool_created("0x1eab::factory::CreatePoolEvent", &payload).unwrap_err();
        assert!(matches!(err, DecodeError::MissingTypeArguments(_)));
    }

    #[test]
    fn pool_created_truncated_payload() {
        let tag = format!("0x1eab::factory::CreatePoolEvent<{SUI}, {USDC}>");
        let payload = encode_pool_created(&pool_addr(), 2);
        let err = decode_pool_created(&tag, &payload[..payload.len() - 2]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }
}
