//! Move type-tag string utilities.
//!
//! Event type tags are fully-qualified Move type identifiers, optionally
//! carrying generic type arguments:
//!
//! `0x1eab..b2fb::factory::CreatePoolEvent<0x2::sui::SUI, 0xdba3..00e7::usdc::USDC>`
//!
//! The pool-created event carries its two coin types only as generic
//! parameters, so extracting them from the tag is part of decoding.

/// Strip the generic argument suffix from a type tag, if present.
pub fn base_type(tag: &str) -> &str {
    match tag.find('<') {
        Some(idx) => &tag[..idx],
        None => tag,
    }
}

/// Extract the two generic type arguments from a type tag.
///
/// Returns the text between the first `<` and the trailing `>`, split on
/// the top-level comma. Nested generics are respected: the split only
/// happens at bracket depth zero. Returns `None` when the tag has no
/// angle-bracket form or does not contain exactly two top-level
/// arguments.
pub fn extract_type_arguments(tag: &str) -> Option<(String, String)> {
    let start = tag.find('<')?;
    let end = tag.rfind('>')?;
    if end <= start + 1 {
        return None;
    }
    let inner = &tag[start + 1..end];

    let mut depth = 0usize;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let first = inner[..idx].trim();
                let second = inner[idx + 1..].trim();
                if first.is_empty() || second.is_empty() {
                    return None;
                }
                // A third top-level argument means this is not a two-coin tag.
                if second.contains(',') && !has_only_nested_commas(second) {
                    return None;
                }
                return Some((first.to_string(), second.to_string()));
            }
            _ => {}
        }
    }
    None
}

/// True when every comma in `s` sits inside angle brackets.
fn has_only_nested_commas(s: &str) -> bool {
    let mut depth = 0usize;
    for ch in s.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return false,
            _ => {}
        }
    }
    true
}

/// Normalize every hex address embedded in a type tag.
///
/// On-chain tags sometimes carry the fully-padded address form
/// (`0x0000..0002::sui::SUI`) and sometimes the short form
/// (`0x2::sui::SUI`). Normalization strips leading zeros and lowercases
/// the digits so both compare equal. Applies to nested generic
/// arguments as well.
pub fn normalize_type_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut chars = tag.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch == '0' && matches!(chars.peek(), Some((_, 'x' | 'X'))) {
            chars.next();
            let digits_start = idx + 2;
            let mut digits_end = digits_start;
            while let Some(&(j, c)) = chars.peek() {
                if c.is_ascii_hexdigit() {
                    digits_end = j + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let digits = &tag[digits_start..digits_end];
            let trimmed = digits.trim_start_matches('0');
            out.push_str("0x");
            if trimmed.is_empty() {
                out.push('0');
            } else {
                out.push_str(&trimmed.to_ascii_lowercase());
            }
        } else {
            out.push(ch);
        }
    }
    out
}
