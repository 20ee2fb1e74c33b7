//! Serial number canonicalization
//!
//! CRL serials and caller-supplied serials go through the same
//! normalization so that padding or case never hides a match.

/// Uppercases and strips leading zeros; the zero value becomes `"0"`
pub fn normalize(hex: &str) -> String {
    let upper = hex.to_ascii_uppercase();
    let stripped = upper.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Hex-encodes the raw bytes of a DER INTEGER, without sign interpretation
pub fn from_integer_bytes(bytes: &[u8]) -> String {
    normalize(&hex::encode_upper(bytes))
}

/// Canonical form of a serial typed by a caller.
///
/// Accepts an optional `0x` prefix and `:`/`-`/whitespace separators as
/// printed by common tools. Returns `None` when what remains is not hex.
pub fn canonicalize_input(serial: &str) -> Option<String> {
    let trimmed = serial.trim();
    let unprefixed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: String = unprefixed
        .chars()
        .filter(|c| !matches!(c, ':' | '-') && !c.is_whitespace())
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(normalize(&digits))
}
