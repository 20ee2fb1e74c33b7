//! UTCTime and GeneralizedTime decoding
//!
//! Only the `Z`-terminated forms mandated by RFC 5280 are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::tag;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("unexpected tag {0:#04x} for a time value")]
    UnexpectedTag(u8),

    #[error("time value is not ASCII")]
    NotAscii,

    #[error("invalid time value: {0}")]
    Invalid(String),
}

/// Decodes a DER time value given its tag and raw value bytes
pub fn decode(tag: u8, value: &[u8]) -> Result<DateTime<Utc>, TimeError> {
    let text = std::str::from_utf8(value).map_err(|_| TimeError::NotAscii)?;
    match tag {
        tag::UTC_TIME => parse_utc_time(text),
        tag::GENERALIZED_TIME => parse_generalized_time(text),
        other => Err(TimeError::UnexpectedTag(other)),
    }
}

/// `YYMMDDHHMMSSZ`; years 50-99 belong to the 1900s
pub fn parse_utc_time(text: &str) -> Result<DateTime<Utc>, TimeError> {
    let yy: u32 = text
        .get(..2)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| TimeError::Invalid(text.to_string()))?;
    let century = if yy >= 50 { "19" } else { "20" };
    parse_generalized_time(&format!("{century}{text}"))
}

/// `YYYYMMDDHHMMSS[.f]Z`
pub fn parse_generalized_time(text: &str) -> Result<DateTime<Utc>, TimeError> {
    NaiveDateTime::parse_from_str(text, "%Y%m%d%H%M%S%.fZ")
        .map(|naive| naive.and_utc())
        .map_err(|e| TimeError::Invalid(format!("{text}: {e}")))
}
