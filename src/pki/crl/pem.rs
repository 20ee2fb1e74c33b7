use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::errors::{CrlError, CrlResult};

const CRL_MARKER: &[u8] = b"BEGIN X509 CRL";

/// True when the buffer carries `BEGIN X509 CRL` armor
pub fn is_pem_crl(data: &[u8]) -> bool {
    data.windows(CRL_MARKER.len()).any(|w| w == CRL_MARKER)
}

/// Converts PEM-armored CRLs to DER; other input is returned untouched.
///
/// Only the first `X509 CRL` block is decoded. Text before it is ignored.
pub fn unwrap_pem(data: &[u8]) -> CrlResult<Cow<'_, [u8]>> {
    if !is_pem_crl(data) {
        return Ok(Cow::Borrowed(data));
    }

    let text = std::str::from_utf8(data)
        .map_err(|e| CrlError::Pem(format!("armor is not valid UTF-8: {e}")))?;

    let mut lines = text
        .lines()
        .skip_while(|line| !line.contains("-----BEGIN X509 CRL"));
    // The BEGIN line itself
    lines.next();

    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if is_marker(line) {
            terminated = true;
            break;
        }
        body.extend(line.chars().filter(|c| !c.is_whitespace()));
    }

    if !terminated {
        return Err(CrlError::Pem("missing END marker".into()));
    }
    if body.is_empty() {
        return Err(CrlError::Pem("empty PEM body".into()));
    }

    let der = STANDARD.decode(body.as_bytes())?;
    tracing::debug!(der_len = der.len(), "Unwrapped PEM CRL");
    Ok(Cow::Owned(der))
}

fn is_marker(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("-----BEGIN") || line.starts_with("-----END")
}
