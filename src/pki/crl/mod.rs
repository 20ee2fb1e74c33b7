//! Certificate Revocation List (CRL) decoding
//!
//! This module turns a fetched CRL body into the set of revoked serial
//! numbers it lists, without a full X.509 implementation.
//!
//! # Features
//! - PEM armor detection and unwrapping
//! - Tag-sniffing walk over the optional fields of `TBSCertList`
//! - Serial normalization shared with caller-supplied serials
//! - Diagnostic metadata (update times, CRL number, revocation reasons)

mod errors;
pub mod navigator;
pub mod pem;
pub mod serial;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export public types
pub use errors::{CrlError, CrlResult};
pub use navigator::{TbsCertList, read_revoked, summarize};
pub use pem::unwrap_pem;
pub use types::{CrlSummary, RevocationReason, RevokedEntry, RevokedSet};

use crate::der::DerTree;

/// Decodes a DER or PEM CRL body into its revoked set and metadata
pub fn parse_crl(data: &[u8]) -> CrlResult<CrlSummary> {
    let der = unwrap_pem(data)?;
    let tree = DerTree::parse(&der)?;
    if tree.consumed() < der.len() {
        tracing::debug!(
            trailing = der.len() - tree.consumed(),
            "Ignoring bytes after CertificateList"
        );
    }
    summarize(tree.root())
}
