//! Walks a parsed `CertificateList` (RFC 5280 §5.1) down to its revoked serials.
//!
//! ```text
//! TBSCertList  ::=  SEQUENCE  {
//!      version                 Version OPTIONAL,
//!      signature               AlgorithmIdentifier,
//!      issuer                  Name,
//!      thisUpdate              Time,
//!      nextUpdate              Time OPTIONAL,
//!      revokedCertificates     SEQUENCE OF SEQUENCE  { ... } OPTIONAL,
//!      crlExtensions           [0]  EXPLICIT Extensions OPTIONAL
//! }
//! ```
//!
//! Optional fields are recognised by sniffing the tag of the next node only.

use std::iter::Peekable;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::der::{NodeRef, tag, time};

use super::errors::{CrlError, CrlResult};
use super::serial;
use super::types::{CrlSummary, RevocationReason, RevokedEntry, RevokedSet};

const OID: u8 = 0x06;
const OCTET_STRING: u8 = 0x04;
const ENUMERATED: u8 = 0x0A;

// id-ce-cRLNumber
const CRL_NUMBER_OID: &[u8] = &[0x55, 0x1D, 0x14];
// id-ce-cRLReasons
const REASON_CODE_OID: &[u8] = &[0x55, 0x1D, 0x15];

/// The fields of a `TBSCertList`, in encoding order
#[derive(Debug)]
pub struct TbsCertList<'t, 'a> {
    pub version: Option<NodeRef<'t, 'a>>,
    pub signature: NodeRef<'t, 'a>,
    pub issuer: NodeRef<'t, 'a>,
    pub this_update: NodeRef<'t, 'a>,
    pub next_update: Option<NodeRef<'t, 'a>>,
    pub revoked_certificates: Option<NodeRef<'t, 'a>>,
    pub extensions: Option<NodeRef<'t, 'a>>,
}

impl<'t, 'a> TbsCertList<'t, 'a> {
    /// Locates `tbsCertList` under the `CertificateList` root and splits it into fields
    pub fn from_root(root: NodeRef<'t, 'a>) -> CrlResult<Self> {
        if root.tag() != tag::SEQUENCE {
            return Err(CrlError::structure("root is not a SEQUENCE"));
        }
        let tbs = root
            .child(0)
            .ok_or_else(|| CrlError::structure("empty CertificateList"))?;
        if tbs.tag() != tag::SEQUENCE {
            return Err(CrlError::structure("tbsCertList is not a SEQUENCE"));
        }
        Self::from_fields(tbs.children().peekable())
    }

    fn from_fields<I>(mut fields: Peekable<I>) -> CrlResult<Self>
    where
        I: Iterator<Item = NodeRef<'t, 'a>>,
    {
        let first = fields
            .next()
            .ok_or_else(|| CrlError::structure("empty tbsCertList"))?;

        // An INTEGER is only the version when the signature SEQUENCE follows it
        let (version, signature) = match (first.tag(), fields.peek().map(|n| n.tag())) {
            (tag::INTEGER, Some(tag::SEQUENCE)) => (Some(first), fields.next()),
            (tag::INTEGER, _) => {
                return Err(CrlError::structure(
                    "version is not followed by a signature algorithm",
                ));
            }
            (tag::SEQUENCE, _) => (None, Some(first)),
            (other, _) => {
                return Err(CrlError::structure(format!(
                    "unexpected tag {other:#04x} at start of tbsCertList"
                )));
            }
        };
        let signature = signature.ok_or_else(|| CrlError::structure("missing signature"))?;

        let issuer = fields
            .next_if(|n| n.tag() == tag::SEQUENCE)
            .ok_or_else(|| CrlError::structure("missing issuer"))?;

        let this_update = fields
            .next_if(|n| tag::is_time(n.tag()))
            .ok_or_else(|| CrlError::structure("missing thisUpdate"))?;
        let next_update = fields.next_if(|n| tag::is_time(n.tag()));

        let revoked_certificates = fields.next_if(|n| n.tag() == tag::SEQUENCE);
        let extensions = fields.next_if(|n| n.tag() == tag::CONTEXT_0);

        for extra in fields {
            warn!(tag = extra.tag(), "Ignoring unrecognised field in tbsCertList");
        }

        Ok(Self {
            version,
            signature,
            issuer,
            this_update,
            next_update,
            revoked_certificates,
            extensions,
        })
    }

    /// Extracts every `userCertificate` serial, normalized
    pub fn revoked(&self) -> CrlResult<RevokedSet> {
        let Some(list) = self.revoked_certificates else {
            return Ok(RevokedSet::new());
        };

        let mut set = RevokedSet::new();
        for (index, entry) in list.children().enumerate() {
            set.insert(read_entry(entry, index)?);
        }
        Ok(set)
    }

    pub fn summarize(&self) -> CrlResult<CrlSummary> {
        Ok(CrlSummary {
            version: self.version.and_then(|v| match v.value() {
                [b] => Some(*b),
                _ => None,
            }),
            this_update: decode_time(self.this_update),
            next_update: self.next_update.and_then(decode_time),
            crl_number: self
                .extensions
                .and_then(|ext| ext.child(0))
                .and_then(|list| find_extension(list, CRL_NUMBER_OID))
                .and_then(|value| decode_wrapped(value, tag::INTEGER))
                .map(serial::from_integer_bytes),
            revoked: self.revoked()?,
        })
    }
}

/// Revoked serials of the CRL rooted at `root`
pub fn read_revoked(root: NodeRef<'_, '_>) -> CrlResult<RevokedSet> {
    TbsCertList::from_root(root)?.revoked()
}

/// Revoked serials plus diagnostic metadata of the CRL rooted at `root`
pub fn summarize(root: NodeRef<'_, '_>) -> CrlResult<CrlSummary> {
    TbsCertList::from_root(root)?.summarize()
}

fn read_entry(entry: NodeRef<'_, '_>, index: usize) -> CrlResult<RevokedEntry> {
    if entry.tag() != tag::SEQUENCE {
        return Err(CrlError::structure(format!(
            "revoked entry {index} is not a SEQUENCE"
        )));
    }

    let serial_node = entry
        .child(0)
        .filter(|n| n.tag() == tag::INTEGER && !n.value().is_empty())
        .ok_or_else(|| {
            CrlError::structure(format!("revoked entry {index} has no serial number"))
        })?;

    let mut revoked = RevokedEntry::new(serial::from_integer_bytes(serial_node.value()));
    revoked.revocation_date = entry
        .child(1)
        .filter(|n| tag::is_time(n.tag()))
        .and_then(decode_time);
    revoked.reason = entry
        .child(2)
        .filter(|n| n.tag() == tag::SEQUENCE)
        .and_then(|exts| find_extension(exts, REASON_CODE_OID))
        .and_then(|value| decode_wrapped(value, ENUMERATED))
        .and_then(|code| match code {
            [b] => RevocationReason::from_u8(*b),
            _ => None,
        });

    Ok(revoked)
}

fn decode_time(node: NodeRef<'_, '_>) -> Option<DateTime<Utc>> {
    match time::decode(node.tag(), node.value()) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!("Undecodable time in CRL: {e}");
            None
        }
    }
}

/// Finds the `extnValue` payload of the extension with `oid` in an `Extensions` SEQUENCE
fn find_extension<'a>(extensions: NodeRef<'_, 'a>, oid: &[u8]) -> Option<&'a [u8]> {
    extensions
        .children()
        .filter(|ext| ext.tag() == tag::SEQUENCE)
        .find(|ext| {
            ext.child(0)
                .is_some_and(|id| id.tag() == OID && id.value() == oid)
        })
        .and_then(|ext| ext.children().last())
        .filter(|value| value.tag() == OCTET_STRING)
        .map(|value| value.value())
}

/// Decodes a single primitive TLV of the given tag from an extension payload
fn decode_wrapped(data: &[u8], expected: u8) -> Option<&[u8]> {
    let header = crate::der::read_header(data, 0).ok()?;
    (header.tag == expected && header.value_end(0) == data.len())
        .then(|| &data[header.value_start(0)..])
}
