//! Synthetic CRL encodings for unit tests

use crate::der::tag;

pub fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = value.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    out.extend_from_slice(value);
    out
}

pub fn seq(parts: &[Vec<u8>]) -> Vec<u8> {
    tlv(tag::SEQUENCE, &parts.concat())
}

// ecdsa-with-SHA256
const SIG_ALG_OID: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02];
// id-at-commonName
const CN_OID: &[u8] = &[0x55, 0x04, 0x03];
const REASON_CODE_OID: &[u8] = &[0x55, 0x1D, 0x15];
const CRL_NUMBER_OID: &[u8] = &[0x55, 0x1D, 0x14];

fn extension(oid: &[u8], value: Vec<u8>) -> Vec<u8> {
    seq(&[tlv(0x06, oid), tlv(0x04, &value)])
}

/// Builder for a `CertificateList` with a configurable `TBSCertList` layout
#[derive(Debug, Clone)]
pub struct CrlBuilder {
    pub version: bool,
    pub next_update: bool,
    pub generalized_time: bool,
    /// Serial bytes and optional reason code; empty omits `revokedCertificates`
    pub revoked: Vec<(Vec<u8>, Option<u8>)>,
    pub crl_number: Option<u8>,
}

impl Default for CrlBuilder {
    fn default() -> Self {
        Self {
            version: true,
            next_update: true,
            generalized_time: false,
            revoked: Vec::new(),
            crl_number: None,
        }
    }
}

impl CrlBuilder {
    pub fn with_serials(serials: &[&[u8]]) -> Self {
        Self {
            revoked: serials.iter().map(|s| (s.to_vec(), None)).collect(),
            ..Self::default()
        }
    }

    fn time(&self, utc: &[u8], generalized: &[u8]) -> Vec<u8> {
        if self.generalized_time {
            tlv(tag::GENERALIZED_TIME, generalized)
        } else {
            tlv(tag::UTC_TIME, utc)
        }
    }

    pub fn tbs(&self) -> Vec<u8> {
        let mut fields = Vec::new();
        if self.version {
            fields.push(tlv(tag::INTEGER, &[0x01]));
        }
        fields.push(seq(&[tlv(0x06, SIG_ALG_OID)]));
        fields.push(seq(&[tlv(
            0x31,
            &seq(&[tlv(0x06, CN_OID), tlv(0x0C, b"Test CA")]),
        )]));
        fields.push(self.time(b"240101000000Z", b"20240101000000Z"));
        if self.next_update {
            fields.push(self.time(b"240201000000Z", b"20240201000000Z"));
        }
        if !self.revoked.is_empty() {
            let entries: Vec<Vec<u8>> = self
                .revoked
                .iter()
                .map(|(serial, reason)| {
                    let mut parts = vec![
                        tlv(tag::INTEGER, serial),
                        tlv(tag::UTC_TIME, b"240115103000Z"),
                    ];
                    if let Some(code) = reason {
                        parts.push(seq(&[extension(REASON_CODE_OID, tlv(0x0A, &[*code]))]));
                    }
                    seq(&parts)
                })
                .collect();
            fields.push(seq(&entries));
        }
        if let Some(number) = self.crl_number {
            fields.push(tlv(
                tag::CONTEXT_0,
                &seq(&[extension(CRL_NUMBER_OID, tlv(tag::INTEGER, &[number]))]),
            ));
        }
        seq(&fields)
    }

    pub fn build(&self) -> Vec<u8> {
        seq(&[
            self.tbs(),
            seq(&[tlv(0x06, SIG_ALG_OID)]),
            tlv(0x03, &[0x00, 0xDE, 0xAD, 0xBE, 0xEF]),
        ])
    }
}
