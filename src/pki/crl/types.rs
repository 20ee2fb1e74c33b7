use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// CRL entry reason codes (RFC 5280 §5.3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl RevocationReason {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::KeyCompromise),
            2 => Some(Self::CaCompromise),
            3 => Some(Self::AffiliationChanged),
            4 => Some(Self::Superseded),
            5 => Some(Self::CessationOfOperation),
            6 => Some(Self::CertificateHold),
            8 => Some(Self::RemoveFromCrl),
            9 => Some(Self::PrivilegeWithdrawn),
            10 => Some(Self::AaCompromise),
            _ => None,
        }
    }
}

/// One revoked certificate as listed in a CRL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedEntry {
    /// Normalized uppercase hex serial
    pub serial: String,
    pub revocation_date: Option<DateTime<Utc>>,
    pub reason: Option<RevocationReason>,
}

impl RevokedEntry {
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            revocation_date: None,
            reason: None,
        }
    }
}

/// Revoked serials extracted from one CRL, keyed by normalized serial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevokedSet {
    entries: HashMap<String, RevokedEntry>,
}

impl RevokedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; a repeated serial keeps the first occurrence
    pub fn insert(&mut self, entry: RevokedEntry) {
        self.entries.entry(entry.serial.clone()).or_insert(entry);
    }

    /// `serial` must already be normalized
    pub fn contains(&self, serial: &str) -> bool {
        self.entries.contains_key(serial)
    }

    pub fn get(&self, serial: &str) -> Option<&RevokedEntry> {
        self.entries.get(serial)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RevokedEntry> {
        self.entries.values()
    }

    pub fn serials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<RevokedEntry> for RevokedSet {
    fn from_iter<I: IntoIterator<Item = RevokedEntry>>(iter: I) -> Self {
        let mut set = RevokedSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

/// Everything read from a CRL, the revoked set plus diagnostic metadata
#[derive(Debug, Clone, Default)]
pub struct CrlSummary {
    /// Decoded `version` field; `None` means v1
    pub version: Option<u8>,
    pub this_update: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
    /// `cRLNumber` extension as hex
    pub crl_number: Option<String>,
    pub revoked: RevokedSet,
}

impl CrlSummary {
    /// True when the CRL announces a `nextUpdate` that already passed
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.next_update.is_some_and(|next| next < now)
    }
}
