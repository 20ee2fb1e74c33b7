use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::errors::CheckError;
use super::formats::{self, ListFormat};
use super::models::CheckResult;
use super::ports::ListFetcher;
use crate::pki::crl::{self, serial};

/// Stateless revocation checker.
///
/// Every call fetches the list again; nothing is cached between checks.
#[derive(Debug, Clone)]
pub struct RevocationChecker<F> {
    fetcher: F,
}

impl<F: ListFetcher> RevocationChecker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Checks `serial` against the list at `list_url`.
    ///
    /// Never fails: errors are reported inside the result with
    /// `revoked: false`.
    #[instrument(skip(self))]
    pub async fn check(&self, serial: Option<&str>, list_url: Option<&str>) -> CheckResult {
        let echoed = serial
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();

        match self.try_check(serial, list_url).await {
            Ok(revoked) => {
                info!(serial = %echoed, revoked, "Revocation check completed");
                CheckResult::verdict(echoed, revoked)
            }
            Err(e) => {
                warn!(serial = %echoed, "Revocation check failed: {e}");
                CheckResult::failure(echoed, &e)
            }
        }
    }

    async fn try_check(
        &self,
        serial: Option<&str>,
        list_url: Option<&str>,
    ) -> Result<bool, CheckError> {
        let serial = serial
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CheckError::MissingSerial)?;
        let list_url = list_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(CheckError::MissingListUrl)?;

        let list = self.fetcher.fetch(list_url).await?;
        if !list.is_success() {
            return Err(CheckError::Status(list.status));
        }

        let format = ListFormat::detect(list.content_type.as_deref(), list_url, &list.body);
        debug!(
            ?format,
            content_type = list.content_type.as_deref().unwrap_or(""),
            bytes = list.body.len(),
            "Fetched revocation list"
        );

        match format {
            ListFormat::Json => formats::json_contains(&list.body, serial),
            ListFormat::Text => Ok(formats::text_contains(&list.body, serial)),
            ListFormat::Binary => check_crl(&list.body, serial),
        }
    }
}

fn check_crl(body: &[u8], serial: &str) -> Result<bool, CheckError> {
    let summary = crl::parse_crl(body)?;
    debug!(
        entries = summary.revoked.len(),
        this_update = ?summary.this_update,
        next_update = ?summary.next_update,
        crl_number = ?summary.crl_number,
        "Parsed CRL"
    );
    if summary.is_stale(Utc::now()) {
        warn!(next_update = ?summary.next_update, "CRL is past its nextUpdate");
    }

    let Some(wanted) = serial::canonicalize_input(serial) else {
        debug!(serial, "Serial is not hexadecimal, cannot appear in a CRL");
        return Ok(false);
    };

    Ok(match summary.revoked.get(&wanted) {
        Some(entry) => {
            debug!(
                serial = %wanted,
                revoked_at = ?entry.revocation_date,
                reason = ?entry.reason,
                "Serial listed in CRL"
            );
            true
        }
        None => false,
    })
}
