//! Revocation checking against a caller-supplied list URL
//!
//! The list is fetched through the [`ListFetcher`] port and may be a JSON
//! document, a plain-text line list or a DER/PEM CRL.

mod errors;
pub mod formats;
mod models;
pub mod ports;
mod service;

pub use errors::CheckError;
pub use formats::ListFormat;
pub use models::CheckResult;
pub use ports::{FetchError, FetchedList, ListFetcher};
pub use service::RevocationChecker;
