pub mod crl;

// Re-export commonly used types
pub use crl::{CrlError, CrlSummary, RevokedSet, parse_crl};
