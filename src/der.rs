//! Minimal ASN.1 DER decoding
//!
//! Only what is needed to walk a CRL: single-byte tags, definite lengths and
//! a tree of constructed values. No knowledge of X.509 lives here.

mod reader;
pub mod time;
mod tree;

pub use reader::{Header, read_header};
pub use tree::{DerNode, DerTree, MAX_DEPTH, MAX_NODES, NodeId, NodeRef};

pub type Result<T> = std::result::Result<T, DerError>;

/// Universal tags used while navigating revocation lists
pub mod tag {
    pub const INTEGER: u8 = 0x02;
    pub const UTC_TIME: u8 = 0x17;
    pub const GENERALIZED_TIME: u8 = 0x18;
    pub const SEQUENCE: u8 = 0x30;
    pub const CONTEXT_0: u8 = 0xA0;

    /// Bit 6 of the identifier octet marks a constructed encoding
    pub const CONSTRUCTED: u8 = 0x20;

    #[inline]
    pub fn is_constructed(tag: u8) -> bool {
        tag & CONSTRUCTED != 0
    }

    #[inline]
    pub fn is_time(tag: u8) -> bool {
        tag == UTC_TIME || tag == GENERALIZED_TIME
    }
}

/// Malformed encoding errors raised while decoding DER
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DerError {
    #[error("malformed encoding: truncated header at offset {offset}")]
    TruncatedHeader { offset: usize },

    #[error("malformed encoding: indefinite length at offset {offset}")]
    IndefiniteLength { offset: usize },

    #[error("malformed encoding: length field of {size} bytes at offset {offset} is too large")]
    LengthTooLarge { offset: usize, size: usize },

    #[error("malformed encoding: value of {length} bytes at offset {offset} exceeds the buffer")]
    ValueOverrun { offset: usize, length: usize },

    #[error("malformed encoding: child at offset {offset} ends past its parent at {parent_end}")]
    ChildOverrun { offset: usize, parent_end: usize },

    #[error("malformed encoding: nesting deeper than {max} levels at offset {offset}")]
    DepthExceeded { offset: usize, max: usize },

    #[error("malformed encoding: more than {max} nodes at offset {offset}")]
    TooManyNodes { offset: usize, max: usize },
}
