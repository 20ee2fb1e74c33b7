use super::{DerError, Result};

/// Decoded tag and length of one TLV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: u8,
    /// Length of the value in bytes
    pub length: usize,
    /// Tag byte plus length field
    pub header_len: usize,
}

impl Header {
    pub fn value_start(&self, offset: usize) -> usize {
        offset + self.header_len
    }

    pub fn value_end(&self, offset: usize) -> usize {
        offset + self.header_len + self.length
    }
}

/// Reads the tag/length header of the TLV starting at `offset`.
///
/// The value itself is bounds-checked against `data` but not decoded.
pub fn read_header(data: &[u8], offset: usize) -> Result<Header> {
    if offset.checked_add(2).is_none_or(|end| end > data.len()) {
        return Err(DerError::TruncatedHeader { offset });
    }

    let tag = data[offset];
    let first = data[offset + 1];

    let (length, length_field) = if first & 0x80 == 0 {
        (first as usize, 1)
    } else {
        let size = (first & 0x7F) as usize;
        if size == 0 {
            return Err(DerError::IndefiniteLength { offset });
        }
        if size > std::mem::size_of::<usize>() {
            return Err(DerError::LengthTooLarge { offset, size });
        }

        let start = offset + 2;
        let bytes = data
            .get(start..start + size)
            .ok_or(DerError::TruncatedHeader { offset })?;
        let length = bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        (length, 1 + size)
    };

    let header = Header {
        tag,
        length,
        header_len: 1 + length_field,
    };

    let value_start = header.value_start(offset);
    if value_start
        .checked_add(length)
        .is_none_or(|end| end > data.len())
    {
        return Err(DerError::ValueOverrun { offset, length });
    }

    Ok(header)
}
