//! Entry row geometry and codec

use std::ops::Range;

/// Byte geometry of one entry row.
///
/// Rows are `offset(8) | length(8) | checksum(8, optional) | key`, every
/// integer little-endian. All rows of one index share a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLayout {
    /// Key width in bytes
    pub key_length: usize,
    /// Whether rows carry a checksum field
    pub with_checksum: bool,
}

impl EntryLayout {
    /// Geometry for the given key width and checksum choice.
    pub const fn new(key_length: usize, with_checksum: bool) -> Self {
        Self {
            key_length,
            with_checksum,
        }
    }

    /// Size of the fixed fields before the key.
    pub const fn fixed_size(with_checksum: bool) -> usize {
        if with_checksum { 24 } else { 16 }
    }

    /// Byte position of the key within a row.
    pub const fn key_offset(&self) -> usize {
        Self::fixed_size(self.with_checksum)
    }

    /// Total row size in bytes.
    pub const fn entry_size(&self) -> usize {
        self.key_offset() + self.key_length
    }

    /// Key byte range within a row.
    pub fn key_range(&self) -> Range<usize> {
        self.key_offset()..self.entry_size()
    }
}

/// Decoded view of one entry row.
///
/// The key borrows from the underlying row storage; entries are plain values
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Byte offset of the record in its source stream
    pub offset: u64,
    /// Record length in bytes
    pub length: u64,
    /// Integrity checksum of the record bytes, when the index carries them
    pub checksum: Option<u64>,
    /// Key bytes ordering this entry
    pub key: &'a [u8],
}

impl<'a> Entry<'a> {
    /// Decodes a row, `None` when it is shorter than the layout requires.
    pub fn parse(row: &'a [u8], layout: EntryLayout) -> Option<Self> {
        if row.len() < layout.entry_size() {
            return None;
        }

        let offset = u64::from_le_bytes(row.get(0..8)?.try_into().ok()?);
        let length = u64::from_le_bytes(row.get(8..16)?.try_into().ok()?);
        let checksum = if layout.with_checksum {
            Some(u64::from_le_bytes(row.get(16..24)?.try_into().ok()?))
        } else {
            None
        };
        let key = row.get(layout.key_range())?;

        Some(Self {
            offset,
            length,
            checksum,
            key,
        })
    }

    /// Appends this entry's row encoding to `out`.
    ///
    /// The key width and checksum presence must match the layout.
    pub fn write_into(&self, layout: EntryLayout, out: &mut Vec<u8>) {
        debug_assert_eq!(self.key.len(), layout.key_length);
        debug_assert_eq!(self.checksum.is_some(), layout.with_checksum);

        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
        if layout.with_checksum {
            out.extend_from_slice(&self.checksum.unwrap_or_default().to_le_bytes());
        }
        out.extend_from_slice(self.key);
    }
}
