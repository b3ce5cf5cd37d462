//! Index header codec and geometry validation

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::index::entry::EntryLayout;

/// Magic number opening every index stream.
pub const INDEX_MAGIC: u32 = 0xB8C9_7B49;

/// Serialized header size in bytes.
pub const HEADER_SIZE: usize = 21;

/// Descriptor bit announcing per-entry checksums. All other bits are
/// reserved and must be zero.
pub const DESCRIPTOR_CHECKSUM: u8 = 0b0000_0001;

/// Index metadata: entry geometry and count.
///
/// The magic number is implicit; it is emitted and checked by the codec and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Bytes per entry, key and optional checksum included
    pub entry_size: u64,
    /// Number of entries in the table
    pub entry_count: u64,
    /// Presence flags for optional entry fields
    pub descriptor: u8,
}

impl Header {
    /// Header for the given entry geometry with an entry count of zero.
    pub fn for_layout(layout: EntryLayout) -> Self {
        Self {
            entry_size: layout.entry_size() as u64,
            entry_count: 0,
            descriptor: if layout.with_checksum {
                DESCRIPTOR_CHECKSUM
            } else {
                0
            },
        }
    }

    /// Whether entries carry a checksum field.
    pub const fn has_checksum(&self) -> bool {
        self.descriptor & DESCRIPTOR_CHECKSUM != 0
    }

    /// Checks descriptor and entry size consistency, returning the entry
    /// geometry they describe.
    ///
    /// `entry_size` must leave room for at least one key byte beyond the
    /// fixed fields.
    pub fn validate(&self) -> Result<EntryLayout> {
        if self.descriptor & !DESCRIPTOR_CHECKSUM != 0 {
            return Err(Error::ReservedDescriptorBits(self.descriptor));
        }

        let with_checksum = self.has_checksum();
        let fixed = EntryLayout::fixed_size(with_checksum) as u64;
        if self.entry_size <= fixed {
            return Err(Error::EntrySizeTooSmall {
                entry_size: self.entry_size,
                minimum: fixed + 1,
            });
        }

        let key_length = usize::try_from(self.entry_size - fixed).map_err(|_| {
            Error::IndexTooLarge {
                entry_count: self.entry_count,
                entry_size: self.entry_size,
            }
        })?;
        Ok(EntryLayout {
            key_length,
            with_checksum,
        })
    }

    /// Serializes the header, magic first, all fields little-endian.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_u32::<LittleEndian>(INDEX_MAGIC)?;
        sink.write_u64::<LittleEndian>(self.entry_size)?;
        sink.write_u64::<LittleEndian>(self.entry_count)?;
        sink.write_u8(self.descriptor)?;
        Ok(())
    }

    /// Reads and checks a header from the front of a stream.
    pub fn read_from<R: Read>(source: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        let mut filled = 0;
        while filled < HEADER_SIZE {
            match source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        if filled < HEADER_SIZE {
            return Err(Error::TruncatedHeader {
                actual: filled,
                minimum: HEADER_SIZE,
            });
        }

        let mut cursor = &buf[..];
        let magic = cursor.read_u32::<LittleEndian>()?;
        if magic != INDEX_MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        Ok(Self {
            entry_size: cursor.read_u64::<LittleEndian>()?,
            entry_count: cursor.read_u64::<LittleEndian>()?,
            descriptor: cursor.read_u8()?,
        })
    }
}
