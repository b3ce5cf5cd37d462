//! Index deserialization
//!
//! Reads exactly `HEADER_SIZE + entry_count * entry_size` bytes from the
//! stream; anything after the entry table belongs to the caller and is left
//! unread. A stream that ends early fails with a truncation error and no
//! partial index is returned.

use std::io::{self, Read};

use tracing::debug;

use crate::error::{Error, Result};
use crate::index::header::Header;
use crate::index::Index;

/// Upper bound on how much the row buffer grows per read step.
const ENTRY_READ_CHUNK: usize = 1 << 20;

/// Reads and validates a complete index from the front of a stream.
pub(crate) fn read_index<R: Read>(source: &mut R) -> Result<Index> {
    let header = Header::read_from(source)?;
    let layout = header.validate()?;

    let table_size = header
        .entry_count
        .checked_mul(header.entry_size)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or(Error::IndexTooLarge {
            entry_count: header.entry_count,
            entry_size: header.entry_size,
        })?;
    debug!(
        entry_count = header.entry_count,
        entry_size = header.entry_size,
        key_length = layout.key_length,
        with_checksum = layout.with_checksum,
        "reading index"
    );

    // Grown in bounded steps rather than sized from the header, so a header
    // overstating its entry count fails on truncation, not on allocation.
    let mut rows = Vec::with_capacity(table_size.min(ENTRY_READ_CHUNK));
    let mut filled = 0;
    while filled < table_size {
        let target = table_size.min(filled + ENTRY_READ_CHUNK);
        rows.resize(target, 0);
        while filled < target {
            match source.read(&mut rows[filled..target]) {
                Ok(0) => {
                    return Err(Error::TruncatedEntries {
                        expected: table_size as u64,
                        actual: filled as u64,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(Index::from_parts(header, layout, rows))
}
