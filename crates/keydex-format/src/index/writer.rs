//! Index serialization
//!
//! The destination may be forward-only, so the header goes out with its
//! final entry count already in place; the buffered build model guarantees
//! the count is known before the first byte is written.

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::index::Index;

/// Writes the header and packed entry table, then flushes.
pub(crate) fn write_index<W: Write>(index: &Index, sink: &mut W) -> Result<()> {
    let header = index.header();
    debug!(
        entry_count = header.entry_count,
        entry_size = header.entry_size,
        descriptor = header.descriptor,
        "writing index"
    );

    header.write_to(sink)?;
    sink.write_all(index.rows())?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::error::Error;
    use crate::index::builder::{build, BuildOptions};
    use crate::index::header::HEADER_SIZE;
    use crate::key::KeyFunction;
    use crate::record::SliceRecords;
    use pretty_assertions::assert_eq;

    fn small_index() -> crate::index::Index {
        let options = BuildOptions {
            key_length: 2,
            key_function: KeyFunction::Prefix,
            with_checksum: false,
        };
        let mut source = SliceRecords::contiguous(vec![b"zz".to_vec(), b"aa".to_vec()]);
        build(options, &mut source).unwrap()
    }

    #[test]
    fn written_size_is_header_plus_entry_table() {
        let index = small_index();
        let mut out = Vec::new();
        index.write(&mut out).unwrap();
        assert_eq!(out.len(), HEADER_SIZE + 2 * 18);
    }

    #[test]
    fn write_failures_surface_as_io_errors() {
        struct BrokenSink;
        impl std::io::Write for BrokenSink {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink broke"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = small_index().write(&mut BrokenSink).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
