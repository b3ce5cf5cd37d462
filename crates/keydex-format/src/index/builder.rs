//! Index construction from a record stream
//!
//! A build is all-or-nothing: records are ingested into one packed row
//! buffer, the buffer is sorted in a single radix pass sequence, and only
//! then does a header with the final entry count exist. Any ingestion error
//! aborts the build with nothing emitted.

use tracing::{debug, trace};

use crate::error::Result;
use crate::index::entry::{Entry, EntryLayout};
use crate::index::header::Header;
use crate::index::Index;
use crate::key::{checksum64, KeyFunction, DEFAULT_KEY_LENGTH};
use crate::record::{Record, RecordSource};
use crate::sort;

/// Options fixed for the whole of one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Key width in bytes; must match the key function's digest width
    /// unless the function accepts any width
    pub key_length: usize,
    /// Function deriving each record's key
    pub key_function: KeyFunction,
    /// Whether to store a checksum of each record's bytes in its entry
    pub with_checksum: bool,
}

impl Default for BuildOptions {
    /// 8-byte XXH64 keys, no checksums.
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            key_function: KeyFunction::default(),
            with_checksum: false,
        }
    }
}

impl BuildOptions {
    /// Entry geometry these options produce.
    pub const fn layout(&self) -> EntryLayout {
        EntryLayout::new(self.key_length, self.with_checksum)
    }
}

/// Incremental index builder: construct, add records, finish.
///
/// [`build`] wraps this for the common pull-everything case. Records are
/// keyed and encoded as they arrive; sorting happens once in
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct IndexBuilder {
    options: BuildOptions,
    layout: EntryLayout,
    rows: Vec<u8>,
    entry_count: u64,
}

impl IndexBuilder {
    /// Validates the options and opens a build.
    pub fn new(options: BuildOptions) -> Result<Self> {
        options
            .key_function
            .validate_key_length(options.key_length)?;
        let layout = options.layout();
        debug!(
            key_length = options.key_length,
            key_function = %options.key_function,
            with_checksum = options.with_checksum,
            entry_size = layout.entry_size(),
            "starting index build"
        );
        Ok(Self {
            options,
            layout,
            rows: Vec::new(),
            entry_count: 0,
        })
    }

    /// Keys and appends one record.
    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        let key = self.options.key_function.digest(
            &record.data,
            0,
            record.length(),
            self.options.key_length,
        )?;
        let checksum = self
            .options
            .with_checksum
            .then(|| checksum64(&record.data));

        trace!(
            offset = record.offset,
            length = record.length(),
            key = %hex::encode(&key),
            "ingested record"
        );

        Entry {
            offset: record.offset,
            length: record.length(),
            checksum,
            key: &key,
        }
        .write_into(self.layout, &mut self.rows);
        self.entry_count += 1;
        Ok(())
    }

    /// Entries ingested so far.
    pub const fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Sorts the buffer and closes the build into an in-memory [`Index`].
    pub fn finish(mut self) -> Index {
        debug!(entry_count = self.entry_count, "sorting entries");
        sort::sort_rows(
            &mut self.rows,
            self.layout.entry_size(),
            self.layout.key_range(),
        );

        let mut header = Header::for_layout(self.layout);
        header.entry_count = self.entry_count;
        debug!(entry_count = header.entry_count, "index build complete");
        Index::from_parts(header, self.layout, self.rows)
    }
}

/// Builds a sorted index from every record the source yields.
///
/// Fails on the first option, keying, or source error; a failed build
/// produces nothing.
pub fn build<S: RecordSource>(options: BuildOptions, source: &mut S) -> Result<Index> {
    let mut builder = IndexBuilder::new(options)?;
    while let Some(record) = source.next_record()? {
        builder.add_record(&record)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::SliceRecords;
    use pretty_assertions::assert_eq;

    fn record(offset: u64, data: &[u8]) -> Record {
        Record {
            offset,
            data: data.to_vec(),
        }
    }

    fn prefix_options(key_length: usize) -> BuildOptions {
        BuildOptions {
            key_length,
            key_function: KeyFunction::Prefix,
            with_checksum: false,
        }
    }

    #[test]
    fn zero_key_length_is_rejected_at_construction() {
        let err = IndexBuilder::new(prefix_options(0)).unwrap_err();
        assert!(matches!(err, Error::ZeroKeyLength));
    }

    #[test]
    fn digest_width_mismatch_is_rejected_at_construction() {
        let options = BuildOptions {
            key_length: 5,
            key_function: KeyFunction::Xxh64,
            with_checksum: false,
        };
        assert!(matches!(
            IndexBuilder::new(options).unwrap_err(),
            Error::KeyWidthMismatch { .. }
        ));
    }

    #[test]
    fn empty_source_builds_an_empty_index() {
        let mut source = SliceRecords::new(Vec::new());
        let index = build(BuildOptions::default(), &mut source).unwrap();
        assert_eq!(index.header().entry_count, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn entries_come_out_in_key_order() {
        // Keys [0x05, 0x01, 0x05] at offsets [0, 10, 20]: the 0x01 record
        // sorts first and the two 0x05 records keep input order.
        let mut source = SliceRecords::new(vec![
            record(0, &[0x05; 5]),
            record(10, &[0x01; 5]),
            record(20, &[0x05; 5]),
        ]);
        let index = build(prefix_options(1), &mut source).unwrap();

        let order: Vec<(u64, u64, Vec<u8>)> = index
            .entries()
            .map(|e| (e.offset, e.length, e.key.to_vec()))
            .collect();
        assert_eq!(
            order,
            vec![
                (10, 5, vec![0x01]),
                (0, 5, vec![0x05]),
                (20, 5, vec![0x05]),
            ]
        );
    }

    #[test]
    fn duplicate_keys_stay_distinct_entries() {
        let mut source = SliceRecords::new(vec![record(100, b"same"), record(200, b"same")]);
        let index = build(prefix_options(4), &mut source).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.entry(0).unwrap().offset, 100);
        assert_eq!(index.entry(1).unwrap().offset, 200);
    }

    #[test]
    fn single_record_survives_unchanged() {
        let mut source = SliceRecords::new(vec![record(7, b"only record")]);
        let index = build(BuildOptions::default(), &mut source).unwrap();

        assert_eq!(index.len(), 1);
        let entry = index.entry(0).unwrap();
        assert_eq!(entry.offset, 7);
        assert_eq!(entry.length, 11);
        assert_eq!(
            entry.key,
            KeyFunction::Xxh64
                .digest(b"only record", 0, 11, 8)
                .unwrap()
                .as_slice()
        );
    }

    #[test]
    fn checksums_are_stored_when_enabled() {
        let options = BuildOptions {
            with_checksum: true,
            ..BuildOptions::default()
        };
        let mut source = SliceRecords::new(vec![record(0, b"payload")]);
        let index = build(options, &mut source).unwrap();

        assert!(index.header().has_checksum());
        assert_eq!(
            index.entry(0).unwrap().checksum,
            Some(checksum64(b"payload"))
        );
    }

    #[test]
    fn checksums_are_absent_by_default() {
        let mut source = SliceRecords::new(vec![record(0, b"payload")]);
        let index = build(BuildOptions::default(), &mut source).unwrap();

        assert!(!index.header().has_checksum());
        assert_eq!(index.entry(0).unwrap().checksum, None);
    }

    #[test]
    fn source_errors_abort_the_build() {
        struct FailingSource;
        impl RecordSource for FailingSource {
            fn next_record(&mut self) -> Result<Option<Record>> {
                Err(Error::RecordSource(std::io::Error::other("disk gone")))
            }
        }

        let err = build(BuildOptions::default(), &mut FailingSource).unwrap_err();
        assert!(matches!(err, Error::RecordSource(_)));

        // The underlying I/O error stays reachable through the chain.
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk gone");
    }

    #[test]
    fn incremental_builder_matches_the_pull_loop() {
        let records = vec![record(0, b"bb"), record(2, b"aa")];

        let mut builder = IndexBuilder::new(prefix_options(2)).unwrap();
        for r in &records {
            builder.add_record(r).unwrap();
        }
        assert_eq!(builder.entry_count(), 2);
        let incremental = builder.finish();

        let mut source = SliceRecords::new(records);
        let pulled = build(prefix_options(2), &mut source).unwrap();

        assert_eq!(incremental.header(), pulled.header());
        assert_eq!(incremental.rows(), pulled.rows());
    }
}
