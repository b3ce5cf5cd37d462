//! Sorted binary key index
//!
//! An index maps fixed-length keys to (offset, length) ranges in some source
//! stream. Entries are held as packed rows in key order, so lookups are
//! binary searches and the on-disk form is the in-memory form with a header
//! in front.
//!
//! # Format Structure
//!
//! ```text
//! Index (all integers little-endian):
//! ├── Header (21 bytes)
//! │   ├── magic (u32, 0xB8C97B49)
//! │   ├── entry_size (u64)
//! │   ├── entry_count (u64)
//! │   └── descriptor (u8, bit 0: checksum present, bits 1-7 reserved)
//! └── Entry table (entry_count × entry_size bytes)
//!     ├── offset (u64)
//!     ├── length (u64)
//!     ├── checksum (u64, only if descriptor bit 0 set)
//!     └── key (entry_size - 16 - 8·checksum bytes)
//! ```
//!
//! Entries are in non-decreasing unsigned lexicographic key order; entries
//! with equal keys keep the order their records were ingested in.
//!
//! # Usage
//!
//! ```rust
//! use keydex_format::{build, BuildOptions, Index, KeyFunction, SliceRecords};
//!
//! let options = BuildOptions {
//!     key_length: 4,
//!     key_function: KeyFunction::Prefix,
//!     with_checksum: false,
//! };
//! let mut records = SliceRecords::contiguous(vec![
//!     b"beta".to_vec(),
//!     b"alfa".to_vec(),
//! ]);
//!
//! let index = build(options, &mut records)?;
//! let mut bytes = Vec::new();
//! index.write(&mut bytes)?;
//!
//! let index = Index::read(&mut bytes.as_slice())?;
//! let hit = index.find(b"alfa").ok_or("missing")?;
//! assert_eq!(hit.offset, 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub(crate) mod builder;
mod entry;
pub(crate) mod header;
mod reader;
mod writer;

use std::io::{Read, Write};

use crate::error::Result;

pub use builder::{build, BuildOptions, IndexBuilder};
pub use entry::{Entry, EntryLayout};
pub use header::{Header, DESCRIPTOR_CHECKSUM, HEADER_SIZE, INDEX_MAGIC};

/// A complete in-memory index: header plus sorted packed entry rows.
///
/// Produced by [`build`]/[`IndexBuilder`] or parsed back with
/// [`Index::read`]; serialized with [`Index::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    header: Header,
    layout: EntryLayout,
    rows: Vec<u8>,
}

impl Index {
    /// Assembles an index from already-sorted rows.
    pub(crate) fn from_parts(header: Header, layout: EntryLayout, rows: Vec<u8>) -> Self {
        debug_assert_eq!(rows.len() as u64, header.entry_count * header.entry_size);
        Self {
            header,
            layout,
            rows,
        }
    }

    /// Index metadata.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Entry row geometry.
    pub const fn layout(&self) -> EntryLayout {
        self.layout
    }

    /// Packed entry rows in sorted order.
    pub fn rows(&self) -> &[u8] {
        &self.rows
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.rows.len() / self.layout.entry_size()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entry at a sorted position, `None` past the end.
    pub fn entry(&self, position: usize) -> Option<Entry<'_>> {
        let stride = self.layout.entry_size();
        let row = self.rows.get(position.checked_mul(stride)?..)?;
        Entry::parse(row, self.layout)
    }

    /// Entries in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.rows
            .chunks_exact(self.layout.entry_size())
            .filter_map(|row| Entry::parse(row, self.layout))
    }

    fn key_at(&self, position: usize) -> &[u8] {
        let start = position * self.layout.entry_size();
        &self.rows[start..start + self.layout.entry_size()][self.layout.key_range()]
    }

    /// Sorted position of the first entry with a key `>= key`.
    fn lower_bound(&self, key: &[u8]) -> usize {
        let mut low = 0;
        let mut high = self.len();
        while low < high {
            let mid = low + (high - low) / 2;
            if self.key_at(mid) < key {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// First entry whose key equals `key`, by binary search.
    ///
    /// Among duplicates this is the earliest-inserted entry (the sort is
    /// stable). A key of the wrong length matches nothing.
    pub fn find(&self, key: &[u8]) -> Option<Entry<'_>> {
        if key.len() != self.layout.key_length {
            return None;
        }
        let at = self.lower_bound(key);
        self.entry(at).filter(|entry| entry.key == key)
    }

    /// Every entry whose key equals `key`, in sorted (= insertion) order.
    pub fn find_all<'a>(&'a self, key: &'a [u8]) -> impl Iterator<Item = Entry<'a>> {
        let start = if key.len() == self.layout.key_length {
            self.lower_bound(key)
        } else {
            self.len()
        };
        (start..self.len())
            .map_while(|at| self.entry(at))
            .take_while(move |entry| entry.key == key)
    }

    /// Serializes the index to a byte sink.
    pub fn write<W: Write>(&self, sink: &mut W) -> Result<()> {
        writer::write_index(self, sink)
    }

    /// Deserializes an index from the front of a byte stream.
    ///
    /// Bytes after the entry table are left unread.
    pub fn read<R: Read>(source: &mut R) -> Result<Self> {
        reader::read_index(source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::key::KeyFunction;
    use crate::record::{Record, SliceRecords};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prefix_index(records: &[(u64, &[u8])], key_length: usize) -> Index {
        let options = BuildOptions {
            key_length,
            key_function: KeyFunction::Prefix,
            with_checksum: false,
        };
        let records = records
            .iter()
            .map(|&(offset, data)| Record {
                offset,
                data: data.to_vec(),
            })
            .collect();
        build(options, &mut SliceRecords::new(records)).unwrap()
    }

    #[test]
    fn positional_access_is_bounded() {
        let index = prefix_index(&[(0, b"ab")], 2);
        assert!(index.entry(0).is_some());
        assert!(index.entry(1).is_none());
        assert!(index.entry(usize::MAX).is_none());
    }

    #[test]
    fn find_hits_present_keys_and_misses_absent_ones() {
        let index = prefix_index(&[(0, b"cc"), (2, b"aa"), (4, b"bb")], 2);

        assert_eq!(index.find(b"aa").unwrap().offset, 2);
        assert_eq!(index.find(b"bb").unwrap().offset, 4);
        assert_eq!(index.find(b"cc").unwrap().offset, 0);
        assert!(index.find(b"ab").is_none());
        assert!(index.find(b"zz").is_none());
    }

    #[test]
    fn find_rejects_wrong_length_keys() {
        let index = prefix_index(&[(0, b"aa")], 2);
        assert!(index.find(b"a").is_none());
        assert!(index.find(b"aaa").is_none());
        assert!(index.find(b"").is_none());
    }

    #[test]
    fn find_returns_the_earliest_inserted_duplicate() {
        let index = prefix_index(&[(0, b"kk"), (9, b"kk"), (4, b"aa")], 2);
        assert_eq!(index.find(b"kk").unwrap().offset, 0);
    }

    #[test]
    fn find_all_yields_duplicates_in_insertion_order() {
        let index = prefix_index(&[(0, b"kk"), (9, b"kk"), (4, b"aa"), (7, b"zz")], 2);
        let offsets: Vec<u64> = index.find_all(b"kk").map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0, 9]);

        assert_eq!(index.find_all(b"zz").count(), 1);
        assert_eq!(index.find_all(b"qq").count(), 0);
        assert_eq!(index.find_all(b"k").count(), 0);
    }

    #[test]
    fn find_on_an_empty_index() {
        let index = prefix_index(&[], 2);
        assert!(index.find(b"aa").is_none());
        assert_eq!(index.find_all(b"aa").count(), 0);
    }

    #[test]
    fn in_memory_round_trip_preserves_everything() {
        let index = prefix_index(&[(0, b"cc"), (5, b"aa"), (9, b"aa")], 2);

        let mut bytes = Vec::new();
        index.write(&mut bytes).unwrap();
        let parsed = Index::read(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(parsed, index);
        assert_eq!(parsed.header().entry_count, 3);
    }

    #[test]
    fn empty_index_round_trips() {
        let index = prefix_index(&[], 4);
        assert_eq!(index.header().entry_count, 0);

        let mut bytes = Vec::new();
        index.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let parsed = Index::read(&mut Cursor::new(bytes)).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.header(), index.header());
    }

    #[test]
    fn bad_magic_fails_without_yielding_an_index() {
        let mut bytes = Vec::new();
        prefix_index(&[(0, b"aa")], 2)
            .write(&mut bytes)
            .unwrap();
        bytes[0..4].copy_from_slice(b"NOPE");

        let err = Index::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }

    #[test]
    fn entries_iterator_matches_positional_access() {
        let index = prefix_index(&[(3, b"bb"), (1, b"aa")], 2);
        let via_iter: Vec<_> = index.entries().collect();
        let via_position: Vec<_> = (0..index.len()).map(|i| index.entry(i).unwrap()).collect();
        assert_eq!(via_iter, via_position);
    }
}
