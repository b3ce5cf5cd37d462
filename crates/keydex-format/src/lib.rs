//! Sorted binary key index over record streams
//!
//! keydex-format reduces each record of a stream to a fixed-length key,
//! pairs it with the record's source offset and length (and an optional
//! integrity checksum), radix-sorts the resulting entries by key bytes, and
//! reads/writes the result as a compact little-endian stream format. The
//! sorted entry table supports binary-search lookup by key.
//!
//! # Supported Pieces
//!
//! - **Key functions**: xxHash digests (XXH32/XXH64/XXH3/XXH3-128) or a
//!   literal record prefix, selected per build
//! - **Record sources**: in-memory slices, delimiter-framed streams,
//!   fixed-size frames
//! - **Sort engine**: stable LSD radix sort over packed fixed-width rows
//! - **Index codec**: symmetric write/read of the header + entry table
//!
//! # Usage
//!
//! ```rust
//! use keydex_format::{build, BuildOptions, DelimitedRecords, Index};
//! use std::io::Cursor;
//!
//! let input = Cursor::new(b"charlie\nalpha\nbravo\n".to_vec());
//! let mut records = DelimitedRecords::new(input);
//!
//! // Default options: 8-byte XXH64 keys, no checksums.
//! let index = build(BuildOptions::default(), &mut records)?;
//! assert_eq!(index.len(), 3);
//!
//! let mut bytes = Vec::new();
//! index.write(&mut bytes)?;
//! assert_eq!(Index::read(&mut bytes.as_slice())?, index);
//! # Ok::<(), keydex_format::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod key;
pub mod record;
pub mod sort;

pub use error::{Error, Result};
pub use index::{
    build, BuildOptions, Entry, EntryLayout, Header, Index, IndexBuilder, DESCRIPTOR_CHECKSUM,
    HEADER_SIZE, INDEX_MAGIC,
};
pub use key::{checksum64, KeyFunction, DEFAULT_KEY_LENGTH};
pub use record::{DelimitedRecords, FixedRecords, Record, RecordSource, SliceRecords};
