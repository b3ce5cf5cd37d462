//! Error types for index building and parsing

use thiserror::Error;

/// Errors produced while building, writing, or reading an index
#[derive(Debug, Error)]
pub enum Error {
    /// Build options requested an empty key
    #[error("key length must be at least one byte")]
    ZeroKeyLength,

    /// Configured key length disagrees with the key function's output width
    #[error("{function} produces {digest}-byte keys, but key_length is {configured}")]
    KeyWidthMismatch {
        /// Name of the configured key function
        function: &'static str,
        /// Fixed digest width of that function
        digest: usize,
        /// Key length requested in the build options
        configured: usize,
    },

    /// The record source failed while producing a record
    #[error("record source error: {0}")]
    RecordSource(#[source] std::io::Error),

    /// A key function addressed bytes outside the record
    #[error("range {offset}+{length} is outside the {available}-byte record")]
    OutOfRange {
        /// Requested start of the range
        offset: u64,
        /// Requested length of the range
        length: u64,
        /// Bytes actually available
        available: u64,
    },

    /// The stream does not begin with the index magic number
    #[error("bad magic {found:#010x} (expected 0xb8c97b49)")]
    BadMagic {
        /// Magic value found in the stream
        found: u32,
    },

    /// Reserved descriptor bits were set
    #[error("descriptor {0:#04x} has reserved bits set")]
    ReservedDescriptorBits(u8),

    /// Declared entry size cannot hold the fixed fields plus a key
    #[error("entry size {entry_size} is too small (minimum {minimum} for this descriptor)")]
    EntrySizeTooSmall {
        /// Entry size declared in the header
        entry_size: u64,
        /// Smallest valid entry size for the descriptor
        minimum: u64,
    },

    /// Declared entry table cannot be addressed in memory
    #[error("entry table of {entry_count} x {entry_size} bytes does not fit in memory")]
    IndexTooLarge {
        /// Entry count declared in the header
        entry_count: u64,
        /// Entry size declared in the header
        entry_size: u64,
    },

    /// The stream ended inside the header
    #[error("truncated header: got {actual} bytes, need {minimum}")]
    TruncatedHeader {
        /// Bytes actually read
        actual: usize,
        /// Bytes a header requires
        minimum: usize,
    },

    /// The stream ended inside the entry table
    #[error("truncated entries: expected {expected} bytes, got {actual}")]
    TruncatedEntries {
        /// Bytes the header's entry count requires
        expected: u64,
        /// Bytes actually read
        actual: u64,
    },

    /// I/O failure on the destination or source stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, Error>;
