//! Key derivation for index entries
//!
//! A key function reduces a byte range of a record to a fixed-length key.
//! Hash functions have a fixed digest width; `Prefix` takes the leading
//! bytes of the range verbatim and works with any configured key length.

use crate::error::{Error, Result};
use xxhash_rust::xxh3::{xxh3_128, xxh3_64};
use xxhash_rust::xxh32::xxh32;
use xxhash_rust::xxh64::xxh64;

/// Key length produced by the default key function.
pub const DEFAULT_KEY_LENGTH: usize = 8;

/// Key function selection for a build.
///
/// Digest bytes are the hash value's little-endian encoding, matching the
/// byte order of every other integer in the format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFunction {
    /// 4-byte XXH32 digest (seed 0)
    Xxh32,
    /// 8-byte XXH64 digest (seed 0)
    #[default]
    Xxh64,
    /// 8-byte XXH3 digest
    Xxh3,
    /// 16-byte XXH3-128 digest
    Xxh128,
    /// Leading `key_length` record bytes, zero-padded when the record is
    /// shorter
    Prefix,
}

impl KeyFunction {
    /// Fixed digest width in bytes, or `None` when any key length works.
    pub const fn digest_width(self) -> Option<usize> {
        match self {
            Self::Xxh32 => Some(4),
            Self::Xxh64 | Self::Xxh3 => Some(8),
            Self::Xxh128 => Some(16),
            Self::Prefix => None,
        }
    }

    /// Short name used in logs and CLI output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xxh32 => "xxh32",
            Self::Xxh64 => "xxh64",
            Self::Xxh3 => "xxh3",
            Self::Xxh128 => "xxh128",
            Self::Prefix => "prefix",
        }
    }

    /// Checks that `key_length` is usable with this function.
    pub fn validate_key_length(self, key_length: usize) -> Result<()> {
        if key_length == 0 {
            return Err(Error::ZeroKeyLength);
        }
        match self.digest_width() {
            Some(digest) if digest != key_length => Err(Error::KeyWidthMismatch {
                function: self.name(),
                digest,
                configured: key_length,
            }),
            _ => Ok(()),
        }
    }

    /// Derives the key for `length` bytes of `source` starting at `offset`.
    ///
    /// Deterministic and side-effect-free. `key_length` only matters for
    /// [`KeyFunction::Prefix`]; hash functions emit their fixed width.
    pub fn digest(
        self,
        source: &[u8],
        offset: u64,
        length: u64,
        key_length: usize,
    ) -> Result<Vec<u8>> {
        let available = source.len() as u64;
        let end = offset.checked_add(length).filter(|end| *end <= available);
        let Some(end) = end else {
            return Err(Error::OutOfRange {
                offset,
                length,
                available,
            });
        };
        let data = &source[offset as usize..end as usize];

        Ok(match self {
            Self::Xxh32 => xxh32(data, 0).to_le_bytes().to_vec(),
            Self::Xxh64 => xxh64(data, 0).to_le_bytes().to_vec(),
            Self::Xxh3 => xxh3_64(data).to_le_bytes().to_vec(),
            Self::Xxh128 => xxh3_128(data).to_le_bytes().to_vec(),
            Self::Prefix => {
                let mut key = vec![0u8; key_length];
                let take = data.len().min(key_length);
                key[..take].copy_from_slice(&data[..take]);
                key
            }
        })
    }
}

impl std::fmt::Display for KeyFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 64-bit integrity checksum over record bytes (XXH3).
///
/// This is the function behind the optional per-entry checksum field;
/// consumers can recompute it over retrieved record bytes to verify them.
pub fn checksum64(data: &[u8]) -> u64 {
    xxh3_64(data)
}
