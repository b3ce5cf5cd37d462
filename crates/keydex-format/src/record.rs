//! Record sources feeding the index builder
//!
//! A record source yields a finite, single-pass sequence of framed records.
//! Framing is the source's business; the builder only consumes the resulting
//! (offset, bytes) pairs. End of stream is `Ok(None)`, never an error.

use std::io::{self, BufRead, Read};
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// One framed record from the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Byte offset of the record in the source stream
    pub offset: u64,
    /// Record bytes, without any framing delimiter
    pub data: Vec<u8>,
}

impl Record {
    /// Record length in bytes.
    pub fn length(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Pull-based supplier of records to index.
///
/// Sources are consumed lazily and exactly once; implementations are not
/// required to be restartable.
pub trait RecordSource {
    /// Produces the next record, `Ok(None)` at end of stream.
    fn next_record(&mut self) -> Result<Option<Record>>;
}

/// In-memory record source over pre-framed records.
#[derive(Debug)]
pub struct SliceRecords {
    records: std::vec::IntoIter<Record>,
}

impl SliceRecords {
    /// Source over explicit records, offsets taken as given.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    /// Source over back-to-back records, offsets assigned cumulatively
    /// from zero.
    pub fn contiguous(data: Vec<Vec<u8>>) -> Self {
        let mut offset = 0u64;
        let records = data
            .into_iter()
            .map(|data| {
                let record = Record { offset, data };
                offset += record.length();
                record
            })
            .collect();
        Self::new(records)
    }
}

impl RecordSource for SliceRecords {
    fn next_record(&mut self) -> Result<Option<Record>> {
        Ok(self.records.next())
    }
}

/// Record source framing a byte stream on a delimiter.
///
/// The delimiter is not part of the record; a final unterminated fragment
/// still forms a record. Offsets are positions in the underlying stream, so
/// `offset + length (+ 1)` addresses the original bytes.
#[derive(Debug)]
pub struct DelimitedRecords<R> {
    reader: R,
    delimiter: u8,
    offset: u64,
}

impl<R: BufRead> DelimitedRecords<R> {
    /// Newline-delimited records.
    pub fn new(reader: R) -> Self {
        Self::with_delimiter(reader, b'\n')
    }

    /// Records delimited by an arbitrary byte.
    pub fn with_delimiter(reader: R, delimiter: u8) -> Self {
        Self {
            reader,
            delimiter,
            offset: 0,
        }
    }
}

impl<R: BufRead> RecordSource for DelimitedRecords<R> {
    fn next_record(&mut self) -> Result<Option<Record>> {
        let mut data = Vec::new();
        let read = self
            .reader
            .read_until(self.delimiter, &mut data)
            .map_err(Error::RecordSource)?;
        if read == 0 {
            return Ok(None);
        }

        let offset = self.offset;
        self.offset += read as u64;
        if data.last() == Some(&self.delimiter) {
            data.pop();
        }
        Ok(Some(Record { offset, data }))
    }
}

/// Record source cutting a byte stream into fixed-size frames.
///
/// The final frame may be shorter than `record_size` when the stream length
/// is not a multiple of it.
#[derive(Debug)]
pub struct FixedRecords<R> {
    reader: R,
    record_size: NonZeroUsize,
    offset: u64,
}

impl<R: Read> FixedRecords<R> {
    /// Frames of `record_size` bytes each.
    pub fn new(reader: R, record_size: NonZeroUsize) -> Self {
        Self {
            reader,
            record_size,
            offset: 0,
        }
    }
}

impl<R: Read> RecordSource for FixedRecords<R> {
    fn next_record(&mut self) -> Result<Option<Record>> {
        let mut data = vec![0u8; self.record_size.get()];
        let mut filled = 0;
        while filled < data.len() {
            match self.reader.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::RecordSource(e)),
            }
        }
        if filled == 0 {
            return Ok(None);
        }

        data.truncate(filled);
        let record = Record {
            offset: self.offset,
            data,
        };
        self.offset += filled as u64;
        Ok(Some(record))
    }
}
