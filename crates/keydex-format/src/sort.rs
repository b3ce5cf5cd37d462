//! Stable LSD radix sort over packed fixed-width rows
//!
//! Rows live back to back in one flat buffer with a fixed stride, and are
//! ordered by a byte range within the row (the key). Each pass is a counting
//! sort on one key column, alphabet size 256, processed from the least
//! significant key byte (the last) to the most significant (the first).
//! Passes scatter whole rows into a scratch buffer and swap buffers, so any
//! payload bytes around the key always travel with it.
//!
//! O(N·K) time for N rows and K key bytes, with one scratch buffer of N rows
//! and a 256-slot cursor table per pass.

use std::ops::Range;

/// Sorts packed `row_size`-byte rows into ascending order of their key bytes.
///
/// `key` is the byte range of the key within each row; comparison is
/// unsigned lexicographic over exactly those bytes. The sort is stable: rows
/// with equal keys keep their relative order. An empty buffer or an empty
/// key range is a no-op.
///
/// `rows.len()` must be a multiple of `row_size` and `key` must lie within
/// `0..row_size`.
pub fn sort_rows(rows: &mut Vec<u8>, row_size: usize, key: Range<usize>) {
    if rows.is_empty() || key.is_empty() {
        return;
    }
    debug_assert!(row_size > 0);
    debug_assert!(key.end <= row_size);
    debug_assert_eq!(rows.len() % row_size, 0);

    if rows.len() == row_size {
        return;
    }

    let mut src = std::mem::take(rows);
    let mut dst = vec![0u8; src.len()];

    // Least significant column first; order is only final after the pass
    // over the most significant column.
    for column in key.rev() {
        // Histogram of the current column.
        let mut cursors = [0usize; 256];
        for row in src.chunks_exact(row_size) {
            cursors[usize::from(row[column])] += 1;
        }

        // Exclusive prefix sum: each slot becomes its bucket's first output
        // row index.
        let mut total = 0;
        for cursor in &mut cursors {
            let count = *cursor;
            *cursor = total;
            total += count;
        }

        // Stable scatter of whole rows into the scratch buffer.
        for row in src.chunks_exact(row_size) {
            let bucket = usize::from(row[column]);
            let at = cursors[bucket] * row_size;
            dst[at..at + row_size].copy_from_slice(row);
            cursors[bucket] += 1;
        }

        std::mem::swap(&mut src, &mut dst);
    }

    *rows = src;
}

/// Returns true when the packed rows are in non-decreasing key order.
pub fn is_sorted(rows: &[u8], row_size: usize, key: Range<usize>) -> bool {
    if row_size == 0 || key.is_empty() {
        return true;
    }
    rows.chunks_exact(row_size)
        .map(|row| &row[key.clone()])
        .is_sorted()
}
