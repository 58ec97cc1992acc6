//! Parallel processing utilities.
//!
//! Image buffers are split into groups of whole rows so each rayon task owns a
//! disjoint, row-aligned part of the output.

use rayon::prelude::*;


/// Multiplier for number of chunks relative to CPU threads.
/// Using 3x threads provides good load balancing when some chunks finish faster.
pub const CHUNKS_PER_THREAD: usize = 3;

/// Number of rows each parallel chunk should hold.
///
/// `max_chunks == 0` derives the chunk count from the current rayon pool.
/// The result is never below `min_rows` (nor below 1).
#[inline]
pub fn chunk_rows(rows: usize, min_rows: usize, max_chunks: usize) -> usize {
    let num_chunks = if max_chunks == 0 {
        rayon::current_num_threads() * CHUNKS_PER_THREAD
    } else {
        max_chunks
    };
    rows.div_ceil(num_chunks.max(1)).max(min_rows).max(1)
}

/// Extension trait splitting a strided buffer into row-aligned parallel chunks.
pub trait ParRowChunksMut<T: Send> {
    /// Yields `(first_row, chunk)` pairs, each chunk holding up to
    /// `rows_per_chunk` rows of `stride` elements.
    fn par_row_chunks_mut<'a>(
        &'a mut self,
        stride: usize,
        rows_per_chunk: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a;
}

impl<T: Send> ParRowChunksMut<T> for [T] {
    fn par_row_chunks_mut<'a>(
        &'a mut self,
        stride: usize,
        rows_per_chunk: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a {
        assert!(stride > 0, "stride must be positive");
        let rows_per_chunk = rows_per_chunk.max(1);
        self.par_chunks_mut(stride * rows_per_chunk)
            .enumerate()
            .map(move |(index, chunk)| (index * rows_per_chunk, chunk))
    }
}
