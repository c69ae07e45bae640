//! Parallel processing utilities built on rayon.
//!
//! Two shapes of parallelism are used across the workspace: row bands over an
//! image (sized by [`rows_per_chunk`]) and a bounded-concurrency map over a list
//! of work items such as layer files ([`try_par_map_limited`]).

use rayon::prelude::*;

/// Multiplier for number of chunks relative to CPU threads.
/// Using 2x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Rows per band so that `height` splits into roughly `threads * 2` bands.
///
/// Minimum of 1 row per band.
#[inline]
pub fn rows_per_chunk(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Maps a fallible `f` over `items` in parallel, with at most `max_concurrent`
/// items in flight. Results keep the order of `items`.
///
/// Stops at the first chunk that contains an error and returns it.
/// Items within the failing chunk may still be processed in parallel.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn try_par_map_limited<T, R, E, F>(
    items: &[T],
    max_concurrent: usize,
    f: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(items.len());
    for chunk in items.chunks(max_concurrent) {
        let chunk_results: Result<Vec<R>, E> = chunk.par_iter().map(&f).collect();
        results.extend(chunk_results?);
    }
    Ok(results)
}
