//! Stage H: parallel fingerprinting of every block-start position.

use rayon::prelude::*;

use crate::fingerprint::fingerprint;
use crate::record::{INDEX_ENTRY_SIZE, IndexEntry};

/// Fill `index` with one `IndexEntry` per position `i` in `[0, N-W]`, where
/// `N = source.len()`. `index` must already be sized to
/// `(N - W + 1) * INDEX_ENTRY_SIZE` bytes (zero bytes if `N < W`).
///
/// Positions are independent, so a data-parallel loop over fixed-size
/// chunks with no synchronization is both correct and optimal.
pub fn run(source: &[u8], block_size: u64, seed: u64, index: &mut [u8]) {
    let w = block_size as usize;
    let n = source.len();
    if n < w || w == 0 {
        return;
    }
    let block_count = n - w + 1;
    debug_assert_eq!(index.len(), block_count * INDEX_ENTRY_SIZE);

    index[..block_count * INDEX_ENTRY_SIZE]
        .par_chunks_mut(INDEX_ENTRY_SIZE)
        .enumerate()
        .for_each(|(i, dst)| {
            let block = &source[i..i + w];
            let (h_lo, h_hi) = fingerprint(block, seed);
            IndexEntry { h_lo, h_hi, offset: i as u64 }.write_to(dst);
        });
}
