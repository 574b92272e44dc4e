//! Stage A: the "Nuclear" update-log application.
//!
//! The update log arrives pre-sorted by position (Stage U), so applying it
//! as a set of contiguous, statically-assigned worker slices turns what
//! would otherwise be a scatter of random writes across the rank map into
//! a set of forward-moving sweeps — the whole reason this scheme is faster
//! than filling the rank map directly while walking the fingerprint-sorted
//! index.

use rayon::prelude::*;

use crate::params::NULL_RANK;
use crate::pipeline::disjoint::DisjointMutPtr;
use crate::record::{RANK_SLOT_SIZE, UPDATE_RECORD_SIZE, UpdateRecord};

/// Initialize every slot of `rank_map` to `NULL_RANK`. Data-parallel; every
/// slot is independent.
pub fn init_null(rank_map: &mut [u8]) {
    rank_map.par_chunks_mut(RANK_SLOT_SIZE).for_each(|slot| {
        slot.copy_from_slice(&NULL_RANK.to_le_bytes());
    });
}

/// Apply a position-sorted `sorted_updates` log into `rank_map`. Workers
/// take disjoint contiguous slices of the *log*; because the log is
/// sorted by position, each worker's writes land in a forward-moving,
/// mostly page-local region of the rank map even though several workers
/// run at once.
pub fn apply(sorted_updates: &[u8], rank_map: &mut [u8]) {
    let n = sorted_updates.len() / UPDATE_RECORD_SIZE;
    if n == 0 {
        return;
    }

    let workers = rayon::current_num_threads().max(1);
    let slab = n.div_ceil(workers).max(1);
    let rank_ptr = DisjointMutPtr(rank_map.as_mut_ptr());
    let rank_len = rank_map.len();

    (0..n).into_par_iter().step_by(slab).for_each(|start| {
        let end = (start + slab).min(n);
        for i in start..end {
            let rec = UpdateRecord::read_from(
                &sorted_updates[i * UPDATE_RECORD_SIZE..(i + 1) * UPDATE_RECORD_SIZE],
            );
            let byte_off = rec.pos as usize * RANK_SLOT_SIZE;
            debug_assert!(byte_off + RANK_SLOT_SIZE <= rank_len);
            // SAFETY: each source position appears in the update log at
            // most once (it identifies a unique block start), so distinct
            // records never target the same rank-map slot regardless of
            // which worker processes them.
            let dst = unsafe { rank_ptr.slice_mut(byte_off, RANK_SLOT_SIZE) };
            dst.copy_from_slice(&rec.target.to_le_bytes());
        }
    });
}
