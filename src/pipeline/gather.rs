//! Stage G: walk the sorted index once, emitting an `UpdateRecord` for
//! every duplicate block found.
//!
//! Group boundaries are sparse and not known in advance, so the sorted
//! index is divided into static slabs among workers. A worker only starts
//! processing a run at position `i` when `i == 0 || hash(i) != hash(i-1)`
//! — a condition that depends solely on global position, not on slab
//! boundaries, so exactly one worker ever claims a given group even when
//! that group straddles a slab edge. Each worker then reserves a
//! contiguous range in the update log via `fetch_add` on a shared counter
//! and writes its records sequentially into that disjoint range.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use rayon::prelude::*;

use crate::pipeline::disjoint::DisjointMutPtr;
use crate::record::{INDEX_ENTRY_SIZE, IndexEntry, UPDATE_RECORD_SIZE, UpdateRecord};

#[inline]
fn entry_at(index: &[u8], i: usize) -> IndexEntry {
    IndexEntry::read_from(&index[i * INDEX_ENTRY_SIZE..(i + 1) * INDEX_ENTRY_SIZE])
}

#[inline]
fn same_fingerprint(a: &IndexEntry, b: &IndexEntry) -> bool {
    a.h_lo == b.h_lo && a.h_hi == b.h_hi
}

/// Walk the sorted `index`, writing `UpdateRecord`s into `update_log` and
/// returning how many were written. `update_log` must be large enough to
/// hold the worst case, `index.len() / INDEX_ENTRY_SIZE` records; the
/// caller truncates to the returned count afterward.
pub fn run(index: &[u8], update_log: &mut [u8]) -> u64 {
    let n = index.len() / INDEX_ENTRY_SIZE;
    if n == 0 {
        return 0;
    }

    let cursor = AtomicU64::new(0);
    let workers = rayon::current_num_threads().max(1);
    let slab = n.div_ceil(workers).max(1);
    let log_ptr = DisjointMutPtr(update_log.as_mut_ptr());
    let log_len = update_log.len();

    (0..n).into_par_iter().step_by(slab).for_each(|start| {
        let slab_end = (start + slab).min(n);
        let mut i = start;
        while i < slab_end {
            if i > 0 && same_fingerprint(&entry_at(index, i), &entry_at(index, i - 1)) {
                i += 1;
                continue;
            }

            let group_start = i;
            let group_head = entry_at(index, group_start);
            let mut group_end = group_start + 1;
            while group_end < n && same_fingerprint(&entry_at(index, group_end), &group_head) {
                group_end += 1;
            }

            let dup_count = group_end - group_start - 1;
            if dup_count > 0 {
                let reserved = cursor.fetch_add(dup_count as u64, AtomicOrdering::Relaxed);
                for (slot, idx) in (group_start + 1..group_end).enumerate() {
                    let dup_offset = entry_at(index, idx).offset;
                    let rec = UpdateRecord { pos: dup_offset, target: group_head.offset };
                    let byte_off = (reserved as usize + slot) * UPDATE_RECORD_SIZE;
                    debug_assert!(byte_off + UPDATE_RECORD_SIZE <= log_len);
                    // SAFETY: `byte_off` came from this call's exclusive
                    // reservation of `dup_count` slots starting at
                    // `reserved`; no other worker's reservation overlaps it.
                    let dst = unsafe { log_ptr.slice_mut(byte_off, UPDATE_RECORD_SIZE) };
                    rec.write_to(dst);
                }
            }

            i = group_end;
        }
    });

    cursor.load(AtomicOrdering::Relaxed)
}
