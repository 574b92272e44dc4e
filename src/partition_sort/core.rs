//! Recursive, task-parallel Hoare-partition sort shared by Stage S (index
//! sort) and Stage U (update-log sort).
//!
//! Operates directly on fixed-size records packed into a `&mut [u8]` — the
//! same buffer backing a memory-mapped temp file — rather than decoding
//! into a typed `Vec` first. That keeps the sort truly in place against
//! the mapping: only the O(1) pivot copy and the call stack live off the
//! mapped file, so this still behaves correctly when the backing file is
//! far larger than physical memory.
//!
//! Partitions at or below `threshold_records` entries fall through to a
//! serial recursive quicksort. Above threshold, a worker partitions with
//! Hoare's scheme using a median-of-three pivot; one side is handed to
//! `rayon::join` as a task any idle worker may steal, the other continues
//! on the current thread. Recursion depth is bounded by partition
//! shrinkage, so no explicit depth limit is enforced.

use std::cmp::Ordering;

/// Sort `data`, a flat array of `data.len() / record_size` fixed-size
/// records, according to `cmp`. Parallelizes partitions larger than
/// `threshold_records` entries across the global rayon pool.
pub fn sort_records<F>(data: &mut [u8], record_size: usize, threshold_records: usize, cmp: &F)
where
    F: Fn(&[u8], &[u8]) -> Ordering + Sync,
{
    let n = data.len() / record_size;
    if n <= 1 {
        return;
    }
    if n <= threshold_records {
        serial_quicksort_records(data, record_size, cmp);
        return;
    }

    let split = hoare_partition_records(data, record_size, cmp);
    let (left, right) = data.split_at_mut(split * record_size);
    rayon::join(
        || sort_records(left, record_size, threshold_records, cmp),
        || sort_records(right, record_size, threshold_records, cmp),
    );
}

fn serial_quicksort_records<F>(data: &mut [u8], record_size: usize, cmp: &F)
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    let n = data.len() / record_size;
    if n <= 1 {
        return;
    }
    let split = hoare_partition_records(data, record_size, cmp);
    let (left, right) = data.split_at_mut(split * record_size);
    serial_quicksort_records(left, record_size, cmp);
    serial_quicksort_records(right, record_size, cmp);
}

#[inline]
fn record_at(data: &[u8], i: usize, record_size: usize) -> &[u8] {
    &data[i * record_size..(i + 1) * record_size]
}

#[inline]
fn swap_records(data: &mut [u8], i: usize, j: usize, record_size: usize) {
    if i == j {
        return;
    }
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let (left, right) = data.split_at_mut(hi * record_size);
    let a = &mut left[lo * record_size..(lo + 1) * record_size];
    let b = &mut right[..record_size];
    a.swap_with_slice(b);
}

/// Classic Hoare partition over fixed-size records. Returns `p` such that
/// `data[..p*record_size]` holds every record known to be `<= pivot` and
/// `data[p*record_size..]` holds every record known to be `>= pivot`.
fn hoare_partition_records<F>(data: &mut [u8], record_size: usize, cmp: &F) -> usize
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    let n = data.len() / record_size;
    let pivot = median_of_three_records(data, record_size, cmp);
    let mut i: isize = -1;
    let mut j: isize = n as isize;

    loop {
        loop {
            i += 1;
            if cmp(record_at(data, i as usize, record_size), &pivot) != Ordering::Less {
                break;
            }
        }
        loop {
            j -= 1;
            if cmp(record_at(data, j as usize, record_size), &pivot) != Ordering::Greater {
                break;
            }
        }
        if i >= j {
            return (j + 1) as usize;
        }
        swap_records(data, i as usize, j as usize, record_size);
    }
}

/// Median-of-three pivot selection over the first, middle, and last
/// records, copied out so it survives the swaps that follow. Requires
/// `n >= 3`, which always holds here since partitioning is only reached
/// above `threshold_records`.
fn median_of_three_records<F>(data: &[u8], record_size: usize, cmp: &F) -> Vec<u8>
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    let n = data.len() / record_size;
    let a = record_at(data, 0, record_size);
    let b = record_at(data, n / 2, record_size);
    let c = record_at(data, n - 1, record_size);

    let pick = if cmp(a, b) == Ordering::Less {
        if cmp(b, c) == Ordering::Less {
            b
        } else if cmp(a, c) == Ordering::Less {
            c
        } else {
            a
        }
    } else if cmp(a, c) == Ordering::Less {
        a
    } else if cmp(b, c) == Ordering::Less {
        c
    } else {
        b
    };
    pick.to_vec()
}
