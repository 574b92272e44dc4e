use std::cmp::Ordering;

use super::core::sort_records;

const REC: usize = 8;

fn pack(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn unpack(buf: &[u8]) -> Vec<i64> {
    buf.chunks_exact(REC).map(|c| i64::from_le_bytes(c.try_into().unwrap())).collect()
}

fn cmp_i64(a: &[u8], b: &[u8]) -> Ordering {
    i64::from_le_bytes(a.try_into().unwrap()).cmp(&i64::from_le_bytes(b.try_into().unwrap()))
}

fn is_sorted(data: &[i64]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn sorts_below_threshold_serially() {
    let mut buf = pack(&[5, 3, 1, 4, 2]);
    sort_records(&mut buf, REC, 4096, &cmp_i64);
    assert!(is_sorted(&unpack(&buf)));
}

#[test]
fn sorts_above_threshold_with_partitioning() {
    let values: Vec<i64> = (0..20_000).rev().collect();
    let mut buf = pack(&values);
    sort_records(&mut buf, REC, 16, &cmp_i64);
    let out = unpack(&buf);
    assert!(is_sorted(&out));
    assert_eq!(out.first(), Some(&0));
    assert_eq!(out.last(), Some(&19_999));
}

#[test]
fn handles_many_duplicate_keys() {
    let mut values = vec![7i64; 10_000];
    values.extend(vec![3i64; 5_000]);
    let mut buf = pack(&values);
    sort_records(&mut buf, REC, 8, &cmp_i64);
    assert!(is_sorted(&unpack(&buf)));
}

#[test]
fn handles_empty_and_singleton() {
    let mut empty: Vec<u8> = vec![];
    sort_records(&mut empty, REC, 4096, &cmp_i64);
    assert!(empty.is_empty());

    let mut single = pack(&[42]);
    sort_records(&mut single, REC, 4096, &cmp_i64);
    assert_eq!(unpack(&single), vec![42]);
}

#[test]
fn sorts_already_sorted_input() {
    let values: Vec<i64> = (0..20_000).collect();
    let mut buf = pack(&values);
    sort_records(&mut buf, REC, 16, &cmp_i64);
    assert!(is_sorted(&unpack(&buf)));
}

#[test]
fn index_entry_sized_records_sort_lexicographically() {
    // Mirrors IndexEntry's 24-byte (h_lo, h_hi, offset) layout and its
    // (h_hi, h_lo, offset) comparator with offset as the final tie-break.
    use crate::record::{IndexEntry, INDEX_ENTRY_SIZE};

    let entries = vec![
        IndexEntry { h_lo: 1, h_hi: 1, offset: 5 },
        IndexEntry { h_lo: 1, h_hi: 1, offset: 3 },
        IndexEntry { h_lo: 1, h_hi: 1, offset: 9 },
        IndexEntry { h_lo: 9, h_hi: 0, offset: 1 },
        IndexEntry { h_lo: 0, h_hi: 2, offset: 0 },
    ];
    let mut buf = vec![0u8; entries.len() * INDEX_ENTRY_SIZE];
    for (dst, e) in buf.chunks_exact_mut(INDEX_ENTRY_SIZE).zip(entries.iter()) {
        e.write_to(dst);
    }

    let cmp = |a: &[u8], b: &[u8]| {
        IndexEntry::read_from(a).sort_key().cmp(&IndexEntry::read_from(b).sort_key())
    };
    sort_records(&mut buf, INDEX_ENTRY_SIZE, 2, &cmp);

    let sorted: Vec<IndexEntry> =
        buf.chunks_exact(INDEX_ENTRY_SIZE).map(IndexEntry::read_from).collect();
    let offsets: Vec<u64> = sorted.iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![1, 3, 5, 9, 0]);
}
