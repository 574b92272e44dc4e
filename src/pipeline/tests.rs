//! Cross-stage round-trip tests: run the full encode/restore pipeline
//! against real temp files rather than in-memory buffers.

use tempfile::tempdir;

use crate::params::Params;
use crate::pipeline::{encode_file, restore_file};

fn roundtrip(source: &[u8], block_size: u64) {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let encoded_path = dir.path().join("encoded.bin");
    let restored_path = dir.path().join("restored.bin");
    std::fs::write(&input_path, source).unwrap();

    let params = Params::new(block_size, true);
    encode_file(&input_path, &encoded_path, &params).unwrap();
    restore_file(&encoded_path, &restored_path, &params).unwrap();

    let restored = std::fs::read(&restored_path).unwrap();
    assert_eq!(restored, source);
}

#[test]
fn s1_repeated_block_round_trips() {
    roundtrip(b"ABCDABCD", 4);
}

#[test]
fn s2_overlapping_repeat_round_trips() {
    roundtrip(b"AAAAAAAAAA", 3);
}

#[test]
fn ordinary_text_round_trips() {
    roundtrip(b"the quick brown fox jumps over the lazy dog", 4);
}

#[test]
fn shorter_than_block_size_round_trips() {
    roundtrip(b"ab", 8);
}

#[test]
fn empty_input_round_trips() {
    roundtrip(b"", 4);
}

#[test]
fn many_overlapping_duplicate_groups_round_trip() {
    let mut source = Vec::new();
    for i in 0..200u32 {
        source.extend_from_slice(&(i % 7).to_le_bytes());
    }
    roundtrip(&source, 4);
}

#[test]
fn encode_actually_shrinks_highly_redundant_input() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let encoded_path = dir.path().join("encoded.bin");
    let block = vec![b'x'; 64];
    let source: Vec<u8> = block.iter().cloned().cycle().take(64 * 100).collect();
    std::fs::write(&input_path, &source).unwrap();

    let params = Params::new(64, true);
    let report = encode_file(&input_path, &encoded_path, &params).unwrap();
    assert!(report.output_len < report.input_len);
    assert!(report.duplicate_blocks > 0);
}
