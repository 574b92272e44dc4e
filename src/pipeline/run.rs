//! Orchestration: wires stages H → S → G → U → A → E into `encode_file`,
//! and Stage R into `restore_file`.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::common::io::{
    advise_huge_page, advise_random, advise_sequential, advise_willneed, create_mmap_mut,
    mmap_file,
};
use crate::error::{Result, ZirkaError};
use crate::params::{Params, SORT_SERIAL_THRESHOLD};
use crate::partition_sort::sort_records;
use crate::pipeline::progress::StageProgress;
use crate::pipeline::restore::{self, GrowableOutput};
use crate::pipeline::{apply, encode, gather, hasher};
use crate::record::{INDEX_ENTRY_SIZE, RANK_SLOT_SIZE, UPDATE_RECORD_SIZE, IndexEntry};

/// Summary of one `encode_file` run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeReport {
    pub input_len: u64,
    pub output_len: u64,
    pub duplicate_blocks: u64,
}

fn sibling_temp_path(output_path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(output_path.file_name().unwrap_or_default());
    name.push(suffix);
    output_path.with_file_name(name)
}

fn sort_index(index: &mut [u8]) {
    sort_records(index, INDEX_ENTRY_SIZE, SORT_SERIAL_THRESHOLD, &|a, b| {
        IndexEntry::read_from(a).sort_key().cmp(&IndexEntry::read_from(b).sort_key())
    });
}

fn sort_updates(log: &mut [u8]) {
    sort_records(log, UPDATE_RECORD_SIZE, SORT_SERIAL_THRESHOLD, &|a, b| {
        let pa = u64::from_le_bytes(a[0..8].try_into().unwrap());
        let pb = u64::from_le_bytes(b[0..8].try_into().unwrap());
        pa.cmp(&pb)
    });
}

/// Run the full H/S/G/U/A/E pipeline over `input_path`, writing the encoded
/// stream to `output_path`.
pub fn encode_file(input_path: &Path, output_path: &Path, params: &Params) -> Result<EncodeReport> {
    if params.block_size == 0 {
        return Err(ZirkaError::InvalidBlockSize);
    }

    let input_meta = fs::metadata(input_path).map_err(|e| ZirkaError::io(input_path, e))?;
    if input_meta.len() == 0 {
        // `memmap2` refuses to map a zero-length file; nothing to encode.
        File::create(output_path).map_err(|e| ZirkaError::io(output_path, e))?;
        return Ok(EncodeReport::default());
    }

    let source = mmap_file(input_path).map_err(|e| ZirkaError::mmap(input_path, e))?;
    advise_sequential(&source);
    advise_willneed(&source);

    let n = source.len();
    let w = params.block_size as usize;

    let out_file = File::create(output_path).map_err(|e| ZirkaError::io(output_path, e))?;
    let mut writer = BufWriter::new(out_file);

    if n < w {
        // No block-sized window exists anywhere in the source; every byte
        // is necessarily a literal.
        std::io::Write::write_all(&mut writer, &source).map_err(|e| ZirkaError::io(output_path, e))?;
        return Ok(EncodeReport { input_len: n as u64, output_len: n as u64, duplicate_blocks: 0 });
    }

    let block_count = n - w + 1;
    let index_path = sibling_temp_path(output_path, ".zirka_index.tmp");
    let updates_path = sibling_temp_path(output_path, ".zirka_updates.tmp");
    let rank_path = sibling_temp_path(output_path, ".zirka_rank.tmp");

    let cleanup = |index_path: &Path, updates_path: &Path, rank_path: &Path| {
        let _ = fs::remove_file(index_path);
        let _ = fs::remove_file(updates_path);
        let _ = fs::remove_file(rank_path);
    };

    let result = (|| -> Result<EncodeReport> {
        let mut index = create_mmap_mut(&index_path, (block_count * INDEX_ENTRY_SIZE) as u64)
            .map_err(|e| ZirkaError::mmap(&index_path, e))?;

        let h = StageProgress::start("H", params.quiet);
        hasher::run(&source, params.block_size, params.block_size, &mut index);
        h.finish();

        let s = StageProgress::start("S", params.quiet);
        sort_index(&mut index);
        s.finish();

        advise_random(&index);
        let mut update_log = create_mmap_mut(&updates_path, (block_count * UPDATE_RECORD_SIZE) as u64)
            .map_err(|e| ZirkaError::mmap(&updates_path, e))?;

        let g = StageProgress::start("G", params.quiet);
        let update_count = gather::run(&index, &mut update_log) as usize;
        g.finish();

        let u = StageProgress::start("U", params.quiet);
        sort_updates(&mut update_log[..update_count * UPDATE_RECORD_SIZE]);
        u.finish();

        let mut rank_map = create_mmap_mut(&rank_path, (n as u64) * RANK_SLOT_SIZE as u64)
            .map_err(|e| ZirkaError::mmap(&rank_path, e))?;
        advise_huge_page(&rank_map);

        let a = StageProgress::start("A", params.quiet);
        apply::init_null(&mut rank_map);
        apply::apply(&update_log[..update_count * UPDATE_RECORD_SIZE], &mut rank_map);
        a.finish();

        let e = StageProgress::start("E", params.quiet);
        let stats = encode::encode(&source, &rank_map, params.block_size, &mut writer)
            .map_err(|err| ZirkaError::io(output_path, err))?;
        e.finish();

        Ok(EncodeReport {
            input_len: stats.input_len,
            output_len: stats.output_len,
            duplicate_blocks: stats.tags,
        })
    })();

    cleanup(&index_path, &updates_path, &rank_path);
    result
}

/// Run Stage R over `input_path`, writing the restored bytes to
/// `output_path`. Returns the restored length.
pub fn restore_file(input_path: &Path, output_path: &Path, params: &Params) -> Result<u64> {
    if params.block_size == 0 {
        return Err(ZirkaError::InvalidBlockSize);
    }

    let input_meta = fs::metadata(input_path).map_err(|e| ZirkaError::io(input_path, e))?;
    if input_meta.len() == 0 {
        // `memmap2` refuses to map a zero-length file; nothing to restore.
        let out = GrowableOutput::create(output_path, 1).map_err(|e| ZirkaError::io(output_path, e))?;
        return out.finish().map_err(ZirkaError::OutputCapacity);
    }

    let encoded = mmap_file(input_path).map_err(|e| ZirkaError::mmap(input_path, e))?;
    advise_sequential(&encoded);

    let mut out = GrowableOutput::create(output_path, restore::default_initial_capacity())
        .map_err(|e| ZirkaError::io(output_path, e))?;

    let r = StageProgress::start("R", params.quiet);
    restore::restore(&encoded, params.block_size, &mut out).map_err(|e| ZirkaError::io(output_path, e))?;
    r.finish();

    out.finish().map_err(ZirkaError::OutputCapacity)
}
