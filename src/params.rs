//! Parameters shared by the encoder and restorer.
//!
//! Every value here must agree between `zirka` and `unzirka` for a given
//! stream: W is not recorded in the encoded format itself (see
//! `encode::MAGIC` and the tag layout), so the restorer has to be told the
//! same block size the encoder used.

/// Default block size (dedup granularity) in bytes.
pub const DEFAULT_BLOCK_SIZE: u64 = 4096;

/// Byte value that introduces a backreference tag in the encoded stream.
pub const MAGIC: u8 = 0xFF;

/// Size in bytes of a serialized backreference tag: MAGIC + u64 target + u32 check.
pub const TAG_SIZE: usize = 1 + 8 + 4;

/// Sentinel meaning "no earlier occurrence known" in the rank map.
pub const NULL_RANK: u64 = u64::MAX;

/// Below this many entries, Stage S/U fall back to a serial comparison sort
/// instead of spawning a rayon task for the partition.
pub const SORT_SERIAL_THRESHOLD: usize = 4096;

/// Runtime configuration threaded through every pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    /// Block size W: the deduplication granularity.
    pub block_size: u64,
    /// Whether progress lines are printed to stderr.
    pub quiet: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            block_size: DEFAULT_BLOCK_SIZE,
            quiet: false,
        }
    }
}

impl Params {
    pub fn new(block_size: u64, quiet: bool) -> Self {
        Params { block_size, quiet }
    }
}

/// Install the worker pool used by every parallel stage.
///
/// Resolution order: explicit `threads` argument, then rayon's own
/// `RAYON_NUM_THREADS` handling, then hardware parallelism. Mirrors the
/// `--parallel` flag wiring this codebase's other rayon-based tools use.
pub fn configure_thread_pool(threads: Option<usize>) {
    if let Some(n) = threads {
        let n = n.max(1);
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }
}
