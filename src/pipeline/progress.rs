//! Advisory progress reporting to stderr.
//!
//! Progress counters are explicitly not part of the correctness contract
//! (see §5): a run with `--quiet` or with stderr closed behaves identically
//! other than the absence of these lines. The `"\rDone: NN%"` carriage
//! return style mirrors the progress reporting this pipeline's reference
//! behavior uses.

use std::io::Write;
use std::time::Instant;

pub struct StageProgress {
    name: &'static str,
    quiet: bool,
    start: Instant,
}

impl StageProgress {
    pub fn start(name: &'static str, quiet: bool) -> Self {
        if !quiet {
            eprintln!("[{name}] starting");
        }
        StageProgress { name, quiet, start: Instant::now() }
    }

    /// Report `done` out of `total` units complete. A no-op once quiet or
    /// when `total` is zero (nothing to report a percentage of).
    pub fn tick(&self, done: u64, total: u64) {
        if self.quiet || total == 0 {
            return;
        }
        let pct = done.saturating_mul(100) / total;
        eprint!("\r[{}] Done: {}%", self.name, pct.min(100));
        let _ = std::io::stderr().flush();
    }

    pub fn finish(self) {
        if !self.quiet {
            eprintln!("\r[{}] done in {:.2?}", self.name, self.start.elapsed());
        }
    }
}
