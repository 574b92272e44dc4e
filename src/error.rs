use std::path::PathBuf;

/// Fatal error taxonomy for the pipeline.
///
/// Two outcomes the design explicitly treats as *not* errors are deliberately
/// absent here: a MAGIC byte whose trailing bytes fail the V-check (restorer
/// falls back to a literal) and a duplicate byte-compare mismatch at encode
/// time (encoder falls back to a literal). Both are normal control flow
/// inside `encode`/`restore`, never a `ZirkaError`.
#[derive(Debug, thiserror::Error)]
pub enum ZirkaError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory-map {path}: {source}")]
    Mmap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("restorer output mapping ran out of capacity and the doubling remap failed: {0}")]
    OutputCapacity(#[source] std::io::Error),

    #[error("block size must be nonzero")]
    InvalidBlockSize,
}

pub type Result<T> = std::result::Result<T, ZirkaError>;

impl ZirkaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ZirkaError::Io { path: path.into(), source }
    }

    pub fn mmap(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ZirkaError::Mmap { path: path.into(), source }
    }
}
