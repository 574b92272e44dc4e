use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::{Mmap, MmapMut, MmapOptions};

/// Memory-map a file read-only for zero-copy access.
///
/// Caller must ensure the file is not modified or truncated while the
/// mapping is alive.
pub fn mmap_file(path: &Path) -> io::Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: read-only mapping; the source file is never written to by
    // this process while the mapping is held.
    unsafe { Mmap::map(&file) }
}

/// Create (or truncate) a file at `len` bytes and map it read-write.
///
/// Used for the three working-set artifacts (index, update log, rank map):
/// each is sized up front as a function of the input length and then
/// treated as an out-of-core array via the mapping.
pub fn create_mmap_mut(path: &Path, len: u64) -> io::Result<MmapMut> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(len)?;
    // SAFETY: this process exclusively owns the backing file for its
    // lifetime; no other process maps or truncates it concurrently.
    unsafe { MmapOptions::new().map_mut(&file) }
}

/// Re-open and map an existing read-write file without truncating it.
///
/// Stage A re-opens the rank map after Stage G/U have finished with the
/// update log; the file already has its final size.
pub fn reopen_mmap_mut(path: &Path) -> io::Result<MmapMut> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    // SAFETY: same invariant as `create_mmap_mut`.
    unsafe { MmapOptions::new().map_mut(&file) }
}

/// Hint the kernel that `mmap` will be scanned sequentially from start to end.
/// A no-op on platforms without `madvise`.
#[cfg(target_os = "linux")]
pub fn advise_sequential(mmap: &Mmap) {
    unsafe {
        libc::madvise(
            mmap.as_ptr() as *mut libc::c_void,
            mmap.len(),
            libc::MADV_SEQUENTIAL,
        );
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_sequential(_mmap: &Mmap) {}

/// Hint the kernel that `mmap` will be accessed without locality (e.g. the
/// fingerprint-sorted index during Stage G's scan of scattered groups).
#[cfg(target_os = "linux")]
pub fn advise_random(mmap: &MmapMut) {
    unsafe {
        libc::madvise(mmap.as_ptr() as *mut libc::c_void, mmap.len(), libc::MADV_RANDOM);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_random(_mmap: &MmapMut) {}

/// Hint the kernel to back a large writable mapping with huge pages, cutting
/// TLB pressure during the Stage A sweep over the rank map.
#[cfg(target_os = "linux")]
pub fn advise_huge_page(mmap: &MmapMut) {
    unsafe {
        libc::madvise(mmap.as_ptr() as *mut libc::c_void, mmap.len(), libc::MADV_HUGEPAGE);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_huge_page(_mmap: &MmapMut) {}

/// Hint the kernel to aggressively read ahead (e.g. right before Stage H
/// starts scanning the whole source mapping).
#[cfg(target_os = "linux")]
pub fn advise_willneed(mmap: &Mmap) {
    unsafe {
        libc::madvise(mmap.as_ptr() as *mut libc::c_void, mmap.len(), libc::MADV_WILLNEED);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_willneed(_mmap: &Mmap) {}
