//! Stage R: the sequential inverse of Stage E.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use crate::fingerprint::verify;
use crate::params::{MAGIC, TAG_SIZE};

const INITIAL_CAPACITY: u64 = 1 << 30; // 1 GiB

/// A memory-mapped output buffer that doubles its backing file's capacity
/// whenever the next write would exceed it, remapping in place.
pub struct GrowableOutput {
    file: File,
    mmap: MmapMut,
    capacity: u64,
    len: u64,
}

impl GrowableOutput {
    pub fn create(path: &Path, initial_capacity: u64) -> io::Result<Self> {
        let capacity = initial_capacity.max(1);
        let file = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(path)?;
        file.set_len(capacity)?;
        // SAFETY: this process exclusively owns the freshly created file.
        let mmap = unsafe { MmapOptions::new().map_mut(&file)? };
        Ok(GrowableOutput { file, mmap, capacity, len: 0 })
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    fn ensure_capacity(&mut self, additional: u64) -> io::Result<()> {
        while self.len + additional > self.capacity {
            self.capacity = self.capacity.saturating_mul(2);
            self.file.set_len(self.capacity)?;
            // SAFETY: same invariant as `create`; the old mapping is
            // dropped by this assignment before the new one is read.
            self.mmap = unsafe { MmapOptions::new().map_mut(&self.file)? };
        }
        Ok(())
    }

    pub fn push(&mut self, byte: u8) -> io::Result<()> {
        self.ensure_capacity(1)?;
        self.mmap[self.len as usize] = byte;
        self.len += 1;
        Ok(())
    }

    /// Copy `w` bytes from `[src_pos, src_pos+w)` (already-written output)
    /// to the current write position. The caller guarantees
    /// `src_pos + w <= self.len()`, so source and destination never
    /// overlap.
    pub fn copy_earlier_block(&mut self, src_pos: u64, w: usize) -> io::Result<()> {
        self.ensure_capacity(w as u64)?;
        let dst_pos = self.len as usize;
        let src_pos = src_pos as usize;
        let (left, right) = self.mmap.split_at_mut(dst_pos);
        right[..w].copy_from_slice(&left[src_pos..src_pos + w]);
        self.len += w as u64;
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<u64> {
        self.mmap.flush()?;
        self.file.set_len(self.len)?;
        Ok(self.len)
    }
}

/// Restore `input` (an encoded stream) into `out`, returning the final
/// byte length written.
pub fn restore(input: &[u8], block_size: u64, out: &mut GrowableOutput) -> io::Result<u64> {
    let w = block_size as usize;
    let n = input.len();
    let mut ipos = 0usize;

    while ipos < n {
        let b = input[ipos];
        if b == MAGIC && ipos + TAG_SIZE <= n {
            let t = u64::from_le_bytes(input[ipos + 1..ipos + 9].try_into().unwrap());
            let check = u32::from_le_bytes(input[ipos + 9..ipos + 13].try_into().unwrap());
            let opos = out.len();
            if verify(t) == check && t + w as u64 <= opos {
                out.copy_earlier_block(t, w)?;
                ipos += TAG_SIZE;
                continue;
            }
        }
        out.push(b)?;
        ipos += 1;
    }

    Ok(out.len())
}

pub fn default_initial_capacity() -> u64 {
    INITIAL_CAPACITY
}
