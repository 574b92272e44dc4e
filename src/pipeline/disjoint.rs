//! A raw pointer wrapper that lets multiple rayon workers write to
//! statically-known-disjoint byte ranges of the same buffer.
//!
//! Stage G (atomic fetch-and-add reservation into the update log) and
//! Stage A (contiguous static slices of the sorted update log into the
//! rank map) both need this: the borrow checker cannot see that two
//! concurrent closures only ever touch non-overlapping ranges, so the
//! disjointness has to be established by the caller and documented at
//! each write site.

pub struct DisjointMutPtr(pub *mut u8);

// SAFETY: callers only ever dereference this pointer at byte offsets they
// have proven, by construction (an atomic reservation or a static
// partition of an already-sorted log), to be disjoint from every other
// concurrent use of the same pointer.
unsafe impl Send for DisjointMutPtr {}
unsafe impl Sync for DisjointMutPtr {}

impl DisjointMutPtr {
    /// # Safety
    /// The caller must ensure `offset + len <= total_len` (the length of
    /// the buffer this pointer was derived from) and that no other live
    /// reference overlaps `[offset, offset + len)`.
    #[inline]
    pub unsafe fn slice_mut(&self, offset: usize, len: usize) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.0.add(offset), len) }
    }
}
