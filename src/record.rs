//! Fixed-size binary record layouts for the three working-set artifacts.
//!
//! Every record is accessed through explicit `to_le_bytes`/`from_le_bytes`
//! conversions over raw mmap'd byte slices rather than a `#[repr(C)]` cast,
//! so the on-disk layout is exactly what §9's endianness rule requires on
//! every platform, independent of native struct layout or alignment.

/// One entry in the fingerprint index: 24 bytes, (h_lo, h_hi, offset).
pub const INDEX_ENTRY_SIZE: usize = 24;

/// One entry in the update log: 16 bytes, (pos, target).
pub const UPDATE_RECORD_SIZE: usize = 16;

/// One rank map slot: 8 bytes, a source offset or `NULL_RANK`.
pub const RANK_SLOT_SIZE: usize = 8;

/// A decoded `IndexEntry`: a block's fingerprint plus its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub h_lo: u64,
    pub h_hi: u64,
    pub offset: u64,
}

impl IndexEntry {
    #[inline]
    pub fn write_to(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), INDEX_ENTRY_SIZE);
        dst[0..8].copy_from_slice(&self.h_lo.to_le_bytes());
        dst[8..16].copy_from_slice(&self.h_hi.to_le_bytes());
        dst[16..24].copy_from_slice(&self.offset.to_le_bytes());
    }

    #[inline]
    pub fn read_from(src: &[u8]) -> IndexEntry {
        debug_assert_eq!(src.len(), INDEX_ENTRY_SIZE);
        IndexEntry {
            h_lo: u64::from_le_bytes(src[0..8].try_into().unwrap()),
            h_hi: u64::from_le_bytes(src[8..16].try_into().unwrap()),
            offset: u64::from_le_bytes(src[16..24].try_into().unwrap()),
        }
    }

    /// Lexicographic ordering key used by Stage S: (h_hi, h_lo, offset).
    /// Offset is the tie-break last, which is what gives the "earliest
    /// source position wins" first-occurrence policy for free.
    #[inline]
    pub fn sort_key(&self) -> (u64, u64, u64) {
        (self.h_hi, self.h_lo, self.offset)
    }
}

/// A decoded `UpdateRecord`: "the block at `pos` duplicates the block
/// first seen at `target`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRecord {
    pub pos: u64,
    pub target: u64,
}

impl UpdateRecord {
    #[inline]
    pub fn write_to(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), UPDATE_RECORD_SIZE);
        dst[0..8].copy_from_slice(&self.pos.to_le_bytes());
        dst[8..16].copy_from_slice(&self.target.to_le_bytes());
    }

    #[inline]
    pub fn read_from(src: &[u8]) -> UpdateRecord {
        debug_assert_eq!(src.len(), UPDATE_RECORD_SIZE);
        UpdateRecord {
            pos: u64::from_le_bytes(src[0..8].try_into().unwrap()),
            target: u64::from_le_bytes(src[8..16].try_into().unwrap()),
        }
    }
}

/// Read the rank map slot for source position `pos` out of the raw mapping.
#[inline]
pub fn read_rank_slot(rank_map: &[u8], pos: u64) -> u64 {
    let off = pos as usize * RANK_SLOT_SIZE;
    u64::from_le_bytes(rank_map[off..off + RANK_SLOT_SIZE].try_into().unwrap())
}

/// Write `value` into the rank map slot for source position `pos`.
#[inline]
pub fn write_rank_slot(rank_map: &mut [u8], pos: u64, value: u64) {
    let off = pos as usize * RANK_SLOT_SIZE;
    rank_map[off..off + RANK_SLOT_SIZE].copy_from_slice(&value.to_le_bytes());
}

/// Iterate over an index-array mmap as `IndexEntry` values.
pub fn iter_index_entries(buf: &[u8]) -> impl Iterator<Item = IndexEntry> + '_ {
    buf.chunks_exact(INDEX_ENTRY_SIZE).map(IndexEntry::read_from)
}
