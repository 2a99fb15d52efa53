// =============================================================================
// indexheap — Arena and cell layout
// =============================================================================
//
// The arena is a flat array of fixed-size cells. Cell 0 is the permanent
// sentinel: head of the neighbor list and head of the free-list ring. Every
// other cell is either:
//
//   - free:      [next_block | FREE_FLAG, prev_block, next_free, prev_free]
//   - allocated: [next_block,             prev_block, user data (4 bytes)...]
//
// and for allocations spanning more than one cell, every cell after the
// first is entirely user data (no header reused) — see `data_ptr`/`blocks`.
//
// All of this lives behind raw pointer arithmetic on purpose: the two
// interpretations of a cell's body overlay the same four bytes, which is
// not expressible as two live `&mut` views at once. `Arena` is the only
// place that reaches for `UnsafeCell`; everything above it (`list`,
// `freelist`, `allocate`, `free`, `reallocate`, `info`) works in terms of
// cell indices and never sees a raw pointer.
// =============================================================================

use core::cell::UnsafeCell;
use core::ptr;

use crate::config::{BODY_SIZE, CELL_SIZE, FREE_FLAG, HEADER_SIZE, INDEX_MASK};

/// A fixed-region arena of `N` cells, each `CELL_SIZE` bytes.
///
/// `[[u8; CELL_SIZE]; N]` rather than `[u8; N * CELL_SIZE]` sidesteps the
/// need for const-generic arithmetic in the array length.
pub struct Arena<const N: usize> {
    cells: UnsafeCell<[[u8; CELL_SIZE]; N]>,
}

// SAFETY: all access to `cells` goes through `Arena`'s methods, which the
// allocator only ever calls from inside a `CriticalGuard` section.
unsafe impl<const N: usize> Sync for Arena<N> {}

impl<const N: usize> Arena<N> {
    /// Number of cells in this arena. Cell 0 is the sentinel; the frontier
    /// extension leaves the last cell unusable as real payload, so the
    /// addressable capacity is `N - 2` single-cell blocks at most.
    pub const LEN: usize = N;

    /// A fresh, all-zero arena. Zero is the "uninitialized" state the
    /// allocator's lazy first-use path depends on: a zeroed sentinel has
    /// `next_block == 0` and `next_free == 0`, both of which read as "the
    /// heap hasn't been touched yet."
    pub const fn new() -> Self {
        assert!(N >= 3, "arena must hold the sentinel plus at least one usable cell");
        assert!(N <= crate::config::MAX_CELLS, "arena exceeds the 15-bit index space");
        Arena {
            cells: UnsafeCell::new([[0u8; CELL_SIZE]; N]),
        }
    }

    #[inline(always)]
    fn cell_ptr(&self, idx: u16) -> *mut u8 {
        debug_assert!((idx as usize) < N);
        // SAFETY: bounds-checked above; caller holds the critical section.
        unsafe { (self.cells.get() as *mut u8).add(idx as usize * CELL_SIZE) }
    }

    #[inline(always)]
    fn read_u16(&self, idx: u16, offset: usize) -> u16 {
        // SAFETY: offset is always 0, 2, 4, or 6, within CELL_SIZE bytes.
        unsafe { ptr::read_unaligned(self.cell_ptr(idx).add(offset) as *const u16) }
    }

    #[inline(always)]
    fn write_u16(&self, idx: u16, offset: usize, value: u16) {
        // SAFETY: same bound as `read_u16`.
        unsafe { ptr::write_unaligned(self.cell_ptr(idx).add(offset) as *mut u16, value) }
    }

    /// Raw `next_block` field, free flag included.
    pub fn next_block_raw(&self, idx: u16) -> u16 {
        self.read_u16(idx, 0)
    }

    pub fn set_next_block_raw(&self, idx: u16, value: u16) {
        self.write_u16(idx, 0, value);
    }

    /// `next_block` with the free flag masked off — the actual successor
    /// cell index in the neighbor list.
    pub fn next_block_index(&self, idx: u16) -> u16 {
        self.next_block_raw(idx) & INDEX_MASK
    }

    pub fn is_free(&self, idx: u16) -> bool {
        self.next_block_raw(idx) & FREE_FLAG != 0
    }

    pub fn prev_block(&self, idx: u16) -> u16 {
        self.read_u16(idx, 2)
    }

    pub fn set_prev_block(&self, idx: u16, value: u16) {
        self.write_u16(idx, 2, value);
    }

    /// Free-list successor. Only meaningful while `idx` is free (or is the
    /// sentinel, whose free-list fields are always meaningful).
    pub fn next_free(&self, idx: u16) -> u16 {
        self.read_u16(idx, 4)
    }

    pub fn set_next_free(&self, idx: u16, value: u16) {
        self.write_u16(idx, 4, value);
    }

    pub fn prev_free(&self, idx: u16) -> u16 {
        self.read_u16(idx, 6)
    }

    pub fn set_prev_free(&self, idx: u16, value: u16) {
        self.write_u16(idx, 6, value);
    }

    /// Size of the block starting at `idx`, in cells, derived from its
    /// neighbor-list successor. Undefined for the terminator block.
    pub fn block_size_cells(&self, idx: u16) -> u16 {
        self.next_block_index(idx) - idx
    }

    /// Maximum user-visible byte count a block of `cells` cells can hold:
    /// the first cell contributes only its body, every following cell
    /// contributes its whole width.
    pub fn capacity_bytes(cells: u16) -> usize {
        BODY_SIZE + (cells as usize - 1) * CELL_SIZE
    }

    /// Address of the first data byte of the block starting at `idx`.
    pub fn data_ptr(&self, idx: u16) -> *mut u8 {
        // SAFETY: HEADER_SIZE < CELL_SIZE.
        unsafe { self.cell_ptr(idx).add(HEADER_SIZE) }
    }

    /// Recovers the cell index owning a data pointer previously handed out
    /// by this arena, or `None` if it doesn't fall within the arena's
    /// backing storage.
    pub fn index_of(&self, data: *const u8) -> Option<u16> {
        let base = self.cells.get() as *const u8;
        let end = unsafe { base.add(N * CELL_SIZE) };
        if data < base || data >= end {
            return None;
        }
        let offset = unsafe { data.offset_from(base) } as usize;
        let cell_offset = offset.checked_sub(HEADER_SIZE)?;
        if cell_offset % CELL_SIZE != 0 {
            return None;
        }
        Some((cell_offset / CELL_SIZE) as u16)
    }

    /// Copies an entire cell's raw bytes from `src` to `dst`, used when the
    /// frontier is extended (the terminator cell, links and all, moves
    /// forward by `k` cells).
    pub fn copy_cell(&self, src: u16, dst: u16) {
        let s = self.cell_ptr(src);
        let d = self.cell_ptr(dst);
        // SAFETY: both within bounds; cells never overlap for the caller's
        // use (frontier extension always moves forward by at least one
        // cell width).
        unsafe { ptr::copy_nonoverlapping(s, d, CELL_SIZE) };
    }

    /// Moves `len` bytes of user data from one block's data area to
    /// another's, allowing overlap (used by reallocate's downward move).
    pub fn move_data(&self, src_idx: u16, dst_idx: u16, len: usize) {
        let s = self.data_ptr(src_idx);
        let d = self.data_ptr(dst_idx);
        // SAFETY: both point into the same backing array; lengths are
        // bounded by the caller to the smaller of the two blocks' capacity.
        unsafe { ptr::copy(s, d, len) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_arena_is_zeroed() {
        let arena: Arena<16> = Arena::new();
        assert_eq!(arena.next_block_raw(0), 0);
        assert_eq!(arena.next_free(0), 0);
    }

    #[test]
    fn free_flag_roundtrips() {
        let arena: Arena<16> = Arena::new();
        arena.set_next_block_raw(1, 4 | FREE_FLAG);
        assert!(arena.is_free(1));
        assert_eq!(arena.next_block_index(1), 4);
    }

    #[test]
    fn index_of_rejects_foreign_pointers() {
        let arena: Arena<16> = Arena::new();
        let outside = 0xdeadbeefu64 as *const u8;
        assert_eq!(arena.index_of(outside), None);
        let inside = arena.data_ptr(1);
        assert_eq!(arena.index_of(inside), Some(1));
    }
}
