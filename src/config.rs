// =============================================================================
// indexheap — Compile-time configuration
// =============================================================================
//
// Everything here is a compile-time constant or a `cfg`-gated choice. The
// allocator has no runtime configuration struct: arena size is a const
// generic on `IndexHeap`, fit policy is a Cargo feature, and the critical
// section / log sink are registered once via function pointers (see
// `critical` and `log`).
// =============================================================================

/// Bytes per cell: two bytes of header info (`next_block`, `prev_block`) plus
/// a four-byte body that is either free-list links or raw user data.
pub const CELL_SIZE: usize = 8;

/// Bytes occupied by the `next_block`/`prev_block` index pair at the front
/// of every cell.
pub const HEADER_SIZE: usize = 4;

/// Bytes available in a cell's body: free-list links when the block is
/// free, user data when it is allocated.
pub const BODY_SIZE: usize = CELL_SIZE - HEADER_SIZE;

/// High bit of `next_block` marks a block as free; the low 15 bits are the
/// successor cell index.
pub const FREE_FLAG: u16 = 0x8000;

/// Mask to recover a cell index out of a `next_block` value.
pub const INDEX_MASK: u16 = 0x7FFF;

/// Cell count large enough to index is capped by the 15-bit index space.
pub const MAX_CELLS: usize = (INDEX_MASK as usize) + 1;

/// Number of cells `blocks(s)` needs to hold `s` bytes of user data.
///
/// One cell if the data fits in a single body; otherwise two cells plus
/// however many whole cells are needed for the remainder.
pub const fn blocks_for_bytes(s: usize) -> usize {
    if s <= BODY_SIZE {
        1
    } else {
        2 + (s - 1 - BODY_SIZE) / CELL_SIZE
    }
}

/// Converts a byte budget into a cell count suitable as the const generic
/// `N` on `IndexHeap<N>`. Rounds down; callers picking `N` directly don't
/// need this, it exists for call sites that only know a byte budget.
pub const fn cells_for_bytes(bytes: usize) -> usize {
    let n = bytes / CELL_SIZE;
    if n > MAX_CELLS { MAX_CELLS } else { n }
}

#[cfg(all(feature = "first-fit", not(feature = "best-fit")))]
pub const FIRST_FIT: bool = true;
#[cfg(not(all(feature = "first-fit", not(feature = "best-fit"))))]
pub const FIRST_FIT: bool = false;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_for_small_sizes() {
        assert_eq!(blocks_for_bytes(0), 1);
        assert_eq!(blocks_for_bytes(1), 1);
        assert_eq!(blocks_for_bytes(BODY_SIZE), 1);
    }

    #[test]
    fn exact_multiples_are_tight() {
        assert_eq!(blocks_for_bytes(BODY_SIZE + 1), 2);
        assert_eq!(blocks_for_bytes(BODY_SIZE + CELL_SIZE), 3);
    }
}
