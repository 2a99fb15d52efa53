// =============================================================================
// indexheap — Neighbor-list primitives
// =============================================================================
//
// The neighbor list threads every block, free or allocated, in ascending
// cell-index order. These three operations are the only ways it is ever
// restructured: split a block in two, or merge a block with the free
// neighbor above or below it.
// =============================================================================

use crate::arena::Arena;
use crate::config::FREE_FLAG;
use crate::freelist::{push_free_head, unlink_free};

/// Splits the block starting at `c` after `k` cells, so a new block begins
/// at `c + k` and inherits everything `c` used to point to as its
/// successor. `freemask` (0 or `FREE_FLAG`) decides whether the boundary
/// between `c` and the new tail marks the tail as free.
///
/// Caller's responsibility: if `freemask == FREE_FLAG`, link the new block
/// into the free list; this function only fixes up the neighbor list.
pub fn make_new_block<const N: usize>(arena: &Arena<N>, c: u16, k: u16, freemask: u16) -> u16 {
    let new = c + k;
    let old_next = arena.next_block_index(c);

    arena.set_next_block_raw(new, old_next);
    arena.set_prev_block(new, c);
    arena.set_prev_block(old_next, new);
    arena.set_next_block_raw(c, new | freemask);

    new
}

/// Merges `c` with its up-neighbor if that neighbor is free. No-op
/// otherwise. The merged block keeps `c`'s own free-flag state.
///
/// If the up-neighbor was the terminal frontier node, `c` itself becomes
/// terminal (its successor reads as the implicit end-of-heap marker)
/// while keeping whatever flag it already had — callers that need `c` to
/// have a concrete size again afterward, whether allocated or free, use
/// [`cap_at_frontier`] or the free-list push/merge that already follows
/// in `free`.
pub fn assimilate_up<const N: usize>(arena: &Arena<N>, c: u16) {
    let up = arena.next_block_index(c);
    if up == 0 || !arena.is_free(up) {
        return;
    }
    unlink_free(arena, up);
    let up_next = arena.next_block_index(up);
    arena.set_prev_block(up_next, c);
    let flag = arena.next_block_raw(c) & FREE_FLAG;
    arena.set_next_block_raw(c, up_next | flag);
}

/// Merges `c` into its down-neighbor `prev_block(c)`, which the caller has
/// already established is free (and has already unlinked from the free
/// list, or wants to keep linked — see `freemask`). Returns the
/// predecessor's index, now the current block's index.
///
/// `freemask` (0 or `FREE_FLAG`) sets the merged block's free state.
pub fn assimilate_down<const N: usize>(arena: &Arena<N>, c: u16, freemask: u16) -> u16 {
    let p = arena.prev_block(c);
    let c_next = arena.next_block_index(c);
    arena.set_next_block_raw(p, c_next | freemask);
    arena.set_prev_block(c_next, p);
    p
}

/// Gives `c` a concrete size again after it may have absorbed the terminal
/// frontier (whose successor index is the implicit end-of-heap marker,
/// not a subtractable number). If `c` is terminal, plants a fresh, free
/// terminator `k` cells past it — the in-place equivalent of `allocate`'s
/// frontier extension — and returns `true`. A no-op returning `false` if
/// `c` already has a concrete successor, or if there's no room left to
/// plant the new terminator.
pub fn cap_at_frontier<const N: usize>(arena: &Arena<N>, c: u16, k: u16) -> bool {
    if arena.next_block_index(c) != 0 {
        return false;
    }
    let at = c + k;
    if at as usize + 1 >= N {
        return false;
    }
    arena.set_next_block_raw(c, at);
    arena.set_prev_block(at, c);
    push_free_head(arena, at);
    true
}
