// =============================================================================
// indexheap — Free-list primitives
// =============================================================================
//
// The free list is a ring threaded through `next_free`/`prev_free`, rooted
// at the sentinel cell 0. These two operations are its only mutators.
// =============================================================================

use crate::arena::Arena;
use crate::config::FREE_FLAG;

/// Removes `c` from the free list and clears its free flag. Does not touch
/// the neighbor list.
pub fn unlink_free<const N: usize>(arena: &Arena<N>, c: u16) {
    let next = arena.next_free(c);
    let prev = arena.prev_free(c);
    arena.set_next_free(prev, next);
    arena.set_prev_free(next, prev);

    let raw = arena.next_block_raw(c);
    arena.set_next_block_raw(c, raw & !FREE_FLAG);
}

/// Splices `c` in right after the sentinel, making it the new free-list
/// head, and sets its free flag.
pub fn push_free_head<const N: usize>(arena: &Arena<N>, c: u16) {
    let old_head = arena.next_free(0);
    arena.set_prev_free(old_head, c);
    arena.set_next_free(c, old_head);
    arena.set_prev_free(c, 0);
    arena.set_next_free(0, c);

    let raw = arena.next_block_raw(c);
    arena.set_next_block_raw(c, raw | FREE_FLAG);
}
