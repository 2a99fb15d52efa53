// =============================================================================
// indexheap — Allocate
// =============================================================================

use core::ptr;

use crate::arena::Arena;
use crate::config::{blocks_for_bytes, FIRST_FIT, FREE_FLAG};
use crate::freelist::unlink_free;
use crate::list::make_new_block;

/// Serves an allocation request of `size` bytes from `arena`.
///
/// Returns null for a zero-size request or when the arena has no room
/// left, including when the index space itself would be exhausted.
pub fn allocate<const N: usize>(arena: &Arena<N>, size: usize) -> *mut u8 {
    if size == 0 {
        return ptr::null_mut();
    }
    let k = blocks_for_bytes(size) as u16;

    // Walk the free list looking for an interior block that fits, while
    // keeping track of the terminal frontier node (the block whose
    // neighbor-list successor is the end-of-heap marker) in case nothing
    // does.
    let head = arena.next_free(0);
    let mut best: Option<(u16, u16)> = None;
    let mut frontier: Option<u16> = None;

    if head == 0 {
        if arena.next_block_index(0) == 0 {
            // Arena has never been touched: the sentinel itself stands in
            // for the frontier.
            frontier = Some(0);
        } else {
            // Block 1 exists but the free list is empty: every cell is
            // either live or was the terminal frontier and got absorbed
            // (e.g. by a reallocate that then couldn't replant it) without
            // anything free left behind. Nothing to split, nowhere to
            // extend into.
            crate::warn!("allocate: free list exhausted, no frontier to extend");
            return ptr::null_mut();
        }
    } else {
        let mut cf = head;
        loop {
            let next_idx = arena.next_block_index(cf);
            if next_idx != 0 {
                let bs = next_idx - cf;
                if bs >= k {
                    if FIRST_FIT {
                        best = Some((cf, bs));
                        break;
                    }
                    best = match best {
                        None => Some((cf, bs)),
                        Some((_, best_bs)) if bs < best_bs => Some((cf, bs)),
                        other => other,
                    };
                }
            } else {
                frontier = Some(cf);
            }

            let next_free = arena.next_free(cf);
            if next_free == 0 {
                break;
            }
            cf = next_free;
        }
    }

    if let Some((cf, bs)) = best {
        if bs == k {
            unlink_free(arena, cf);
            crate::debug!("allocate: exact-fit cell {} ({} cells)", cf, bs);
            return arena.data_ptr(cf);
        }
        // Carve the new allocation from the high end of the free region so
        // the free list needs no surgery: the head keeps its place on the
        // list, just shrunk.
        let tail = make_new_block(arena, cf, bs - k, FREE_FLAG);
        crate::debug!("allocate: split cell {} ({} cells) -> {} ({} cells)", cf, bs, tail, k);
        return arena.data_ptr(tail);
    }

    let mut cf = match frontier {
        Some(c) => c,
        None => unreachable!("free list is missing its terminal frontier node"),
    };

    if cf as usize + k as usize + 1 >= N {
        crate::warn!("allocate: out of memory requesting {} cells", k);
        return ptr::null_mut();
    }

    if cf == 0 {
        // First-ever allocation: materialize block 1 out of the zeroed
        // arena before treating it as the frontier to extend.
        arena.set_next_block_raw(0, 1);
        arena.set_next_free(0, 1);
        cf = 1;
    }

    let new_frontier = cf + k;
    let pf = arena.prev_free(cf);
    arena.set_next_free(pf, new_frontier);
    // Carries the (possibly still virgin, all-zero) frontier cell forward:
    // its next_block/next_free terminators and prev_free link move intact.
    arena.copy_cell(cf, new_frontier);
    // The frontier is always free by definition; force the flag since a
    // virgin cell's copied bytes are all zero (no flag bit set).
    let raw = arena.next_block_raw(new_frontier);
    arena.set_next_block_raw(new_frontier, raw | FREE_FLAG);
    arena.set_next_block_raw(cf, new_frontier);
    arena.set_prev_block(new_frontier, cf);

    crate::debug!("allocate: extended frontier, cell {} ({} cells)", cf, k);
    arena.data_ptr(cf)
}
