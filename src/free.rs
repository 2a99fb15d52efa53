// =============================================================================
// indexheap — Free
// =============================================================================

use crate::arena::Arena;
use crate::config::FREE_FLAG;
use crate::freelist::push_free_head;
use crate::list::{assimilate_down, assimilate_up};

/// Returns the block at `data` to the free pool, coalescing with a free
/// neighbor on either side. A null `data` is a no-op; an invalid `data`
/// (not previously returned by `allocate`/`reallocate` on this arena)
/// corrupts the arena, same as any misused POSIX-style allocator.
pub fn free<const N: usize>(arena: &Arena<N>, data: *mut u8) {
    let Some(mut c) = arena.index_of(data) else {
        return;
    };

    assimilate_up(arena, c);

    let down = arena.prev_block(c);
    if down != 0 && arena.is_free(down) {
        c = assimilate_down(arena, c, FREE_FLAG);
    } else {
        push_free_head(arena, c);
    }
    crate::debug!("free: cell {} returned to the free pool", c);
}
