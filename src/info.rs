// =============================================================================
// indexheap — Heap walk / info
// =============================================================================

use crate::arena::Arena;

/// Accounting produced by a full neighbor-list walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
    pub total_entries: u32,
    pub total_blocks: u32,
    pub used_entries: u32,
    pub used_blocks: u32,
    pub free_entries: u32,
    pub free_blocks: u32,
}

/// Walks the neighbor list from the sentinel, accounting used and free
/// blocks. If `probe` is given and matches the starting address of a free
/// block, the walk stops and returns that address — used to confirm a
/// pointer is currently on the free list rather than live.
pub fn walk<const N: usize>(arena: &Arena<N>, probe: Option<*const u8>) -> (Info, Option<*const u8>) {
    let mut info = Info::default();
    let mut found = None;

    let mut c = arena.next_block_index(0);
    while arena.next_block_index(c) != 0 {
        let size = arena.block_size_cells(c);
        let free = arena.is_free(c);

        info.total_entries += 1;
        info.total_blocks += size as u32;
        if free {
            info.free_entries += 1;
            info.free_blocks += size as u32;
            if let Some(addr) = probe {
                if arena.data_ptr(c) as *const u8 == addr {
                    found = Some(addr);
                    return (info, found);
                }
            }
        } else {
            info.used_entries += 1;
            info.used_blocks += size as u32;
        }

        c = arena.next_block_index(c);
    }

    // `c` is now the terminal frontier node itself (cell 0 on a fresh,
    // never-touched arena); everything from it to the end of the arena is
    // unclaimed free space, not a real entry.
    info.total_blocks += N as u32 - c as u32;
    info.free_blocks += N as u32 - c as u32;

    (info, found)
}
