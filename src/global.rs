// =============================================================================
// indexheap — Public heap handle and GlobalAlloc
// =============================================================================

use core::alloc::{GlobalAlloc, Layout};

use crate::allocate::allocate;
use crate::arena::Arena;
use crate::critical::CriticalGuard;
use crate::free::free;
use crate::info::{walk, Info};
use crate::reallocate::reallocate;

/// A fixed-region, block-indexed heap of `N` cells.
///
/// Every public method brackets its work in a [`CriticalGuard`], so a host
/// with a registered critical section gets a correctly-serialized
/// allocator without any locking inside the allocator itself — the same
/// division of labor as the kernel's `SpinLock`, just with the lock
/// mechanism supplied externally (see [`crate::critical`]).
///
/// `IndexHeap::new()` is `const`, so it can back a `static`:
/// ```
/// # use indexheap::IndexHeap;
/// static HEAP: IndexHeap<4096> = IndexHeap::new();
/// ```
pub struct IndexHeap<const N: usize> {
    arena: Arena<N>,
}

impl<const N: usize> IndexHeap<N> {
    pub const fn new() -> Self {
        IndexHeap { arena: Arena::new() }
    }

    /// Allocates `size` bytes. Returns null for `size == 0` or when the
    /// arena has no room left.
    pub fn allocate(&self, size: usize) -> *mut u8 {
        let _guard = CriticalGuard::enter();
        allocate(&self.arena, size)
    }

    /// Releases a previously allocated block. A null pointer is a no-op.
    pub fn free(&self, data: *mut u8) {
        let _guard = CriticalGuard::enter();
        free(&self.arena, data)
    }

    /// Resizes a previously allocated block, or allocates/frees per the
    /// POSIX `realloc` null/zero conventions.
    pub fn reallocate(&self, data: *mut u8, size: usize) -> *mut u8 {
        let _guard = CriticalGuard::enter();
        reallocate(&self.arena, data, size)
    }

    /// Walks the arena, returning usage accounting and, if `probe` is
    /// given and matches a free block's address, that address back.
    pub fn info(&self, probe: Option<*const u8>) -> (Info, Option<*const u8>) {
        let _guard = CriticalGuard::enter();
        walk(&self.arena, probe)
    }
}

impl<const N: usize> Default for IndexHeap<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// SAFETY: `IndexHeap` relies entirely on the host-registered critical
/// section for mutual exclusion; the allocator itself holds no lock. A
/// host declaring an `IndexHeap` as `#[global_allocator]` must register a
/// real critical section (see `critical::set_critical_section`) before
/// the first allocation if it is ever called from more than one context.
unsafe impl<const N: usize> GlobalAlloc for IndexHeap<N> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        debug_assert!(
            layout.align() <= crate::config::CELL_SIZE,
            "indexheap guarantees cell-size alignment only"
        );
        self.allocate(layout.size())
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        self.free(ptr)
    }

    unsafe fn realloc(&self, ptr: *mut u8, _layout: Layout, new_size: usize) -> *mut u8 {
        self.reallocate(ptr, new_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_heap_serves_allocations() {
        let heap: IndexHeap<32> = IndexHeap::new();
        let p = heap.allocate(8);
        assert!(!p.is_null());
        heap.free(p);
    }

    #[test]
    fn info_reflects_live_allocations() {
        let heap: IndexHeap<32> = IndexHeap::new();
        heap.allocate(1);
        heap.allocate(1);
        let (info, _) = heap.info(None);
        assert_eq!(info.used_entries, 2);
    }
}
