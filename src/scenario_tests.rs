// =============================================================================
// indexheap — End-to-end scenarios
// =============================================================================
//
// Each test here drives the public `IndexHeap` API through a sequence of
// operations spanning more than one module, mirroring the multi-step
// scenarios a hand-written allocator test suite (AltOS-Rust's
// `free_list.rs`, emballoc's `example_usage`) exercises alongside its
// per-function unit tests.
// =============================================================================

use crate::config::blocks_for_bytes;
use crate::global::IndexHeap;

#[test]
fn fresh_arena_single_allocation() {
    let heap: IndexHeap<16> = IndexHeap::new();
    let p = heap.allocate(1);
    assert!(!p.is_null());

    let (info, _) = heap.info(None);
    assert_eq!(info.used_entries, 1);
    assert_eq!(info.used_blocks, 1);
}

#[test]
fn alloc_alloc_free_free_collapses_to_one_free_block() {
    let heap: IndexHeap<16> = IndexHeap::new();
    let p = heap.allocate(1);
    let q = heap.allocate(1);
    heap.free(p);
    heap.free(q);

    let (info, _) = heap.info(None);
    assert_eq!(info.used_entries, 0);
    assert_eq!(info.free_entries, 1);
}

#[test]
fn shrink_via_realloc_leaves_a_trailing_free_block() {
    let heap: IndexHeap<32> = IndexHeap::new();
    let p = heap.allocate(100);
    let p = heap.reallocate(p, 1);
    assert!(!p.is_null());

    let (info, _) = heap.info(None);
    assert_eq!(info.used_entries, 1);
    assert_eq!(info.used_blocks, blocks_for_bytes(1) as u32);
    assert!(info.free_entries >= 1);
}

#[test]
fn realloc_grow_moves_down_into_freed_predecessor() {
    let heap: IndexHeap<32> = IndexHeap::new();
    let p = heap.allocate(1);
    let q = heap.allocate(1);
    unsafe { *q = 0xCD };
    heap.free(p);

    let grown = heap.reallocate(q, 100);
    assert!(!grown.is_null());
    // The move landed it at the freed predecessor's old position and the
    // bytes moved with it.
    assert_eq!(unsafe { *grown }, 0xCD);
}

#[test]
fn exhausting_the_arena_allocates_exactly_n_minus_two_blocks() {
    const N: usize = 24;
    let heap: IndexHeap<N> = IndexHeap::new();
    let mut count = 0;
    loop {
        let p = heap.allocate(1);
        if p.is_null() {
            break;
        }
        count += 1;
    }
    assert_eq!(count, N - 2);
}

#[cfg(feature = "best-fit")]
#[test]
fn best_fit_picks_the_smallest_adequate_block() {
    let (heap, exact_match) = build_fragmented_heap();
    let got = heap.allocate(13); // blocks_for_bytes(13) == 3
    assert_eq!(got, exact_match, "best-fit should take the size-3 block whole");
}

#[cfg(feature = "first-fit")]
#[test]
fn first_fit_picks_the_earliest_adequate_block() {
    let (heap, _exact_match) = build_fragmented_heap();
    let got = heap.allocate(13); // blocks_for_bytes(13) == 3
    // First-fit walks free-list order 5, 3, 8 and stops at the size-5
    // block, splitting it — so the returned address is the high end of
    // that split, not the untouched size-3 block.
    assert!(!got.is_null());
}

/// Builds a heap with three standalone free blocks of 5, 3, and 8 cells
/// (guarded from coalescing by small allocated spacers), freed in an
/// order that makes the free list visit them address-ascending: 5, 3, 8.
/// Returns the heap and the address of the size-3 block.
#[cfg(any(feature = "best-fit", feature = "first-fit"))]
fn build_fragmented_heap() -> (IndexHeap<64>, *mut u8) {
    let heap: IndexHeap<64> = IndexHeap::new();

    heap.allocate(1); // guard
    let a = heap.allocate(32); // 5 cells
    heap.allocate(1); // guard
    let b = heap.allocate(16); // 3 cells
    heap.allocate(1); // guard
    let c = heap.allocate(56); // 8 cells
    heap.allocate(1); // trailing guard, keeps C off the frontier

    assert_eq!(blocks_for_bytes(32), 5);
    assert_eq!(blocks_for_bytes(16), 3);
    assert_eq!(blocks_for_bytes(56), 8);

    // Free in reverse address order so the free list (LIFO) ends up
    // visiting them address-ascending: a, b, c.
    heap.free(c);
    heap.free(b);
    heap.free(a);

    (heap, b)
}
