// =============================================================================
// indexheap
// =============================================================================
//
// A fixed-region, block-indexed heap allocator for memory-constrained
// targets. The arena is a flat array of fixed-size cells; both the
// in-heap neighbor list and the free list are threaded through 15-bit
// cell indices rather than pointers, halving per-block bookkeeping
// compared to a pointer-linked free list. A free block's bookkeeping is
// reused as user data the moment it is allocated.
//
// No OS calls, no backing-store growth, no internal locking: mutual
// exclusion across calls is delegated to the host via `critical`, and
// logging is delegated to the host via `log`.
//
// ```
// use indexheap::IndexHeap;
//
// static HEAP: IndexHeap<4096> = IndexHeap::new();
//
// let p = HEAP.allocate(64);
// HEAP.free(p);
// ```
// =============================================================================

#![cfg_attr(not(test), no_std)]

pub mod arena;
pub mod allocate;
pub mod config;
pub mod critical;
pub mod free;
pub mod freelist;
pub mod global;
pub mod info;
pub mod list;
pub mod log;
pub mod reallocate;

#[cfg(test)]
mod scenario_tests;

pub use arena::Arena;
pub use config::{blocks_for_bytes, cells_for_bytes};
pub use global::IndexHeap;
pub use info::Info;
