//! Compile-time constants for the allocator.
//!
//! These mirror the `_MALLOC_MAX_FREE_BLK` / `_MALLOC_HEADER_SIZE` /
//! `_MALLOC_POINTER_SIZE` macros of the legacy implementation. There is no
//! runtime configuration surface: a caller who needs a different threshold
//! builds the crate with a different value of [`MAX_FREE_BLOCK`].

use std::mem;

/// Tail free block size, in bytes, at or above which [`free`](crate::allocator::FreeListAllocator::free)
/// returns heap memory to the kernel. 128 KiB, matching the legacy
/// `_MALLOC_MAX_FREE_BLK`. There is no runtime override; a fork that needs a
/// different threshold edits this constant, same as the legacy macro.
pub const MAX_FREE_BLOCK: usize = 128 * 1024;

/// `H`: the header size, one machine word, used to store a block's payload
/// byte count.
pub fn header_size() -> usize {
  mem::size_of::<usize>()
}

/// `P`: the pointer size, used for the prev/next free-list links embedded
/// in a free block's payload.
pub fn pointer_size() -> usize {
  mem::size_of::<usize>()
}

/// Minimum payload capacity of any block: large enough to hold both free-list
/// links once the block is freed.
pub fn min_payload() -> usize {
  2 * pointer_size()
}
