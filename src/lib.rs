//! # rallocator: a free-list heap allocator over the program break
//!
//! A drop-in replacement for the standard process-heap allocator: two
//! operations, [`FreeListAllocator::allocate`] and [`FreeListAllocator::free`],
//! backed by a single contiguous heap region grown and shrunk through the
//! kernel's program-break primitive (`sbrk`).
//!
//! ## Overview
//!
//! Unlike a pure bump allocator, this one reuses freed memory: blocks are
//! tracked in an address-ordered doubly-linked free list, with first-fit
//! search at allocation time, splitting to avoid wasting a block bigger than
//! requested, and four-case neighbor coalescing at deallocation time to keep
//! the free list from fragmenting into isolated single-word gaps.
//!
//! ```text
//!   Free-list allocator concept:
//!
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         HEAP MEMORY                               │
//!   │                                                                   │
//!   │   ┌─────┬──────────┬─────┬──────────┬─────┬──────────────────┐    │
//!   │   │ L1  │  free A  │ L2  │  free B  │ L3  │   free (tail)    │    │
//!   │   └─────┴──────────┴─────┴──────────┴─────┴──────────────────┘    │
//!   │                                                        ▲          │
//!   │                                                 Program Break     │
//!   └───────────────────────────────────────────────────────────────────┘
//!
//!   free A and free B are linked into an address-ordered free list;
//!   L1/L2/L3 are live blocks whose header/link slots are off limits.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rallocator
//!   ├── config     - compile-time constants (MAX_FREE_BLOCK, H, P)
//!   ├── codec      - block metadata accessors over raw *mut u8
//!   ├── registry   - the free-list head, the allocator's one piece of state
//!   ├── brk        - the program-break primitive (wraps libc::sbrk)
//!   ├── error      - BreakError for program-break failures
//!   ├── trace      - debug trace sink (log crate, gated by the `trace` feature)
//!   ├── abort      - fatal-abort collaborator for detected corruption
//!   └── allocator  - FreeListAllocator: allocate/free
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rallocator::FreeListAllocator;
//!
//! let mut allocator = FreeListAllocator::new();
//!
//! unsafe {
//!     let ptr = allocator.allocate(64);
//!     assert!(!ptr.is_null());
//!
//!     ptr.write(42);
//!     assert_eq!(ptr.read(), 42);
//!
//!     allocator.free(ptr);
//! }
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; `FreeListAllocator`
//!   is not `Sync`.
//! - **Word alignment only**: no support for over-aligned allocations.
//! - **No zero-initialization**: freshly allocated bytes may hold stale data.
//! - **Tail-only reclamation**: only the free block adjacent to the program
//!   break can ever be returned to the kernel.
//! - **Unix-only**: requires `libc` and `sbrk` (POSIX systems).
//!
//! ## Safety
//!
//! This crate is inherently unsafe, as it deals with raw memory management
//! and directly manipulates the process's program break. Every allocation
//! and deallocation operation requires an `unsafe` block.

pub mod abort;
pub mod allocator;
pub mod brk;
pub mod codec;
pub mod config;
pub mod error;
pub mod reclaim;
pub mod registry;
mod trace;

pub use allocator::FreeListAllocator;
pub use error::BreakError;
