//! The allocator and deallocator core.
//!
//! `FreeListAllocator` owns the heap registry and implements the two public
//! entry points, `allocate` and `free`, against the address-ordered
//! doubly-linked free list. State is held by a value the caller constructs
//! and keeps alive, not a process-wide `static`, and `allocate`/`free`
//! implement first-fit search, splitting, growth, and four-case neighbor
//! coalescing.

use std::ptr;

use crate::brk;
use crate::codec;
use crate::config;
use crate::registry::HeapRegistry;
use crate::reclaim::maybe_reclaim;
use crate::trace::{debug_event, trace_event};

/// A single-threaded, process-local free-list allocator backed by the
/// program break.
///
/// Not thread-safe by design: no internal locking is
/// attempted, and the type carries a raw pointer so it is not `Sync`. Every
/// call to [`FreeListAllocator::allocate`]/[`FreeListAllocator::free`] must
/// happen from a single serial context.
pub struct FreeListAllocator {
  registry: HeapRegistry,
}

impl FreeListAllocator {
  /// An allocator with no heap yet. The registry initializes lazily on the
  /// first `allocate` call.
  pub const fn new() -> Self {
    Self { registry: HeapRegistry::new() }
  }

  /// The current free-list head, or null if no free blocks exist.
  ///
  /// Not part of the allocation ABI. This is an introspection hook for
  /// tests and diagnostics, combined with [`crate::codec`]'s accessors to
  /// walk the free list and check its invariants.
  pub fn free_list_head(&self) -> *mut u8 {
    self.registry.head()
  }

  /// Allocates `n` payload bytes and returns a pointer to them, or null if
  /// the program-break primitive fails.
  ///
  /// `n == 0` is treated as `n == 1` (matches the legacy `malloc(0)`
  /// behavior permitted by SUSv3). The returned pointer is word-aligned,
  /// refers to at least `n` writable bytes, and must be passed to
  /// [`FreeListAllocator::free`] at most once.
  ///
  /// # Safety
  ///
  /// Must not be called recursively from within `allocate`/`free` on the
  /// same allocator, and must not run concurrently with any other call into
  /// this allocator.
  pub unsafe fn allocate(&mut self, n: usize) -> *mut u8 {
    let n = if n == 0 { 1 } else { n };
    trace_event!("rallocator: allocate({n})");

    if !self.registry.is_initialized() {
      let initial = 2 * n + config::header_size();
      debug_event!("rallocator: lazily initializing heap with {initial} bytes");
      let addr = match unsafe { brk::grow_break(initial as isize) } {
        Ok(addr) => addr,
        Err(_) => return ptr::null_mut(),
      };

      unsafe {
        codec::write_size(addr, 2 * n);
        codec::set_prev_link(addr, ptr::null_mut());
        codec::set_next_link(addr, ptr::null_mut());
      }
      self.registry.set_head(addr);
    }

    let h = config::header_size();
    let mut tail = ptr::null_mut();
    let mut p = self.registry.head();

    while !p.is_null() {
      if unsafe { codec::read_size(p) } > n + h {
        return unsafe { self.split(p, n) };
      }
      tail = p;
      p = unsafe { codec::get_next_link(p) };
    }

    // No block was large enough. `tail` is the last node visited, the free
    // block ending at the current program break, unless the free list is
    // empty, which lazy init above makes unreachable on any call past the
    // first.
    debug_assert!(!tail.is_null(), "free list must be non-empty after lazy init");

    let grow_by = 2 * n + h;
    debug_event!("rallocator: no fit for {n} bytes, growing break by {grow_by}");
    if unsafe { brk::grow_break(grow_by as isize) }.is_err() {
      return ptr::null_mut();
    }

    unsafe {
      let extended = codec::read_size(tail) + grow_by;
      codec::write_size(tail, extended);
      self.split(tail, n)
    }
  }

  /// Carves a live block of `n` payload bytes out of the free block at `p`,
  /// relinking the remainder into `p`'s old list slot, and returns a
  /// pointer to the live block's payload.
  ///
  /// # Safety
  ///
  /// `p` must be a free block with `read_size(p) > n + H`, currently linked
  /// into `self.registry`.
  unsafe fn split(&mut self, p: *mut u8, n: usize) -> *mut u8 {
    let h = config::header_size();
    let orig = unsafe { codec::read_size(p) };
    let prev_b = unsafe { codec::get_prev_link(p) };
    let next_b = unsafe { codec::get_next_link(p) };

    let remainder = unsafe { p.add(h).add(n) };

    unsafe {
      codec::write_size(p, n);
      codec::write_size(remainder, orig - n - h);
      codec::set_prev_link(remainder, prev_b);
      codec::set_next_link(remainder, next_b);
    }

    if prev_b.is_null() {
      self.registry.set_head(remainder);
    } else {
      unsafe { codec::set_next_link(prev_b, remainder) };
    }
    if !next_b.is_null() {
      unsafe { codec::set_prev_link(next_b, remainder) };
    }

    unsafe { codec::payload_of(p) }
  }

  /// Releases a block previously returned by [`FreeListAllocator::allocate`].
  ///
  /// A null `user_ptr` is a no-op, matching the legacy `free(NULL)`
  /// contract. Calling `free` with a non-null pointer before any
  /// `allocate` has ever succeeded is treated as memory corruption and
  /// aborts the process. Double-free and pointers
  /// not obtained from `allocate` are undefined behavior and are not
  /// detected.
  ///
  /// # Safety
  ///
  /// `user_ptr` must be null or a pointer previously returned by
  /// [`FreeListAllocator::allocate`] on this same allocator and not yet
  /// freed.
  pub unsafe fn free(&mut self, user_ptr: *mut u8) {
    if user_ptr.is_null() {
      return;
    }

    if !self.registry.is_initialized() {
      crate::abort::fatal_abort();
    }

    trace_event!("rallocator: free({user_ptr:p})");

    let b = unsafe { codec::block_of(user_ptr) };

    // Insertion-point search: prev is the last node with address < b, curr
    // is the first node with address >= b (or null if the list is
    // exhausted).
    let mut prev: *mut u8 = ptr::null_mut();
    let mut curr = self.registry.head();
    while !curr.is_null() && curr < b {
      prev = curr;
      curr = unsafe { codec::get_next_link(curr) };
    }

    match (prev.is_null(), curr.is_null()) {
      (false, false) => unsafe { self.free_middle(prev, curr, b) },
      (false, true) => unsafe { self.free_tail(prev, b) },
      (true, false) => unsafe { self.free_head(curr, b) },
      // The registry was just confirmed initialized, so the free list is
      // non-empty and at least one of prev/curr must be non-null.
      (true, true) => unreachable!("free list cannot be empty once initialized"),
    }
  }

  /// `prev` and `curr` both exist: `b` is being inserted strictly between
  /// two existing free blocks. Checks prev-adjacency before next-adjacency.
  /// A block adjacent to both neighbors only merges with `prev`, leaving
  /// a transient invariant violation (two address-adjacent free blocks
  /// left unmerged) that a later free closes (see DESIGN.md).
  unsafe fn free_middle(&mut self, prev: *mut u8, curr: *mut u8, b: *mut u8) {
    let h = config::header_size();

    if unsafe { codec::adjacent(prev, b) } {
      unsafe {
        let merged = codec::read_size(prev) + h + codec::read_size(b);
        codec::write_size(prev, merged);
      }
      // curr's links already refer to prev; no reclamation (curr still follows).
    } else if unsafe { codec::adjacent(b, curr) } {
      unsafe {
        let merged = codec::read_size(b) + h + codec::read_size(curr);
        codec::write_size(b, merged);

        let curr_next = codec::get_next_link(curr);
        codec::set_next_link(prev, b);
        codec::set_prev_link(b, prev);
        codec::set_next_link(b, curr_next);
        if !curr_next.is_null() {
          codec::set_prev_link(curr_next, b);
        }
        maybe_reclaim(&mut self.registry, b);
      }
    } else {
      unsafe {
        codec::set_next_link(prev, b);
        codec::set_prev_link(curr, b);
        codec::set_prev_link(b, prev);
        codec::set_next_link(b, curr);
      }
    }
  }

  /// `prev` exists, `curr` is null: `b` sorts after every existing free
  /// block.
  unsafe fn free_tail(&mut self, prev: *mut u8, b: *mut u8) {
    let h = config::header_size();

    if unsafe { codec::adjacent(prev, b) } {
      unsafe {
        let merged = codec::read_size(prev) + h + codec::read_size(b);
        codec::write_size(prev, merged);
        maybe_reclaim(&mut self.registry, prev);
      }
    } else {
      unsafe {
        codec::set_next_link(prev, b);
        codec::set_prev_link(b, prev);
        codec::set_next_link(b, ptr::null_mut());
      }
    }
  }

  /// `prev` is null, `curr` exists: `b` sorts before every existing free
  /// block and becomes (or merges into) the new head.
  unsafe fn free_head(&mut self, curr: *mut u8, b: *mut u8) {
    let h = config::header_size();

    if unsafe { codec::adjacent(b, curr) } {
      unsafe {
        let merged = codec::read_size(b) + h + codec::read_size(curr);
        codec::write_size(b, merged);

        let curr_next = codec::get_next_link(curr);
        codec::set_prev_link(b, ptr::null_mut());
        codec::set_next_link(b, curr_next);
        if !curr_next.is_null() {
          codec::set_prev_link(curr_next, b);
        }
      }
      self.registry.set_head(b);
      unsafe { maybe_reclaim(&mut self.registry, b) };
    } else {
      unsafe {
        codec::set_prev_link(curr, b);
        codec::set_prev_link(b, ptr::null_mut());
        codec::set_next_link(b, curr);
      }
      self.registry.set_head(b);
    }
  }
}

impl Default for FreeListAllocator {
  fn default() -> Self {
    Self::new()
  }
}
