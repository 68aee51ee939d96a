//! The heap registry: the single piece of process-wide mutable state this
//! allocator owns.
//!
//! Holds `free_list_head` (null before the first allocation), lazily
//! initialized inside the first `allocate` call that finds it null and
//! never reset afterwards. Scoped to a [`HeapRegistry`] value owned by a
//! [`crate::allocator::FreeListAllocator`] rather than a `static` (see
//! `DESIGN.md`).

use std::ptr;

/// Tracks the head of the address-ordered doubly-linked free list.
pub struct HeapRegistry {
  free_list_head: *mut u8,
}

impl HeapRegistry {
  /// A registry with no free blocks yet: the state before the first
  /// `allocate` call.
  pub const fn new() -> Self {
    Self { free_list_head: ptr::null_mut() }
  }

  /// Whether the free list has ever been initialized.
  pub fn is_initialized(&self) -> bool {
    !self.free_list_head.is_null()
  }

  /// The current free-list head, or null if none.
  pub fn head(&self) -> *mut u8 {
    self.free_list_head
  }

  /// Replaces the free-list head.
  pub fn set_head(&mut self, head: *mut u8) {
    self.free_list_head = head;
  }
}

impl Default for HeapRegistry {
  fn default() -> Self {
    Self::new()
  }
}
