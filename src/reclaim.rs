//! Reclamation policy.
//!
//! Only the tail free block (the one whose end coincides with the current
//! program break) can ever be handed back to the kernel, since shrinking
//! the break can only release bytes at the top of the heap. This mirrors
//! the legacy `check_footprint()`.

use crate::codec;
use crate::config;
use crate::registry::HeapRegistry;
use crate::trace::{debug_event, trace_event, warn_event};

/// Consults the tail-shrink threshold after a coalesce that may have
/// produced or extended the tail free block.
///
/// `candidate` is the block that was just modified by a coalesce. If its
/// `next` link is non-null it is not the tail and this is a no-op. Callers
/// may invoke this after any coalesce without first checking tail-ness
/// themselves.
///
/// If `candidate` is the tail and its size is at or above
/// [`config::MAX_FREE_BLOCK`], detaches it from the list and shrinks the
/// program break by `size + H`. A shrink failure is logged and otherwise
/// ignored: the memory simply stays with the process, which is not a fatal
/// condition.
///
/// # Safety
///
/// `candidate` must point at a valid free block currently linked into
/// `registry`'s free list.
pub unsafe fn maybe_reclaim(registry: &mut HeapRegistry, candidate: *mut u8) {
  if !unsafe { codec::get_next_link(candidate) }.is_null() {
    return; // not the tail; shrinking the break could not release it anyway.
  }

  let size = unsafe { codec::read_size(candidate) };
  if size < config::MAX_FREE_BLOCK {
    trace_event!("rallocator: tail free block ({size} bytes) below reclaim threshold");
    return;
  }

  debug_event!("rallocator: reclaiming tail free block of {size} bytes");

  let tail_prev = unsafe { codec::get_prev_link(candidate) };
  if tail_prev.is_null() {
    registry.set_head(std::ptr::null_mut());
  } else {
    unsafe { codec::set_next_link(tail_prev, std::ptr::null_mut()) };
  }

  let to_release = (size + config::header_size()) as isize;
  if let Err(err) = unsafe { crate::brk::grow_break(-to_release) } {
    warn_event!("rallocator: reclaiming {size} bytes failed: {err}");
  }
}
