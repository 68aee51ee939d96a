//! The program-break primitive.
//!
//! Wraps `libc::sbrk` behind a `grow_break(delta) -> previous break or
//! failure` signature. This is the only place in the crate that calls
//! `sbrk` directly, so the allocator core never touches `libc` itself.

use libc::{intptr_t, sbrk};

use crate::error::BreakError;

/// Moves the program break by `delta` bytes (positive grows, negative
/// shrinks, zero returns the current break) and returns the *previous*
/// break on success.
///
/// # Safety
///
/// Must not be called concurrently with another call to this function, or
/// with any other code that moves the program break. The break is
/// process-wide state and this crate assumes it is its sole authorized
/// mutator.
pub unsafe fn grow_break(delta: isize) -> Result<*mut u8, BreakError> {
  let previous = unsafe { sbrk(delta as intptr_t) };
  if previous as usize == usize::MAX {
    return Err(BreakError::Denied { delta });
  }
  Ok(previous as *mut u8)
}

/// Returns the current program break without moving it.
pub fn current_break() -> *mut u8 {
  (unsafe { sbrk(0) }) as *mut u8
}
