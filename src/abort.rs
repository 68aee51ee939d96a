//! The fatal-abort collaborator.
//!
//! The legacy implementation signals corruption by sending itself
//! `SIGSEGV`. A safe-Rust crate doesn't reach for raw signals for this;
//! `std::process::abort()` gives the same "terminate abnormally, no
//! unwinding" guarantee without touching `libc::kill`.

use crate::trace::error_event;

/// Terminates the process abnormally. Called when `free` detects corruption
/// (a non-null pointer passed in before any `allocate` has ever run).
///
/// Never returns.
pub fn fatal_abort() -> ! {
  error_event!("rallocator: corruption detected, aborting process");
  std::process::abort();
}
