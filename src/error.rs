//! Error type for the program-break primitive.
//!
//! This is consumed entirely inside [`crate::brk`] and [`crate::allocator`];
//! the public `allocate`/`free` ABI keeps returning raw pointers per the
//! legacy contract and never exposes this type.

use thiserror::Error;

/// The program-break primitive refused to move the break.
#[derive(Debug, Error)]
pub enum BreakError {
  /// `sbrk` returned its failure sentinel for the given delta.
  #[error("program break primitive denied a move of {delta} bytes")]
  Denied {
    /// The delta that was requested (positive to grow, negative to shrink).
    delta: isize,
  },
}
