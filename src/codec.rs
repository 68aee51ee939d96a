//! Block metadata codec.
//!
//! A block is addressed by a raw `*mut u8` pointing at its header, never by
//! a typed record. The header stores the block's payload byte count; a
//! *free* block additionally stores its previous/next free-list links in the
//! first two words of its payload. A *live* block's payload is owned by the
//! caller and these two words may hold arbitrary user data, so the link
//! accessors below must never be called on a live block.
//!
//! All arithmetic here is performed in `*mut u8` space (byte offsets), not
//! through pointer-to-`Block` stride, to avoid claiming provenance over
//! bytes that may currently belong to the user.

use std::mem;
use std::ptr;

use crate::config;

/// Offset, in bytes, of the previous-free-block link within a block's
/// payload (`H`).
fn prev_link_offset() -> usize {
  config::header_size()
}

/// Offset, in bytes, of the next-free-block link within a block's payload
/// (`H + P`).
fn next_link_offset() -> usize {
  config::header_size() + config::pointer_size()
}

/// Reads the payload byte count stored in `p`'s header.
///
/// # Safety
///
/// `p` must point at a valid block header.
pub unsafe fn read_size(p: *mut u8) -> usize {
  unsafe { ptr::read(p as *const usize) }
}

/// Stores `size` as the payload byte count in `p`'s header.
///
/// # Safety
///
/// `p` must point at a valid block header.
pub unsafe fn write_size(p: *mut u8, size: usize) {
  unsafe { ptr::write(p as *mut usize, size) };
}

/// Reads the previous-free-block link.
///
/// # Safety
///
/// `p` must point at a block currently in the *free* state. Reading the
/// link slots of a live block yields whatever user data lives there.
pub unsafe fn get_prev_link(p: *mut u8) -> *mut u8 {
  unsafe { ptr::read(p.add(prev_link_offset()) as *const *mut u8) }
}

/// Stores `prev` as the previous-free-block link.
///
/// # Safety
///
/// `p` must point at a block currently in the *free* state.
pub unsafe fn set_prev_link(p: *mut u8, prev: *mut u8) {
  unsafe { ptr::write(p.add(prev_link_offset()) as *mut *mut u8, prev) };
}

/// Reads the next-free-block link.
///
/// # Safety
///
/// `p` must point at a block currently in the *free* state.
pub unsafe fn get_next_link(p: *mut u8) -> *mut u8 {
  unsafe { ptr::read(p.add(next_link_offset()) as *const *mut u8) }
}

/// Stores `next` as the next-free-block link.
///
/// # Safety
///
/// `p` must point at a block currently in the *free* state.
pub unsafe fn set_next_link(p: *mut u8, next: *mut u8) {
  unsafe { ptr::write(p.add(next_link_offset()) as *mut *mut u8, next) };
}

/// `p + H`: the payload address of the block whose header starts at `p`.
///
/// # Safety
///
/// `p` must point at a valid block header.
pub unsafe fn payload_of(p: *mut u8) -> *mut u8 {
  unsafe { p.add(config::header_size()) }
}

/// `payload - H`: the block header address for a payload pointer, the
/// inverse of [`payload_of`]. Used by `free` to recover the header from the
/// pointer the user handed back.
///
/// # Safety
///
/// `payload` must have been produced by a prior [`payload_of`] call on a
/// still-live block.
pub unsafe fn block_of(payload: *mut u8) -> *mut u8 {
  unsafe { payload.sub(config::header_size()) }
}

/// `p + H + size(p)`: one past the last payload byte of the block at `p`.
///
/// # Safety
///
/// `p` must point at a valid block header.
pub unsafe fn end_of(p: *mut u8) -> *mut u8 {
  unsafe { p.add(config::header_size()).add(read_size(p)) }
}

/// Whether `p1`'s end coincides with `p2`'s start, i.e. the two blocks are
/// address-adjacent and could be coalesced into one.
///
/// # Safety
///
/// Both `p1` and `p2` must point at valid block headers.
pub unsafe fn adjacent(p1: *mut u8, p2: *mut u8) -> bool {
  unsafe { end_of(p1) == p2 }
}

/// The number of header bytes, re-exported for callers that need it without
/// importing [`config`] directly.
pub fn header_bytes() -> usize {
  mem::size_of::<usize>()
}
