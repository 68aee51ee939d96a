//! Black-box tests against the public API: the quantified invariants,
//! round-trip laws, and boundary behaviors of the free-list allocator,
//! plus a handful of worked concrete scenarios.
//!
//! These tests share the real process program break (there is only one per
//! process), so every test takes `TEST_LOCK` before touching an allocator.
//! Without it, two tests racing `sbrk` from different threads could
//! interleave and break each other's "break advanced by exactly N bytes"
//! assertions.

use std::mem;
use std::sync::Mutex;

use rallocator::{brk, codec, FreeListAllocator};

static TEST_LOCK: Mutex<()> = Mutex::new(());

fn word_size() -> usize {
  mem::size_of::<usize>()
}

/// Walks the free list starting at `head`, returning `(address, size)` pairs
/// in list order, and asserting link symmetry, address ordering, and the
/// minimum payload capacity as it goes.
fn walk_free_list(head: *mut u8) -> Vec<(*mut u8, usize)> {
  let h = word_size();
  let mut blocks = Vec::new();
  let mut prev: *mut u8 = std::ptr::null_mut();
  let mut curr = head;

  while !curr.is_null() {
    unsafe {
      assert_eq!(codec::get_prev_link(curr), prev, "prev link mismatch");
      let size = codec::read_size(curr);
      assert!(size >= 2 * h, "free block smaller than 2P");
      blocks.push((curr, size));
      prev = curr;
      curr = codec::get_next_link(curr);
    }
  }

  for w in blocks.windows(2) {
    let (a_addr, a_size) = w[0];
    let (b_addr, _) = w[1];
    unsafe {
      assert!(
        a_addr.add(h).add(a_size) <= b_addr,
        "free list not address-ordered / overlapping"
      );
    }
  }

  blocks
}

#[test]
fn zero_size_allocation_is_usable_and_freeable() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();
  unsafe {
    let p = allocator.allocate(0);
    assert!(!p.is_null());
    p.write(7);
    assert_eq!(p.read(), 7);
    allocator.free(p);
  }
}

#[test]
fn free_null_is_a_no_op() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();
  unsafe { allocator.free(std::ptr::null_mut()) };
  assert!(allocator.free_list_head().is_null());
}

#[test]
fn round_trip_single_allocation_leaves_one_covering_free_block() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let p = allocator.allocate(96);
    assert!(!p.is_null());
    std::ptr::write_bytes(p, 0x42, 96);
    allocator.free(p);
  }

  let blocks = walk_free_list(allocator.free_list_head());
  assert_eq!(blocks.len(), 1, "freeing the only live block must yield one free block");
}

#[test]
fn exact_fit_request_forces_growth_instead_of_reuse() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();
  let h = word_size();

  unsafe {
    let first = allocator.allocate(64);
    assert!(!first.is_null());

    let head = allocator.free_list_head();
    let remaining = codec::read_size(head);

    // n + H == block.size exactly: must not be satisfied by this block.
    let exact = allocator.allocate(remaining);
    assert!(!exact.is_null());
    assert_ne!(
      exact,
      codec::payload_of(head),
      "a block with size == n + H must not be split for n"
    );
    let _ = h;
  }
}

#[test]
fn middle_free_coalesces_both_neighbors_without_corruption() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let a = allocator.allocate(40);
    let b = allocator.allocate(40);
    let c = allocator.allocate(40);

    allocator.free(a);
    allocator.free(c);
    allocator.free(b);
  }

  let blocks = walk_free_list(allocator.free_list_head());
  assert_eq!(blocks.len(), 1, "three adjacent live blocks, all freed, must coalesce into one");
}

#[test]
fn large_tail_free_reclaims_to_the_kernel() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let before = brk::current_break();
    let big = allocator.allocate(300 * 1024);
    assert!(!big.is_null());
    allocator.free(big);

    assert!(allocator.free_list_head().is_null(), "reclaimed tail must leave an empty free list");
    assert!(brk::current_break() <= before.add(word_size()), "break should have shrunk back down");
  }
}

#[test]
fn writes_stay_within_their_own_block() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let a = allocator.allocate(50);
    let b = allocator.allocate(50);
    std::ptr::write_bytes(a, 0xAA, 50);
    std::ptr::write_bytes(b, 0xBB, 50);

    for i in 0..50 {
      assert_eq!(a.add(i).read(), 0xAA);
      assert_eq!(b.add(i).read(), 0xBB);
    }

    allocator.free(a);
    allocator.free(b);
  }
}

/// The first allocation sizes the heap to `2n + H` and leaves a single
/// remainder free block.
#[cfg(target_pointer_width = "64")]
#[test]
fn first_allocation_sizes_heap_to_2n_plus_h() {
  let _guard = TEST_LOCK.lock().unwrap();
  let h = word_size();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let before = brk::current_break();
    let p = allocator.allocate(64);
    assert!(!p.is_null());

    assert_eq!(brk::current_break(), before.add(2 * 64 + h));
    assert_eq!(p, before.add(h));

    let head = allocator.free_list_head();
    assert_eq!(head, before.add(h + 64));
    assert_eq!(codec::read_size(head), 2 * 64 - 64 - h);
  }
}

/// Requesting exactly the remaining free block's size does not fit (strict
/// inequality), so the allocator grows instead.
#[cfg(target_pointer_width = "64")]
#[test]
fn exact_fit_refuses_and_grows() {
  let _guard = TEST_LOCK.lock().unwrap();
  let h = word_size();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    allocator.allocate(64);
    let head = allocator.free_list_head();
    let remaining = codec::read_size(head);

    let before = brk::current_break();
    let p = allocator.allocate(remaining);
    assert!(!p.is_null());

    let grow_by = 2 * remaining + h;
    assert_eq!(brk::current_break(), before.add(grow_by));
  }
}

/// Freeing the only live block coalesces it back with the trailing
/// remainder into a single block covering the whole heap.
#[cfg(target_pointer_width = "64")]
#[test]
fn immediate_free_coalesces_back() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let before = brk::current_break();
    let p = allocator.allocate(64);
    allocator.free(p);

    let blocks = walk_free_list(allocator.free_list_head());
    assert_eq!(blocks.len(), 1);
    assert_eq!(brk::current_break(), before.add(2 * 64 + word_size()));
  }
}

/// A single tail free block at or above `MAX_FREE_BLOCK` is reclaimed,
/// shrinking the break and emptying the free list.
#[cfg(target_pointer_width = "64")]
#[test]
fn reclamation_fires_above_threshold() {
  let _guard = TEST_LOCK.lock().unwrap();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let before = brk::current_break();
    let p = allocator.allocate(300 * 1024);
    allocator.free(p);

    assert!(allocator.free_list_head().is_null());
    assert!(brk::current_break() <= before.add(word_size()));
  }
}

/// A zero-size allocation from a fresh allocator still grows the heap by
/// the doubling formula and can be freed cleanly. `n` is substituted to 1,
/// and since `1 <= H` the first block the init grow produces (size `2*n`)
/// never satisfies the fit check `size > n + H`, so the allocator grows a
/// second time before it can split off a block.
#[cfg(target_pointer_width = "64")]
#[test]
fn zero_size_allocation_from_fresh_state() {
  let _guard = TEST_LOCK.lock().unwrap();
  let h = word_size();
  let mut allocator = FreeListAllocator::new();

  unsafe {
    let before = brk::current_break();
    let p = allocator.allocate(0);
    assert!(!p.is_null());
    assert_eq!(brk::current_break(), before.add(2 * (2 * 1 + h)));
    allocator.free(p);
  }
}
