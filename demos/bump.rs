use std::io::Read;

use libc::sbrk;
use rallocator::FreeListAllocator;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`, `htop`,
/// `gdb`, or just visually track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
/// The program break is the upper boundary of the heap managed via brk/sbrk.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn print_alloc(requested: usize, addr: *mut u8) {
  println!(
    "Allocated {} bytes, address = {:?}, program break = {:?}",
    requested,
    addr,
    unsafe { sbrk(0) }
  );
}

fn main() {
  // Our free-list allocator holds just the free-list head; it grows the
  // program break lazily on the first `allocate` call.
  let mut allocator = FreeListAllocator::new();

  unsafe {
    print_program_break("start");
    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 1) Allocate 4 bytes (roughly a u32's worth).
    // ------------------------------------------------------------------
    let first_block = allocator.allocate(4);
    println!("\n[1] Allocate 4 bytes");
    print_alloc(4, first_block);

    let first_ptr = first_block as *mut u32;
    first_ptr.write(0xDEADBEEF);
    println!("[1] Value written to first_block = 0x{:X}", first_ptr.read());

    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 2) Allocate 12 bytes, to show an "odd-sized" request.
    // ------------------------------------------------------------------
    let second_block = allocator.allocate(12);
    println!("\n[2] Allocate 12 bytes");
    print_alloc(12, second_block);
    std::ptr::write_bytes(second_block, 0xAB, 12);
    println!("[2] Initialized second block with 0xAB");

    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 3) Allocate 8 bytes (roughly a u64's worth).
    // ------------------------------------------------------------------
    let third_block = allocator.allocate(8);
    println!("\n[3] Allocate 8 bytes");
    print_alloc(8, third_block);

    let third_ptr = third_block as *mut u64;
    third_ptr.write(0x1122334455667788);
    println!("[3] Value written = 0x{:X}", third_ptr.read());
    println!(
      "[3] Address = {:#X}, word-aligned = {}",
      third_block as usize,
      (third_block as usize) % std::mem::size_of::<usize>() == 0
    );

    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 4) Allocate 32 bytes to force more list movement.
    // ------------------------------------------------------------------
    let fourth_block = allocator.allocate(32);
    println!("\n[4] Allocate 32 bytes");
    print_alloc(32, fourth_block);

    let fourth_ptr = fourth_block as *mut u16;
    for i in 0..16 {
      fourth_ptr.add(i).write(i as u16);
    }
    println!("[4] Wrote 0..15 into the u16 array");

    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 5) Free the first block. Unlike a pure bump allocator, this
    //    allocator's free list can reuse it for a later request.
    // ------------------------------------------------------------------
    allocator.free(first_block);
    println!("\n[5] Freed first_block at {:?}", first_block);
    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 6) Allocate a small block to see whether the freed block is reused.
    // ------------------------------------------------------------------
    let fifth_block = allocator.allocate(2);
    println!("\n[6] Allocate 2 bytes (check reuse of freed block)");
    print_alloc(2, fifth_block);
    println!(
      "[6] fifth_block == first_block? {}",
      if fifth_block == first_block {
        "Yes, it reused the freed block"
      } else {
        "No, it allocated somewhere else"
      }
    );

    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 7) Allocate a large block to observe heap growth.
    // ------------------------------------------------------------------
    print_program_break("before large alloc");

    let big_block = allocator.allocate(64 * 1024);
    println!("\n[7] Allocate large 64 KiB block");
    print_alloc(64 * 1024, big_block);

    print_program_break("after large alloc");
    block_until_enter_pressed();

    // ------------------------------------------------------------------
    // 8) Free the large block. Because it is at the tail and well below
    //    the 128 KiB reclamation threshold, it stays on the free list
    //    rather than being returned to the kernel.
    // ------------------------------------------------------------------
    allocator.free(big_block);
    println!("\n[8] Freed the large block (below reclamation threshold, stays on free list)");
    print_program_break("after freeing large block");

    println!("\n[9] End of demo. Process will exit and the OS will reclaim all memory.");
  }
}
