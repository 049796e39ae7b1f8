use std::{alloc::Layout, ptr};

use chainalloc::{AlignedAllocator, Allocator, LinearAllocator, alloc_value, free_value, scratch_format};
use tracing_subscriber::EnvFilter;

/// Prints the cursor of every block in the chain.
fn print_chain<const SIZE: usize>(
  label: &str,
  arena: &LinearAllocator<SIZE>,
) {
  println!(
    "[{}] chain_len = {}, offsets = {:?}, used = {} bytes",
    label,
    arena.chain_len(),
    arena.offsets().collect::<Vec<_>>(),
    arena.used(),
  );
}

fn print_alloc<const SIZE: usize>(
  size: usize,
  addr: *mut u8,
  arena: &LinearAllocator<SIZE>,
) {
  println!(
    "Allocated {} bytes, address = {:?}, inside arena = {}",
    size,
    addr,
    arena.contains(addr),
  );
}

fn main() {
  // Try RUST_LOG=chainalloc=trace to see chaining and heap fallback events.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // Small blocks so chaining shows up quickly.
  let mut arena = LinearAllocator::<64>::new();
  print_chain("start", &arena);

  // --------------------------------------------------------------------
  // 1) Two 40 byte requests. The second does not fit the 24 bytes left
  //    in the root block, so a second block is chained.
  // --------------------------------------------------------------------
  let first = arena.alloc(40);
  println!("\n[1] alloc(40)");
  print_alloc(40, first, &arena);

  let second = arena.alloc(40);
  println!("[1] alloc(40) again");
  print_alloc(40, second, &arena);
  print_chain("1", &arena);

  // --------------------------------------------------------------------
  // 2) A 20 byte request goes back to the root block: placement is
  //    first fit from the root.
  // --------------------------------------------------------------------
  let third = arena.alloc(20);
  println!("\n[2] alloc(20)");
  print_alloc(20, third, &arena);
  print_chain("2", &arena);

  // --------------------------------------------------------------------
  // 3) 100 bytes can never fit a 64 byte block, so it comes from the
  //    C heap and must be given back through free().
  // --------------------------------------------------------------------
  let big = arena.alloc(100);
  println!("\n[3] alloc(100)");
  print_alloc(100, big, &arena);

  unsafe {
    ptr::write_bytes(big, 0xAB, 100);
    arena.free(big);
  }
  println!("[3] Released heap fallback block at {:?}", big);

  // --------------------------------------------------------------------
  // 4) free() inside the arena is a no-op; reset() reclaims everything
  //    while keeping both blocks reserved.
  // --------------------------------------------------------------------
  unsafe { arena.free(first) };
  print_chain("4 after free", &arena);

  arena.reset();
  print_chain("4 after reset", &arena);

  let reused = arena.alloc(63);
  println!(
    "[4] alloc(63) after reset reused the root block? {}",
    if reused == first { "Yes" } else { "No" }
  );

  // --------------------------------------------------------------------
  // 5) Typed values land on an aligned address even after odd-sized
  //    requests.
  // --------------------------------------------------------------------
  arena.reset();
  arena.alloc(3);

  let value = match alloc_value(Some(&mut arena), 0x1122334455667788u64) {
    Ok(value) => value,
    Err(err) => {
      eprintln!("[5] allocation failed: {err}");
      return;
    }
  };
  println!(
    "\n[5] u64 at {:?}, addr % align = {}, value = {:#X}",
    value,
    value.as_ptr() as usize % Layout::new::<u64>().align(),
    unsafe { *value.as_ptr() },
  );
  unsafe { free_value(Some(&mut arena), value) };

  // --------------------------------------------------------------------
  // 6) The aligned strategy: every pointer is a multiple of 64.
  // --------------------------------------------------------------------
  let mut aligned = AlignedAllocator::<64>::new();

  for size in [1, 100, 4096] {
    let block = aligned.alloc(size);
    println!(
      "\n[6] aligned alloc({}) = {:?}, addr % 64 = {}",
      size,
      block,
      block as usize % 64
    );
    unsafe { aligned.free(block) };
  }

  // --------------------------------------------------------------------
  // 7) Formatting through a throwaway 4 KiB arena.
  // --------------------------------------------------------------------
  match scratch_format!("chain of {} blocks, {} bytes each", arena.chain_len(), arena.capacity()) {
    Ok(text) => println!("\n[7] {}", text),
    Err(err) => eprintln!("\n[7] formatting failed: {err}"),
  }

  println!("\n[8] End of example. Dropping the arena releases every block.");
}
