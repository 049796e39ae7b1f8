use std::{
  alloc::{self, Layout},
  ptr,
};

use tracing::{debug, trace, warn};

use crate::{Allocator, AllocError, align::MALLOC_ALIGN, block::Block};

/// A chained bump allocator over blocks of `SIZE` bytes.
///
/// ```text
///   LinearAllocator<64>:
///
///   blocks[0]  ┌──────────┬──────────┬─────────┐
///              │   A1     │   A3     │  free   │
///              └──────────┴──────────┴─────────┘
///   blocks[1]  ┌─────────────────────┬─────────┐
///              │         A2          │  free   │
///              └─────────────────────┴─────────┘
///
///   A2 did not fit blocks[0], so blocks[1] was chained.
///   A3 fit blocks[0] again: placement is first fit from the root.
/// ```
///
/// Requests of `SIZE` bytes or more bypass the blocks and are served by the
/// C heap; [`Allocator::free`] recognises them by address and hands them
/// back to the C heap. Every other `free` is a no-op: arena memory is only
/// reclaimed in bulk by [`LinearAllocator::reset`] or by dropping the
/// allocator.
///
/// # Examples
///
/// ```rust
/// use chainalloc::{Allocator, LinearAllocator};
///
/// let mut arena = LinearAllocator::<64>::new();
///
/// let a = arena.alloc(40);
/// let b = arena.alloc(40);
///
/// assert!(!a.is_null() && !b.is_null());
/// assert_eq!(arena.chain_len(), 2);
/// assert_eq!(arena.offsets().collect::<Vec<_>>(), [40, 40]);
/// ```
pub struct LinearAllocator<const SIZE: usize> {
  /// Root first. Never empty.
  blocks: Vec<Block<SIZE>>,
}

impl<const SIZE: usize> LinearAllocator<SIZE> {
  /// Creates an arena with its root block reserved.
  ///
  /// Aborts through [`alloc::handle_alloc_error`] if the root block cannot
  /// be reserved; use [`LinearAllocator::try_new`] to observe that instead.
  pub fn new() -> Self {
    match Self::try_new() {
      Ok(arena) => arena,
      Err(_) => alloc::handle_alloc_error(Block::<SIZE>::LAYOUT),
    }
  }

  pub fn try_new() -> Result<Self, AllocError> {
    let root = Block::<SIZE>::new().ok_or_else(|| AllocError::out_of_memory(Block::<SIZE>::LAYOUT))?;

    Ok(Self { blocks: vec![root] })
  }

  /// Bytes per block.
  pub const fn capacity(&self) -> usize {
    SIZE
  }

  /// Number of blocks in the chain, root included.
  pub fn chain_len(&self) -> usize {
    self.blocks.len()
  }

  /// Cursor of every block, root first.
  pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
    self.blocks.iter().map(Block::offset)
  }

  /// Bytes consumed across the chain, alignment padding included.
  pub fn used(&self) -> usize {
    self.offsets().sum()
  }

  /// Whether `ptr` lies inside one of the chain's blocks.
  pub fn contains(
    &self,
    ptr: *const u8,
  ) -> bool {
    self.blocks.iter().any(|block| block.contains(ptr))
  }

  /// Rewinds every block's cursor to zero, keeping all blocks reserved.
  ///
  /// Everything handed out before the reset must no longer be used.
  pub fn reset(&mut self) {
    for block in &mut self.blocks {
      block.reset();
    }
  }

  fn alloc_aligned(
    &mut self,
    size: usize,
    align: usize,
  ) -> *mut u8 {
    // Worst-case padding at the start of a fresh block.
    let padding = align.saturating_sub(MALLOC_ALIGN);

    if size >= SIZE || size + padding >= SIZE {
      return Self::alloc_fallback(size, align);
    }

    for block in &mut self.blocks {
      if let Some(start) = block.fit(size, align) {
        return block.carve(start, size);
      }
    }

    let Some(mut block) = Block::<SIZE>::new() else {
      warn!(capacity = SIZE, "could not reserve a new arena block");
      return ptr::null_mut();
    };

    trace!(
      capacity = SIZE,
      chain_len = self.blocks.len() + 1,
      request = size,
      "arena exhausted, chaining a new block"
    );

    let result = match block.fit(size, align) {
      Some(start) => block.carve(start, size),
      None => ptr::null_mut(),
    };
    self.blocks.push(block);

    result
  }

  fn alloc_fallback(
    size: usize,
    align: usize,
  ) -> *mut u8 {
    if align > MALLOC_ALIGN {
      warn!(size, align, "heap fallback cannot honour the requested alignment");
      return ptr::null_mut();
    }

    debug!(size, capacity = SIZE, "request exceeds arena block, falling back to the heap");

    let ptr = unsafe { libc::malloc(size.max(1)) } as *mut u8;

    if ptr.is_null() {
      warn!(size, "heap fallback allocation failed");
    }

    ptr
  }
}

impl<const SIZE: usize> Default for LinearAllocator<SIZE> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const SIZE: usize> Allocator for LinearAllocator<SIZE> {
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8 {
    self.alloc_aligned(num_bytes, 1)
  }

  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    if ptr.is_null() || self.contains(ptr) {
      return;
    }

    // Not inside any block, so it came from the heap fallback.
    unsafe { libc::free(ptr as *mut libc::c_void) }
  }

  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    self.alloc_aligned(layout.size(), layout.align())
  }
}

impl<const SIZE: usize> Drop for LinearAllocator<SIZE> {
  fn drop(&mut self) {
    trace!(capacity = SIZE, chain_len = self.blocks.len(), "releasing arena chain");
  }
}
