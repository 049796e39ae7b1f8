use std::{
  alloc::{self, Layout},
  ptr::NonNull,
};

use crate::{align::MALLOC_ALIGN, align_to};

/// A fixed-size arena block: `SIZE` bytes of owned storage and a bump cursor.
///
/// The block exclusively owns its buffer and releases it on drop.
pub struct Block<const SIZE: usize> {
  data: NonNull<u8>,
  offset: usize,
}

impl<const SIZE: usize> Block<SIZE> {
  /// Storage layout of every block, aligned like a `malloc` result.
  pub const LAYOUT: Layout = match Layout::from_size_align(SIZE, MALLOC_ALIGN) {
    Ok(layout) => layout,
    Err(_) => panic!("arena block size overflows a Layout"),
  };

  /// Reserves a fresh block, or `None` if the system heap is exhausted.
  pub fn new() -> Option<Self> {
    const { assert!(SIZE > 0, "arena blocks must have a non-zero size") };

    let data = NonNull::new(unsafe { alloc::alloc(Self::LAYOUT) })?;

    Some(Self { data, offset: 0 })
  }

  pub fn start(&self) -> *mut u8 {
    self.data.as_ptr()
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Whether `ptr` lies within `[start, start + SIZE)`.
  pub fn contains(
    &self,
    ptr: *const u8,
  ) -> bool {
    let start = self.start() as usize;
    let addr = ptr as usize;

    addr >= start && addr < start + SIZE
  }

  /// Offset at which a request of `size` bytes aligned to `align` would
  /// start, if it fits in the remaining space.
  ///
  /// A block whose cursor already sits at `SIZE` never fits, not even an
  /// empty request: the returned address must stay inside the buffer.
  pub fn fit(
    &self,
    size: usize,
    align: usize,
  ) -> Option<usize> {
    let base = self.start() as usize;
    let start = align_to!(base + self.offset, align) - base;

    if start < SIZE && size <= SIZE - start {
      Some(start)
    } else {
      None
    }
  }

  /// Carves `size` bytes at `start` (as returned by [`Block::fit`]).
  pub fn carve(
    &mut self,
    start: usize,
    size: usize,
  ) -> *mut u8 {
    debug_assert!(start >= self.offset && start + size <= SIZE);

    self.offset = start + size;

    unsafe { self.data.as_ptr().add(start) }
  }

  pub fn reset(&mut self) {
    self.offset = 0;
  }
}

impl<const SIZE: usize> Drop for Block<SIZE> {
  fn drop(&mut self) {
    #[cfg(test)]
    release_counter::record();

    unsafe { alloc::dealloc(self.data.as_ptr(), Self::LAYOUT) }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fit_and_carve() {
    let mut block = Block::<64>::new().unwrap();

    assert_eq!(block.fit(40, 1), Some(0));
    let first = block.carve(0, 40);
    assert_eq!(first, block.start());

    assert_eq!(block.fit(24, 1), Some(40));
    assert_eq!(block.fit(25, 1), None);
  }

  #[test]
  fn test_fit_pads_to_alignment() {
    let mut block = Block::<64>::new().unwrap();

    block.carve(0, 3);

    assert_eq!(block.fit(8, 8), Some(8));
    assert_eq!(block.fit(8, 16), Some(16));
    assert_eq!(block.fit(57, 8), None);
  }

  #[test]
  fn test_full_block_rejects_empty_request() {
    let mut block = Block::<16>::new().unwrap();

    block.carve(0, 16);

    assert_eq!(block.fit(0, 1), None);
  }

  #[test]
  fn test_contains_is_half_open() {
    let block = Block::<32>::new().unwrap();
    let start = block.start();

    assert!(block.contains(start));
    assert!(block.contains(unsafe { start.add(31) }));
    assert!(!block.contains(unsafe { start.add(32) }));
  }

  #[test]
  fn test_drop_records_release() {
    release_counter::take();

    drop(Block::<8>::new().unwrap());

    assert_eq!(release_counter::take(), 1);
  }
}
