use std::alloc::Layout;

use crate::{AlignedAllocator, Allocator, LinearAllocator};

/// The closed set of allocation strategies, picked at construction.
///
/// Lets a component own "some allocator" by value without boxing a trait
/// object, while callers still only see [`Allocator`].
pub enum Strategy<const SIZE: usize, const ALIGN: usize> {
  Linear(LinearAllocator<SIZE>),
  Aligned(AlignedAllocator<ALIGN>),
}

impl<const SIZE: usize, const ALIGN: usize> Strategy<SIZE, ALIGN> {
  pub fn linear() -> Self {
    Strategy::Linear(LinearAllocator::new())
  }

  pub const fn aligned() -> Self {
    Strategy::Aligned(AlignedAllocator::new())
  }
}

impl<const SIZE: usize, const ALIGN: usize> Allocator for Strategy<SIZE, ALIGN> {
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8 {
    match self {
      Strategy::Linear(linear) => linear.alloc(num_bytes),
      Strategy::Aligned(aligned) => aligned.alloc(num_bytes),
    }
  }

  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    unsafe {
      match self {
        Strategy::Linear(linear) => linear.free(ptr),
        Strategy::Aligned(aligned) => aligned.free(ptr),
      }
    }
  }

  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    match self {
      Strategy::Linear(linear) => linear.alloc_layout(layout),
      Strategy::Aligned(aligned) => aligned.alloc_layout(layout),
    }
  }
}
