use std::{alloc::Layout, ptr};

use crate::is_aligned;

/// The allocation capability every strategy in this crate provides.
///
/// Callers depend only on this trait and never on the concrete strategy
/// behind it. Failure is reported through a null pointer, never a panic.
pub trait Allocator {
  /// Requests a block of at least `num_bytes` bytes.
  ///
  /// The returned memory is uninitialized. Returns null when the request
  /// cannot be satisfied.
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8;

  /// Releases a block previously returned by this same allocator.
  ///
  /// Freeing null is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or have come from `alloc`/`alloc_layout` on this
  /// instance, and must not have been freed already.
  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  );

  /// Requests a block satisfying both the size and alignment of `layout`.
  ///
  /// The default falls back to [`Allocator::alloc`] and gives the block back
  /// if it turns out misaligned.
  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    let ptr = self.alloc(layout.size());

    if ptr.is_null() || is_aligned!(ptr as usize, layout.align()) {
      return ptr;
    }

    unsafe { self.free(ptr) };
    ptr::null_mut()
  }
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8 {
    (**self).alloc(num_bytes)
  }

  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    unsafe { (**self).free(ptr) }
  }

  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    (**self).alloc_layout(layout)
  }
}
