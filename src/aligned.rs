use std::{alloc::Layout, ptr};

use tracing::warn;

use crate::{Allocator, is_aligned};

/// Stateless adapter over the platform's aligned heap primitives.
///
/// Every non-null pointer it returns is a multiple of `ALIGN`, which must be
/// a power of two. A bad alignment is rejected when the allocator is
/// constructed, at compile time:
///
/// ```rust,compile_fail
/// use chainalloc::AlignedAllocator;
///
/// let allocator = AlignedAllocator::<24>::new();
/// ```
///
/// The allocator owns nothing; each returned block belongs to the caller
/// until it is handed back through [`Allocator::free`] on an
/// `AlignedAllocator` of the same `ALIGN`. Instances are meant to be built
/// once and passed around by reference, and since [`AlignedAllocator::new`]
/// is `const` one can live in a `static`:
///
/// ```rust
/// use chainalloc::{AlignedAllocator, Allocator};
///
/// static SIMD: AlignedAllocator<32> = AlignedAllocator::new();
///
/// let mut handle = &SIMD;
/// let ptr = handle.alloc(100);
///
/// assert_eq!(ptr as usize % 32, 0);
/// unsafe { handle.free(ptr) };
/// ```
#[derive(Debug)]
pub struct AlignedAllocator<const ALIGN: usize> {
  _private: (),
}

impl<const ALIGN: usize> AlignedAllocator<ALIGN> {
  pub const ALIGNMENT: usize = ALIGN;

  /// `posix_memalign` requires at least pointer alignment. Rounding a power
  /// of two up to another power of two keeps it a multiple of `ALIGN`.
  const PLATFORM_ALIGN: usize = if ALIGN < std::mem::size_of::<usize>() {
    std::mem::size_of::<usize>()
  } else {
    ALIGN
  };

  pub const fn new() -> Self {
    const { assert!(ALIGN.is_power_of_two(), "alignment must be a power of two") };

    Self { _private: () }
  }

  fn platform_alloc(num_bytes: usize) -> *mut u8 {
    let size = num_bytes.max(1);
    let ptr = unsafe { platform::aligned_alloc(size, Self::PLATFORM_ALIGN) };

    if ptr.is_null() {
      warn!(size, align = ALIGN, "platform aligned allocation failed");
    }
    debug_assert!(is_aligned!(ptr as usize, ALIGN));

    ptr
  }

  fn platform_layout_alloc(layout: Layout) -> *mut u8 {
    if layout.align() > ALIGN {
      return ptr::null_mut();
    }

    Self::platform_alloc(layout.size())
  }
}

impl<const ALIGN: usize> Default for AlignedAllocator<ALIGN> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const ALIGN: usize> Allocator for AlignedAllocator<ALIGN> {
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8 {
    Self::platform_alloc(num_bytes)
  }

  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    unsafe { platform::aligned_free(ptr) }
  }

  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    Self::platform_layout_alloc(layout)
  }
}

/// The allocator holds no state, so a shared reference allocates as well as
/// an exclusive one.
impl<const ALIGN: usize> Allocator for &AlignedAllocator<ALIGN> {
  fn alloc(
    &mut self,
    num_bytes: usize,
  ) -> *mut u8 {
    AlignedAllocator::<ALIGN>::platform_alloc(num_bytes)
  }

  unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    unsafe { platform::aligned_free(ptr) }
  }

  fn alloc_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    AlignedAllocator::<ALIGN>::platform_layout_alloc(layout)
  }
}

#[cfg(unix)]
mod platform {
  use std::ptr;

  use libc::c_void;

  pub unsafe fn aligned_alloc(
    size: usize,
    align: usize,
  ) -> *mut u8 {
    let mut out: *mut c_void = ptr::null_mut();

    match unsafe { libc::posix_memalign(&mut out, align, size) } {
      0 => out as *mut u8,
      _ => ptr::null_mut(),
    }
  }

  pub unsafe fn aligned_free(ptr: *mut u8) {
    unsafe { libc::free(ptr as *mut c_void) }
  }
}

#[cfg(windows)]
mod platform {
  use libc::c_void;

  pub unsafe fn aligned_alloc(
    size: usize,
    align: usize,
  ) -> *mut u8 {
    unsafe { libc::aligned_malloc(size, align) as *mut u8 }
  }

  pub unsafe fn aligned_free(ptr: *mut u8) {
    unsafe { libc::aligned_free(ptr as *mut c_void) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn check_alignment<const A: usize>() {
    let mut allocator = AlignedAllocator::<A>::new();

    for size in [0, 1, 7, 64, 1000, 4096] {
      let ptr = allocator.alloc(size);

      assert!(!ptr.is_null());
      assert_eq!(ptr as usize % A, 0, "size {size} at alignment {A}");

      unsafe {
        ptr::write_bytes(ptr, 0x5A, size);
        allocator.free(ptr);
      }
    }
  }

  #[test]
  fn test_alignments() {
    check_alignment::<1>();
    check_alignment::<2>();
    check_alignment::<8>();
    check_alignment::<16>();
    check_alignment::<32>();
    check_alignment::<64>();
    check_alignment::<4096>();
  }

  #[test]
  fn test_alloc_layout_respects_alignment_ceiling() {
    let mut allocator = AlignedAllocator::<16>::new();

    let ok = allocator.alloc_layout(Layout::from_size_align(24, 16).unwrap());
    let too_strict = allocator.alloc_layout(Layout::from_size_align(24, 32).unwrap());

    assert!(!ok.is_null());
    assert!(too_strict.is_null());

    unsafe { allocator.free(ok) };
  }

  #[test]
  fn test_free_null_is_noop() {
    let mut allocator = AlignedAllocator::<64>::new();

    unsafe { allocator.free(ptr::null_mut()) };
  }

  #[test]
  fn test_shared_handle_allocates() {
    let allocator = AlignedAllocator::<128>::new();
    let mut first = &allocator;
    let mut second = &allocator;

    let a = first.alloc(10);
    let b = second.alloc(10);

    assert_ne!(a, b);
    assert_eq!(a as usize % 128, 0);
    assert_eq!(b as usize % 128, 0);

    unsafe {
      second.free(a);
      first.free(b);
    }
  }

  #[test]
  fn test_alignment_constant() {
    assert_eq!(AlignedAllocator::<32>::ALIGNMENT, 32);
  }
}
