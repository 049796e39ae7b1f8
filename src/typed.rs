//! Typed construction on top of the raw byte capability.
//!
//! Each helper takes an optional allocator; with `None` the value lives on
//! the global heap instead.

use std::{
  alloc::{self, Layout},
  ptr::{self, NonNull},
};

use crate::{AllocError, Allocator};

fn raw_alloc(
  allocator: Option<&mut dyn Allocator>,
  layout: Layout,
) -> Result<NonNull<u8>, AllocError> {
  if layout.size() == 0 {
    return Ok(unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) });
  }

  let ptr = match allocator {
    Some(allocator) => allocator.alloc_layout(layout),
    None => unsafe { alloc::alloc(layout) },
  };

  NonNull::new(ptr).ok_or_else(|| AllocError::out_of_memory(layout))
}

unsafe fn raw_free(
  allocator: Option<&mut dyn Allocator>,
  ptr: NonNull<u8>,
  layout: Layout,
) {
  if layout.size() == 0 {
    return;
  }

  unsafe {
    match allocator {
      Some(allocator) => allocator.free(ptr.as_ptr()),
      None => alloc::dealloc(ptr.as_ptr(), layout),
    }
  }
}

/// Moves `value` into memory obtained from `allocator`.
pub fn alloc_value<T>(
  allocator: Option<&mut dyn Allocator>,
  value: T,
) -> Result<NonNull<T>, AllocError> {
  let ptr = raw_alloc(allocator, Layout::new::<T>())?.cast::<T>();

  unsafe { ptr.as_ptr().write(value) };

  Ok(ptr)
}

/// Allocates `count` default-initialised values of `T`.
pub fn alloc_array<T: Default>(
  allocator: Option<&mut dyn Allocator>,
  count: usize,
) -> Result<NonNull<[T]>, AllocError> {
  let layout = Layout::array::<T>(count)?;
  let first = raw_alloc(allocator, layout)?.cast::<T>();

  for i in 0..count {
    unsafe { first.as_ptr().add(i).write(T::default()) };
  }

  Ok(NonNull::slice_from_raw_parts(first, count))
}

/// Drops the value at `ptr` and releases its memory.
///
/// # Safety
///
/// `ptr` must come from [`alloc_value`] with the same allocator (or `None`)
/// and must not be used afterwards.
pub unsafe fn free_value<T>(
  allocator: Option<&mut dyn Allocator>,
  ptr: NonNull<T>,
) {
  unsafe {
    ptr::drop_in_place(ptr.as_ptr());
    raw_free(allocator, ptr.cast(), Layout::new::<T>());
  }
}

/// Drops every element of `ptr` and releases the array's memory.
///
/// # Safety
///
/// `ptr` must come from [`alloc_array`] with the same allocator (or `None`)
/// and must not be used afterwards.
pub unsafe fn free_array<T>(
  allocator: Option<&mut dyn Allocator>,
  ptr: NonNull<[T]>,
) {
  unsafe {
    let layout = Layout::array::<T>(ptr.len()).unwrap_unchecked();

    ptr::drop_in_place(ptr.as_ptr());
    raw_free(allocator, ptr.cast(), layout);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;
  use crate::{AlignedAllocator, LinearAllocator};

  struct DropCounter(Rc<Cell<usize>>);

  impl Drop for DropCounter {
    fn drop(&mut self) {
      self.0.set(self.0.get() + 1);
    }
  }

  #[test]
  fn test_value_in_arena() {
    let mut arena = LinearAllocator::<256>::new();

    let ptr = alloc_value(Some(&mut arena), 0x1122_3344_5566_7788u64).unwrap();

    assert!(arena.contains(ptr.as_ptr() as *const u8));
    assert_eq!(ptr.as_ptr() as usize % 8, 0);
    assert_eq!(unsafe { *ptr.as_ptr() }, 0x1122_3344_5566_7788);

    unsafe { free_value(Some(&mut arena), ptr) };
  }

  #[test]
  fn test_value_on_global_heap() {
    let drops = Rc::new(Cell::new(0));

    let ptr = alloc_value(None, DropCounter(drops.clone())).unwrap();
    unsafe { free_value(None, ptr) };

    assert_eq!(drops.get(), 1);
  }

  #[test]
  fn test_array_defaults_and_drops() {
    let mut aligned = AlignedAllocator::<64>::new();

    let array = alloc_array::<u32>(Some(&mut aligned), 16).unwrap();
    let slice = unsafe { &mut *array.as_ptr() };

    assert_eq!(slice.len(), 16);
    assert!(slice.iter().all(|&v| v == 0));
    assert_eq!(array.as_ptr() as *mut u8 as usize % 64, 0);

    slice[3] = 7;
    assert_eq!(slice[3], 7);

    unsafe { free_array(Some(&mut aligned), array) };
  }

  #[test]
  fn test_array_drops_each_element() {
    #[derive(Default)]
    struct Tracked(Option<Rc<Cell<usize>>>);

    impl Drop for Tracked {
      fn drop(&mut self) {
        if let Some(count) = &self.0 {
          count.set(count.get() + 1);
        }
      }
    }

    let drops = Rc::new(Cell::new(0));
    let mut arena = LinearAllocator::<1024>::new();

    let array = alloc_array::<Tracked>(Some(&mut arena), 4).unwrap();
    for slot in unsafe { &mut *array.as_ptr() } {
      *slot = Tracked(Some(drops.clone()));
    }

    unsafe { free_array(Some(&mut arena), array) };

    assert_eq!(drops.get(), 4);
  }

  #[test]
  fn test_zero_sized_skips_allocator() {
    let mut arena = LinearAllocator::<64>::new();

    let unit = alloc_value(Some(&mut arena), ()).unwrap();
    let empty = alloc_array::<u64>(Some(&mut arena), 0).unwrap();

    assert_eq!(arena.used(), 0);
    assert_eq!(empty.len(), 0);

    unsafe {
      free_value(Some(&mut arena), unit);
      free_array(Some(&mut arena), empty);
    }
  }

  #[test]
  fn test_overaligned_request_reports_out_of_memory() {
    #[repr(align(128))]
    struct Wide([u8; 128]);

    let mut aligned = AlignedAllocator::<16>::new();

    let result = alloc_value(Some(&mut aligned), Wide([0; 128]));

    assert_eq!(
      result.err(),
      Some(AllocError::OutOfMemory {
        size: 128,
        align: 128
      })
    );
  }

  #[test]
  fn test_array_layout_overflow() {
    let result = alloc_array::<u64>(None, usize::MAX);

    assert!(matches!(result, Err(AllocError::Layout(_))));
  }
}
