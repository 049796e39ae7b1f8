//! Formatting into allocator-owned memory.
//!
//! The usual pattern is a short-lived arena per formatting call: text is
//! built inside a [`LinearAllocator`] of [`SCRATCH_SIZE`] bytes and only the
//! finished result is copied out.

use std::{
  fmt::{self, Write},
  ops::Deref,
  ptr::NonNull,
  slice, str,
};

use crate::{AllocError, Allocator, LinearAllocator, kilobytes};

/// Block size of the arena used by [`format_scratch`].
pub const SCRATCH_SIZE: usize = kilobytes!(4);

/// A string living in memory obtained from an [`Allocator`].
///
/// Hands the memory back to its allocator on drop.
pub struct AllocStr<'a, A: Allocator + ?Sized> {
  allocator: &'a mut A,
  ptr: NonNull<u8>,
  len: usize,
}

impl<A: Allocator + ?Sized> Deref for AllocStr<'_, A> {
  type Target = str;

  fn deref(&self) -> &str {
    // Only ever filled from `fmt::Write::write_str`, so always UTF-8.
    unsafe { str::from_utf8_unchecked(slice::from_raw_parts(self.ptr.as_ptr(), self.len)) }
  }
}

impl<A: Allocator + ?Sized> fmt::Display for AllocStr<'_, A> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self)
  }
}

impl<A: Allocator + ?Sized> fmt::Debug for AllocStr<'_, A> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    fmt::Debug::fmt(&**self, f)
  }
}

impl<A: Allocator + ?Sized> Drop for AllocStr<'_, A> {
  fn drop(&mut self) {
    unsafe { self.allocator.free(self.ptr.as_ptr()) }
  }
}

/// Measures formatted output without storing it.
struct Counter(usize);

impl Write for Counter {
  fn write_str(
    &mut self,
    s: &str,
  ) -> fmt::Result {
    self.0 += s.len();
    Ok(())
  }
}

/// Copies formatted output into a fixed raw buffer.
struct Filler {
  dst: *mut u8,
  len: usize,
  cap: usize,
}

impl Write for Filler {
  fn write_str(
    &mut self,
    s: &str,
  ) -> fmt::Result {
    if s.len() > self.cap - self.len {
      return Err(fmt::Error);
    }

    unsafe { self.dst.add(self.len).copy_from_nonoverlapping(s.as_ptr(), s.len()) };
    self.len += s.len();

    Ok(())
  }
}

/// Formats `args` into memory carved from `allocator`.
///
/// Output is measured first so exactly one block of the right size is
/// requested.
pub fn format_in<'a, A: Allocator + ?Sized>(
  allocator: &'a mut A,
  args: fmt::Arguments<'_>,
) -> Result<AllocStr<'a, A>, AllocError> {
  let mut counter = Counter(0);
  counter.write_fmt(args).map_err(|_| AllocError::Format)?;

  let cap = counter.0;
  let ptr = NonNull::new(allocator.alloc(cap)).ok_or(AllocError::OutOfMemory { size: cap, align: 1 })?;

  let mut filler = Filler {
    dst: ptr.as_ptr(),
    len: 0,
    cap,
  };
  let written = filler.write_fmt(args);

  // Built before checking so a failed write still returns the memory.
  let text = AllocStr {
    allocator,
    ptr,
    len: filler.len,
  };

  written.map_err(|_| AllocError::Format)?;

  Ok(text)
}

/// Formats `args` inside a throwaway [`SCRATCH_SIZE`] arena and returns an
/// owned copy.
pub fn format_scratch(args: fmt::Arguments<'_>) -> Result<String, AllocError> {
  let mut arena = LinearAllocator::<SCRATCH_SIZE>::try_new()?;
  let text = format_in(&mut arena, args)?;

  Ok(String::from(&*text))
}

/// `format!` through a scratch arena.
///
/// ```rust
/// use chainalloc::scratch_format;
///
/// let text = scratch_format!("{} + {} = {}", 2, 2, 4).unwrap();
/// assert_eq!(text, "2 + 2 = 4");
/// ```
#[macro_export]
macro_rules! scratch_format {
  ($($arg:tt)*) => {
    $crate::scratch::format_scratch(::core::format_args!($($arg)*))
  };
}
