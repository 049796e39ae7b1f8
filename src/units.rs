//! Byte-count helpers usable in const-generic position.
//!
//! ```rust
//! use chainalloc::{LinearAllocator, kilobytes};
//!
//! let arena = LinearAllocator::<{ kilobytes!(4) }>::new();
//! assert_eq!(arena.capacity(), 4096);
//! ```

/// `n` bytes.
#[macro_export]
macro_rules! bytes {
  ($n:expr) => {
    ($n) as usize
  };
}

/// `n` kibibytes, in bytes.
#[macro_export]
macro_rules! kilobytes {
  ($n:expr) => {
    ($n) as usize * 1024
  };
}

/// `n` mebibytes, in bytes.
#[macro_export]
macro_rules! megabytes {
  ($n:expr) => {
    ($n) as usize * 1024 * 1024
  };
}

/// `n` gibibytes, in bytes.
#[macro_export]
macro_rules! gigabytes {
  ($n:expr) => {
    ($n) as usize * 1024 * 1024 * 1024
  };
}

#[cfg(test)]
mod tests {
  #[test]
  fn test_units() {
    assert_eq!(bytes!(7), 7);
    assert_eq!(kilobytes!(4), 4096);
    assert_eq!(megabytes!(2), 2 * 1024 * 1024);
    assert_eq!(gigabytes!(1), 1 << 30);
  }

  #[test]
  fn test_units_take_expressions() {
    assert_eq!(kilobytes!(1 + 1), 2048);
  }
}
