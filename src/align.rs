/// Rounds `value` up to the machine word alignment.
///
/// # Examples
///
/// ```rust
/// use chainalloc::align;
///
/// match std::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align_to!($value, ::core::mem::size_of::<usize>())
  };
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two.
///
/// ```rust
/// use chainalloc::align_to;
///
/// assert_eq!(align_to!(0, 64), 0);
/// assert_eq!(align_to!(1, 64), 64);
/// assert_eq!(align_to!(65, 32), 96);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + ($alignment) - 1) & !(($alignment) - 1)
  };
}

/// Checks whether `value` is a multiple of the power of two `alignment`.
///
/// ```rust
/// use chainalloc::is_aligned;
///
/// assert!(is_aligned!(128, 32));
/// assert!(!is_aligned!(136, 32));
/// ```
#[macro_export]
macro_rules! is_aligned {
  ($value:expr, $alignment:expr) => {
    ($value & (($alignment) - 1)) == 0
  };
}

/// Alignment the C heap guarantees for every `malloc` result.
pub const MALLOC_ALIGN: usize = 2 * std::mem::size_of::<usize>();
