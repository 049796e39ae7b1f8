use std::alloc::LayoutError;

use thiserror::Error;

/// Errors surfaced by the typed and formatting helpers.
///
/// The raw [`Allocator`](crate::Allocator) capability signals failure with a
/// null pointer; helpers that hand out typed memory convert that into one of
/// these variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocError {
  #[error("out of memory: could not allocate {size} bytes aligned to {align}")]
  OutOfMemory { size: usize, align: usize },

  #[error("invalid layout: {0}")]
  Layout(#[from] LayoutError),

  #[error("formatting into arena memory failed")]
  Format,
}

impl AllocError {
  pub(crate) fn out_of_memory(layout: std::alloc::Layout) -> Self {
    AllocError::OutOfMemory {
      size: layout.size(),
      align: layout.align(),
    }
  }
}
