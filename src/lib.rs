//! # chainalloc - Pluggable Low-Level Allocators
//!
//! This crate provides a single allocation capability, [`Allocator`], and two
//! strategies behind it: a chained **bump allocator** ([`LinearAllocator`])
//! and an adapter over the platform's **aligned heap** ([`AlignedAllocator`]).
//!
//! ## Overview
//!
//! ```text
//!   Callers only see the capability:
//!
//!                    ┌──────────────────────────────┐
//!                    │          Allocator           │
//!                    │  alloc(n) -> ptr | null      │
//!                    │  free(ptr)                   │
//!                    └──────────────┬───────────────┘
//!                                   │
//!                 ┌─────────────────┴─────────────────┐
//!                 ▼                                   ▼
//!   ┌───────────────────────────┐       ┌───────────────────────────┐
//!   │  LinearAllocator<SIZE>    │       │  AlignedAllocator<ALIGN>  │
//!   │  bump blocks, chained,    │       │  posix_memalign / free    │
//!   │  heap fallback >= SIZE    │       │  _aligned_malloc / _free  │
//!   └───────────────────────────┘       └───────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   chainalloc
//!   ├── align      - Alignment macros (align!, align_to!, is_aligned!)
//!   ├── units      - Byte-count macros (kilobytes!, megabytes!, ...)
//!   ├── allocator  - The Allocator capability
//!   ├── block      - Fixed-size arena block (internal)
//!   ├── linear     - LinearAllocator implementation
//!   ├── aligned    - AlignedAllocator implementation
//!   ├── strategy   - Closed enum over both strategies
//!   ├── typed      - Typed values and arrays on any allocator
//!   ├── scratch    - Formatting into a scratch arena
//!   └── error      - AllocError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chainalloc::{Allocator, LinearAllocator, kilobytes};
//!
//! let mut arena = LinearAllocator::<{ kilobytes!(4) }>::new();
//!
//! let ptr = arena.alloc(128);
//! assert!(!ptr.is_null());
//!
//! // Frees inside the arena are no-ops; reset reclaims everything at once.
//! unsafe { arena.free(ptr) };
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//! ```
//!
//! ## How The Arena Grows
//!
//! ```text
//!   LinearAllocator<64>, alloc(40) then alloc(40):
//!
//!   blocks[0]  ┌────────────────────────┬──────────┐
//!              │        40 bytes        │ 24 free  │   offset = 40
//!              └────────────────────────┴──────────┘
//!                 40 > 24: chain a new block
//!   blocks[1]  ┌────────────────────────┬──────────┐
//!              │        40 bytes        │ 24 free  │   offset = 40
//!              └────────────────────────┴──────────┘
//!
//!   alloc(100): 100 >= 64, never fits a block.
//!               Served by malloc, released by free().
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: No synchronization primitives
//! - **No per-object release**: Arena memory comes back only through
//!   `reset` or drop
//! - **Unix and Windows only**: The aligned strategy needs `libc`'s
//!   platform primitives
//!
//! ## Safety
//!
//! The capability hands out raw memory. Releasing a pointer through the
//! wrong allocator, or twice, is undefined behaviour, which is why
//! [`Allocator::free`] is `unsafe`.

pub mod align;
pub mod units;

mod aligned;
mod allocator;
mod block;
mod error;
mod linear;
pub mod scratch;
mod strategy;
pub mod typed;

pub use aligned::AlignedAllocator;
pub use allocator::Allocator;
pub use error::AllocError;
pub use linear::LinearAllocator;
pub use scratch::{AllocStr, SCRATCH_SIZE, format_in, format_scratch};
pub use strategy::Strategy;
pub use typed::{alloc_array, alloc_value, free_array, free_value};
