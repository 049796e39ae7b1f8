//! Arena vs aligned vs system heap allocation benchmarks

use std::alloc::{self, Layout};

use chainalloc::{AlignedAllocator, Allocator, LinearAllocator, kilobytes, scratch_format};

use criterion::{Criterion, black_box, criterion_group, criterion_main};

const REQUESTS: usize = 256;
const REQUEST_SIZE: usize = 48;

fn arena_phase(c: &mut Criterion) {
  let mut arena = LinearAllocator::<{ kilobytes!(4) }>::new();

  c.bench_function("linear: 256 x 48B then reset", |b| {
    b.iter(|| {
      for _ in 0..REQUESTS {
        black_box(arena.alloc(black_box(REQUEST_SIZE)));
      }
      arena.reset();
    })
  });
}

fn aligned_pairs(c: &mut Criterion) {
  let mut aligned = AlignedAllocator::<64>::new();

  c.bench_function("aligned<64>: 256 x 48B alloc/free", |b| {
    b.iter(|| {
      for _ in 0..REQUESTS {
        let ptr = aligned.alloc(black_box(REQUEST_SIZE));
        unsafe { aligned.free(black_box(ptr)) };
      }
    })
  });
}

fn system_pairs(c: &mut Criterion) {
  let layout = Layout::from_size_align(REQUEST_SIZE, 8).unwrap();

  c.bench_function("system: 256 x 48B alloc/dealloc", |b| {
    b.iter(|| {
      for _ in 0..REQUESTS {
        unsafe {
          let ptr = alloc::alloc(black_box(layout));
          alloc::dealloc(black_box(ptr), layout);
        }
      }
    })
  });
}

fn scratch_formatting(c: &mut Criterion) {
  c.bench_function("scratch_format: short line", |b| {
    b.iter(|| scratch_format!("{}:{}:{:?}", black_box("key"), black_box(42), black_box([1, 2, 3])))
  });
}

criterion_group!(benches, arena_phase, aligned_pairs, system_pairs, scratch_formatting);
criterion_main!(benches);
