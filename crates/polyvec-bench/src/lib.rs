//! Benchmark fixtures for the polyvec container.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use polyvec::PolyVec;

/// Build a container of `n` sequential u64 elements by repeated push.
pub fn filled(n: u64) -> PolyVec<u64> {
    let mut vec = PolyVec::new();
    for i in 0..n {
        vec.push(i);
    }
    vec
}

/// Build a container of `n` elements where every `stride`-th is zero,
/// the erase_value workload shape.
pub fn with_zero_stride(n: u64, stride: u64) -> PolyVec<u64> {
    let mut vec = PolyVec::new();
    for i in 0..n {
        vec.push(if i % stride == 0 { 0 } else { i });
    }
    vec
}
