//! The type-compatibility constraint for in-slot polymorphism.
//!
//! A slot declared for `B` may be occupied by a value of another type `D`
//! only when `D` is a *layout-compatible variant* of `B`: same size, same
//! alignment, readable at type `B`, and safe to tear down through `B`.
//! [`VariantOf`] is the marker for that contract; the size and alignment
//! halves are additionally rejected at compile time by
//! [`PolyVec::push_variant`](crate::PolyVec::push_variant).

use std::mem;

/// Marker trait: `Self` may occupy a slot declared for `B`.
///
/// Every type is a variant of itself via the blanket impl. Implementing
/// this trait for a distinct `D` is the Rust rendition of "`D` is-a `B`
/// with identical layout", typically:
///
/// ```
/// use polyvec::VariantOf;
///
/// #[repr(C)]
/// struct Shape {
///     area_fn: fn(&Shape) -> f64,
///     side: f64,
/// }
///
/// #[repr(C)]
/// struct Square {
///     base: Shape,
/// }
///
/// // SAFETY: repr(C) with `Shape` as the first and only field — identical
/// // layout, readable as `Shape`, owns nothing beyond the prefix.
/// unsafe impl VariantOf<Shape> for Square {}
/// ```
///
/// # Safety
///
/// Implementors assert all of the following, which the container relies on
/// and cannot check:
///
/// 1. **Prefix layout**: `Self` is `#[repr(C)]` (or otherwise layout
///    guaranteed) with a `B` as its first field, so any `Self` value is
///    valid when read at type `B`. Combined with the size equality the
///    container checks, `Self` adds no fields beyond that prefix.
/// 2. **Teardown through `B`**: dropping an occupant via
///    `ptr::drop_in_place::<B>` releases everything the `Self` value owns.
///    The two safe shapes: `B`'s `Drop` dispatches dynamically (e.g.
///    through a function pointer stored in `B` at construction), or `Self`
///    owns no resources beyond its `B` prefix and does not implement
///    `Drop`. A `Self` with its own `Drop` impl is torn down as `B` and
///    that impl never runs.
///
/// Size and alignment equality are *not* part of the obligation here: the
/// container asserts them at compile time, so a mismatched implementation
/// fails to build at the `push_variant` call site.
pub unsafe trait VariantOf<B>: Sized {}

// Occupying a slot with the declared type itself is always valid.
unsafe impl<B> VariantOf<B> for B {}

/// Whether `D` has exactly the size and alignment of `B`.
///
/// This is the compile-time-checkable half of the variant contract,
/// exposed so callers and tests can probe it directly.
pub const fn layout_compatible<D, B>() -> bool {
    mem::size_of::<D>() == mem::size_of::<B>() && mem::align_of::<D>() == mem::align_of::<B>()
}
