//! Contiguous polymorphic storage without per-element indirection.
//!
//! [`PolyVec<B>`] is a growable, heap-backed vector declared for one
//! element type `B` whose slots may also hold values of *layout-compatible
//! variant* types — same size, same alignment, readable and droppable at
//! type `B`. Variants live directly in the buffer: no boxing, no
//! per-element allocation, no array of wide pointers.
//!
//! # Architecture
//!
//! ```text
//! PolyVec<B> (container + mutation operations)
//! ├── RawStorage<B>   buffer ownership, doubling growth, bytewise relocation
//! ├── VariantOf<B>    compile-time layout constraint for variant occupants
//! └── Iter / IterMut  non-owning cursors over the live range [0, len)
//! ```
//!
//! # The slot contract
//!
//! Slots `[0, len)` hold exactly one live object each; slots
//! `[len, capacity)` are raw storage and are never read or dropped. An
//! occupant written by [`PolyVec::push_variant`] is accessed and torn down
//! exclusively at type `B` afterwards — [`VariantOf`] documents what an
//! implementor must guarantee for that to be sound, and the size/alignment
//! halves of the contract are rejected at compile time.
//!
//! # Relocation
//!
//! Growth allocates the new buffer first (on failure the container is
//! untouched and the error reports the refused size), then relocates live
//! elements bytewise. Rust moves are bitwise and nothing in this crate
//! pins an element, so bytewise relocation needs no opt-in marker.
//!
//! ```
//! use polyvec::PolyVec;
//!
//! let mut vec = PolyVec::new();
//! vec.push(1);
//! vec.push(2);
//! vec.insert(1, 5);
//! assert_eq!(vec, [1, 5, 2]);
//! assert_eq!(vec.capacity(), 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod iter;
mod raw;
pub mod variant;
mod vec;

// Public re-exports for the primary API surface.
pub use error::AllocError;
pub use iter::{Iter, IterMut};
pub use variant::{layout_compatible, VariantOf};
pub use vec::PolyVec;
