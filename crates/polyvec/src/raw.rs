//! Raw buffer ownership and growth.
//!
//! [`RawStorage`] is the only place in the crate that talks to the global
//! allocator. It owns `cap` element-sized slots of possibly-uninitialized
//! memory and knows nothing about which slots are live — the container
//! layered on top tracks that and drops elements before this buffer is
//! released.
//!
//! Relocation on growth is bytewise (`ptr::copy_nonoverlapping`, no drop
//! glue, old copies abandoned). A Rust move is itself a bitwise copy and
//! nothing in this crate ever pins an element, so bytewise relocation is
//! unconditionally sound here.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// An owned buffer of `cap` possibly-uninitialized slots of `B`.
///
/// Dropping a `RawStorage` frees the buffer only; it never drops elements.
/// For zero-sized `B` no memory is ever allocated and the capacity reports
/// `usize::MAX`.
pub(crate) struct RawStorage<B> {
    ptr: NonNull<B>,
    cap: usize,
    _owns: PhantomData<B>,
}

impl<B> RawStorage<B> {
    /// An empty buffer: no allocation, capacity 0 (or `usize::MAX` for ZSTs).
    pub(crate) const fn new() -> Self {
        let cap = if mem::size_of::<B>() == 0 { usize::MAX } else { 0 };
        Self {
            ptr: NonNull::dangling(),
            cap,
            _owns: PhantomData,
        }
    }

    /// Base pointer of the buffer. Dangling (but aligned) when unallocated.
    pub(crate) fn ptr(&self) -> *mut B {
        self.ptr.as_ptr()
    }

    /// Number of slots the buffer can hold.
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Allocate a fresh, unattached buffer of exactly `cap` slots.
    ///
    /// Used directly by the fused insert-grow path, which relocates into
    /// the new buffer itself before handing it to [`RawStorage::replace`].
    pub(crate) fn alloc_buffer(cap: usize) -> Result<NonNull<B>, AllocError> {
        debug_assert!(mem::size_of::<B>() != 0 && cap > 0);
        let layout = Layout::array::<B>(cap)
            .map_err(|_| AllocError::CapacityOverflow { requested: cap })?;
        // SAFETY: the layout has non-zero size (`B` is not a ZST, cap > 0).
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<B>()).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
        })
    }

    /// Swap in a new buffer, freeing the previous one.
    ///
    /// # Safety
    ///
    /// Every live element of the old buffer must already have been
    /// relocated or dropped, and `new_ptr` must be an allocation of
    /// exactly `new_cap` slots obtained from [`RawStorage::alloc_buffer`].
    pub(crate) unsafe fn replace(&mut self, new_ptr: NonNull<B>, new_cap: usize) {
        if self.cap != 0 && mem::size_of::<B>() != 0 {
            let layout = Layout::array::<B>(self.cap)
                .expect("layout was validated when the buffer was allocated");
            // SAFETY: the old buffer was allocated with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
    }

    /// Grow to exactly `new_cap` slots, relocating `len` live elements
    /// bytewise in order. No-op if `new_cap <= capacity`.
    ///
    /// Failure-atomic: the new buffer is obtained before the old one is
    /// touched, so on `Err` the buffer, its contents, and `capacity` are
    /// all unchanged.
    pub(crate) fn try_grow_exact(&mut self, len: usize, new_cap: usize) -> Result<(), AllocError> {
        if mem::size_of::<B>() == 0 || new_cap <= self.cap {
            return Ok(());
        }
        let new_ptr = Self::alloc_buffer(new_cap)?;
        // SAFETY: both buffers hold at least `len` slots and are distinct
        // allocations. Live elements move bytewise; the old copies are
        // abandoned without drop glue, then the old buffer is freed.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
            self.replace(new_ptr, new_cap);
        }
        Ok(())
    }

    /// Growth step for append-style mutations: double the capacity,
    /// starting from 1.
    pub(crate) fn try_grow_amortized(&mut self, len: usize) -> Result<(), AllocError> {
        let target = self.next_capacity();
        self.try_grow_exact(len, target)
    }

    /// The doubling target: `max(1, capacity * 2)`.
    ///
    /// Saturating: a ZST buffer already reports `usize::MAX` and must not
    /// overflow here (growth is a no-op for it anyway).
    pub(crate) fn next_capacity(&self) -> usize {
        if self.cap == 0 {
            1
        } else {
            self.cap.saturating_mul(2)
        }
    }
}

impl<B> Drop for RawStorage<B> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<B>() != 0 {
            let layout = Layout::array::<B>(self.cap)
                .expect("layout was validated when the buffer was allocated");
            // SAFETY: the buffer was allocated with this exact layout, and
            // the owning container has already dropped every live element.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
        }
    }
}
