//! The container and its mutation operations.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::slice;

use crate::error::AllocError;
use crate::iter::{Iter, IterMut};
use crate::raw::RawStorage;
use crate::variant::VariantOf;

/// A contiguous growable vector whose slots can hold layout-compatible
/// variants of the declared element type `B`, in place.
///
/// Slots `[0, len)` each hold exactly one live object — `B` itself or a
/// [`VariantOf<B>`] occupant written by [`push_variant`](Self::push_variant).
/// Every occupant is read and torn down at type `B`; see [`VariantOf`] for
/// the contract that makes this valid. Slots `[len, capacity)` are raw
/// storage: never read, never dropped, never assumed zero.
///
/// Growth doubles the capacity starting from 1 and relocates live elements
/// bytewise (sound for every Rust type; nothing here is ever pinned).
///
/// The container is deliberately not `Clone`, and it is neither `Send` nor
/// `Sync`: slots may hold occupants whose concrete types are erased, so
/// thread-safety of the element type alone proves nothing about the
/// occupants.
///
/// ```
/// use polyvec::PolyVec;
///
/// let mut vec = PolyVec::from([1, 2, 3]);
/// vec.push(4);
/// vec.erase_value(&2);
/// assert_eq!(vec, [1, 3, 4]);
/// ```
pub struct PolyVec<B> {
    buf: RawStorage<B>,
    len: usize,
}

impl<B> PolyVec<B> {
    /// Create an empty container. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buf: RawStorage::new(),
            len: 0,
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots the buffer can hold without reallocating.
    ///
    /// `usize::MAX` for zero-sized element types, which never allocate.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Grow the buffer to exactly `new_cap` slots. No-op if
    /// `new_cap <= capacity()`. Live elements and their order are
    /// unchanged.
    ///
    /// On allocation failure the process is terminated via
    /// [`std::alloc::handle_alloc_error`]; use [`try_reserve`](Self::try_reserve)
    /// to handle failure at the call site.
    pub fn reserve(&mut self, new_cap: usize) {
        if let Err(err) = self.try_reserve(new_cap) {
            err.fail()
        }
    }

    /// Fallible [`reserve`](Self::reserve). On `Err` the container is
    /// untouched, so the caller may retry with reduced demand.
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), AllocError> {
        self.buf.try_grow_exact(self.len, new_cap)
    }

    /// Append `value` past the last live slot. Amortized O(1).
    pub fn push(&mut self, value: B) {
        if self.len == self.buf.capacity() {
            self.grow_for_append();
        }
        // SAFETY: slot `len` is within capacity and is raw storage.
        unsafe { ptr::write(self.buf.ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Append a layout-compatible variant occupant in place. Amortized O(1).
    ///
    /// The slot is thereafter read and torn down exclusively at type `B`.
    /// A variant whose size or alignment differs from `B`'s fails to
    /// compile; the remaining obligations are [`VariantOf`]'s.
    ///
    /// A `VariantOf` implementor with trailing fields has the wrong size
    /// and is rejected at build time, not at run time:
    ///
    /// ```compile_fail
    /// use polyvec::{PolyVec, VariantOf};
    ///
    /// #[repr(C)]
    /// struct Shape {
    ///     side: f64,
    /// }
    ///
    /// #[repr(C)]
    /// struct Labelled {
    ///     base: Shape,
    ///     label: u64, // trailing field: sizeof(Labelled) != sizeof(Shape)
    /// }
    ///
    /// unsafe impl VariantOf<Shape> for Labelled {}
    ///
    /// let mut vec: PolyVec<Shape> = PolyVec::new();
    /// vec.push_variant(Labelled {
    ///     base: Shape { side: 1.0 },
    ///     label: 7,
    /// });
    /// ```
    pub fn push_variant<D>(&mut self, value: D)
    where
        D: VariantOf<B>,
    {
        const {
            assert!(
                mem::size_of::<D>() == mem::size_of::<B>(),
                "variant must have exactly the size of the declared element type"
            );
            assert!(
                mem::align_of::<D>() == mem::align_of::<B>(),
                "variant must have exactly the alignment of the declared element type"
            );
        };
        if self.len == self.buf.capacity() {
            self.grow_for_append();
        }
        // SAFETY: slot `len` is raw storage of exactly D's size and
        // alignment (asserted above). The occupant is accessed as `B`
        // from here on, which the VariantOf contract makes valid.
        unsafe { ptr::write(self.buf.ptr().add(self.len).cast::<D>(), value) };
        self.len += 1;
    }

    /// Drop the last live element in place. No-op when empty.
    ///
    /// Unlike `Vec::pop` the element is not returned: moving an occupant
    /// out at type `B` would open a second teardown path for variant
    /// occupants, and the whole point is that there is exactly one.
    pub fn pop(&mut self) {
        if self.len > 0 {
            self.len -= 1;
            // SAFETY: slot `len` held the last live element; it is dropped
            // exactly once, through `B`.
            unsafe { ptr::drop_in_place(self.buf.ptr().add(self.len)) };
        }
    }

    /// Insert `value` at `index`, shifting `[index, len)` one slot toward
    /// the end. O(n) in the number of shifted elements.
    ///
    /// When the buffer is full the shift is fused into the growth: the head
    /// is copied unchanged into the new buffer, the tail lands one slot
    /// later, and the value fills the gap — one relocation pass, never
    /// grow-then-shift.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: B) {
        assert!(
            index <= self.len,
            "insert index {index} out of range for length {}",
            self.len
        );
        if self.len == self.buf.capacity() {
            let new_cap = self.buf.next_capacity();
            let new_ptr = match RawStorage::<B>::alloc_buffer(new_cap) {
                Ok(ptr) => ptr,
                Err(err) => err.fail(),
            };
            // SAFETY: the head keeps its slots, the tail lands one slot
            // later, and the new element fills the gap. All relocation is
            // bytewise into a distinct allocation; the old copies are
            // abandoned and the old buffer freed by `replace`.
            unsafe {
                let old = self.buf.ptr();
                ptr::copy_nonoverlapping(old, new_ptr.as_ptr(), index);
                ptr::copy_nonoverlapping(
                    old.add(index),
                    new_ptr.as_ptr().add(index + 1),
                    self.len - index,
                );
                ptr::write(new_ptr.as_ptr().add(index), value);
                self.buf.replace(new_ptr, new_cap);
            }
        } else {
            // SAFETY: index <= len < capacity. The overlapping copy shifts
            // [index, len) one slot right, then the gap is written.
            unsafe {
                let gap = self.buf.ptr().add(index);
                ptr::copy(gap, gap.add(1), self.len - index);
                ptr::write(gap, value);
            }
        }
        self.len += 1;
    }

    /// Remove **every** element equal to `value`, preserving the order of
    /// the survivors. No-op if `value` never occurs.
    ///
    /// Scans once from the first occurrence to the end, compacting
    /// survivors leftward bytewise and dropping each removed element
    /// exactly once. Elements before the first occurrence are untouched.
    /// Equality on a variant-occupied slot is `B`'s equality on the prefix.
    ///
    /// If `B::eq` unwinds mid-scan, elements past the compacted prefix
    /// leak; none is ever dropped twice.
    pub fn erase_value(&mut self, value: &B)
    where
        B: PartialEq,
    {
        let ptr = self.buf.ptr();
        let len = self.len;

        let mut write = 0;
        while write < len {
            // SAFETY: slot `write` is live and readable at `B`.
            if unsafe { &*ptr.add(write) } == value {
                break;
            }
            write += 1;
        }
        if write == len {
            return;
        }

        // Clamp to the untouched prefix for the duration of the scan: an
        // unwinding `eq` or `drop` leaks the tail instead of double-dropping.
        self.len = write;
        // SAFETY: slot `write` matched and is dropped exactly once.
        unsafe { ptr::drop_in_place(ptr.add(write)) };

        let mut read = write + 1;
        while read < len {
            // SAFETY: slot `read` is live. `write < read` always holds, so
            // survivor relocation is between disjoint slots; the source
            // copy is abandoned, not dropped.
            unsafe {
                if &*ptr.add(read) != value {
                    ptr::copy_nonoverlapping(ptr.add(read), ptr.add(write), 1);
                    write += 1;
                } else {
                    ptr::drop_in_place(ptr.add(read));
                }
            }
            read += 1;
        }
        self.len = write;
    }

    /// Drop every live element, keeping the buffer and capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop elements `[new_len, len)` in place. No-op if `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        self.len = new_len;
        // SAFETY: the truncated slots were live; dropping them as a slice
        // drops each exactly once (even if one of the drops unwinds), all
        // through `B`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.ptr().add(new_len),
                tail,
            ));
        }
    }

    /// Reference to the element at `index`, or `None` past the live range.
    pub fn get(&self, index: usize) -> Option<&B> {
        if index < self.len {
            // SAFETY: `index` is within the live range.
            Some(unsafe { &*self.buf.ptr().add(index) })
        } else {
            None
        }
    }

    /// Mutable reference to the element at `index`, or `None` past the
    /// live range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut B> {
        if index < self.len {
            // SAFETY: `index` is within the live range; `&mut self` makes
            // the access exclusive.
            Some(unsafe { &mut *self.buf.ptr().add(index) })
        } else {
            None
        }
    }

    /// The first live element, or `None` when empty.
    pub fn first(&self) -> Option<&B> {
        self.get(0)
    }

    /// Mutable reference to the first live element, or `None` when empty.
    pub fn first_mut(&mut self) -> Option<&mut B> {
        self.get_mut(0)
    }

    /// The last live element, or `None` when empty.
    pub fn last(&self) -> Option<&B> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Mutable reference to the last live element, or `None` when empty.
    pub fn last_mut(&mut self) -> Option<&mut B> {
        self.len.checked_sub(1).and_then(move |i| self.get_mut(i))
    }

    /// Base pointer of the buffer. Dangling (but aligned) before the first
    /// allocation.
    pub fn as_ptr(&self) -> *const B {
        self.buf.ptr()
    }

    /// Mutable base pointer of the buffer.
    pub fn as_mut_ptr(&mut self) -> *mut B {
        self.buf.ptr()
    }

    /// The live range as a slice.
    pub fn as_slice(&self) -> &[B] {
        // SAFETY: slots [0, len) are live and each is valid at `B` per the
        // VariantOf contract; the borrow is tied to `&self`.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The live range as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [B] {
        // SAFETY: as `as_slice`, with exclusivity from `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Cursor over the live range, starting at slot 0 and yielding exactly
    /// `len()` elements.
    pub fn iter(&self) -> Iter<'_, B> {
        // SAFETY: slots [0, len) are live for the duration of the borrow.
        unsafe { Iter::new(self.buf.ptr(), self.len) }
    }

    /// Mutable cursor over the live range.
    pub fn iter_mut(&mut self) -> IterMut<'_, B> {
        // SAFETY: slots [0, len) are live and exclusively borrowed.
        unsafe { IterMut::new(self.buf.ptr(), self.len) }
    }

    fn grow_for_append(&mut self) {
        if let Err(err) = self.buf.try_grow_amortized(self.len) {
            err.fail()
        }
    }
}

impl<B> Drop for PolyVec<B> {
    fn drop(&mut self) {
        // Drop exactly the live range [0, len), never beyond it; the
        // buffer itself is freed by RawStorage's drop afterwards.
        self.clear();
    }
}

impl<B> Default for PolyVec<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, const N: usize> From<[B; N]> for PolyVec<B> {
    /// Build from a literal sequence by repeated append, so the capacity
    /// follows the doubling schedule rather than being sized to `N`.
    fn from(values: [B; N]) -> Self {
        let mut vec = Self::new();
        for value in values {
            vec.push(value);
        }
        vec
    }
}

impl<B> FromIterator<B> for PolyVec<B> {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<B> Extend<B> for PolyVec<B> {
    fn extend<I: IntoIterator<Item = B>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<B> Index<usize> for PolyVec<B> {
    type Output = B;

    /// # Panics
    ///
    /// Panics if `index >= len()`. Checked indexing is the documented
    /// deviation from the unchecked access of the original design; use
    /// [`PolyVec::get`] for the non-panicking form.
    fn index(&self, index: usize) -> &B {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for length {}", self.len),
        }
    }
}

impl<B> IndexMut<usize> for PolyVec<B> {
    fn index_mut(&mut self, index: usize) -> &mut B {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for length {len}"),
        }
    }
}

impl<'a, B> IntoIterator for &'a PolyVec<B> {
    type Item = &'a B;
    type IntoIter = Iter<'a, B>;

    fn into_iter(self) -> Iter<'a, B> {
        self.iter()
    }
}

impl<'a, B> IntoIterator for &'a mut PolyVec<B> {
    type Item = &'a mut B;
    type IntoIter = IterMut<'a, B>;

    fn into_iter(self) -> IterMut<'a, B> {
        self.iter_mut()
    }
}

impl<B: fmt::Debug> fmt::Debug for PolyVec<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<B: PartialEq> PartialEq for PolyVec<B> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<B: PartialEq, const N: usize> PartialEq<[B; N]> for PolyVec<B> {
    fn eq(&self, other: &[B; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<B: PartialEq> PartialEq<&[B]> for PolyVec<B> {
    fn eq(&self, other: &&[B]) -> bool {
        self.as_slice() == *other
    }
}
