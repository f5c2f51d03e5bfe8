//! Non-owning cursors over the live range.
//!
//! Both cursors are a base pointer plus a remaining count. They borrow the
//! container, so every operation that would invalidate them (growth,
//! `insert`, `erase_value`, …) is rejected by the borrow checker while one
//! is live — the invalidation contract is static, not documented.

use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Immutable cursor over a container's live range.
pub struct Iter<'a, B> {
    ptr: *const B,
    remaining: usize,
    _marker: PhantomData<&'a B>,
}

impl<'a, B> Iter<'a, B> {
    /// # Safety
    ///
    /// `ptr` must point at `len` live slots, valid at type `B` for `'a`.
    pub(crate) unsafe fn new(ptr: *const B, len: usize) -> Self {
        Self {
            ptr,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, B> Iterator for Iter<'a, B> {
    type Item = &'a B;

    fn next(&mut self) -> Option<&'a B> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `remaining > 0`, so `ptr` is within the live range the
        // cursor was created over. Advancing lands at most one past the
        // end, which is never dereferenced.
        let item = unsafe { &*self.ptr };
        self.ptr = unsafe { self.ptr.add(1) };
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B> ExactSizeIterator for Iter<'_, B> {}
impl<B> FusedIterator for Iter<'_, B> {}

/// Mutable cursor over a container's live range.
///
/// Yields exclusive references to elements; the structure of the container
/// (length, capacity, slot positions) cannot be changed through it.
pub struct IterMut<'a, B> {
    ptr: *mut B,
    remaining: usize,
    _marker: PhantomData<&'a mut B>,
}

impl<'a, B> IterMut<'a, B> {
    /// # Safety
    ///
    /// `ptr` must point at `len` live slots, valid at type `B` and
    /// exclusively borrowed for `'a`.
    pub(crate) unsafe fn new(ptr: *mut B, len: usize) -> Self {
        Self {
            ptr,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, B> Iterator for IterMut<'a, B> {
    type Item = &'a mut B;

    fn next(&mut self) -> Option<&'a mut B> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: as in `Iter::next`; each slot is yielded exactly once,
        // so the exclusive references never alias.
        let item = unsafe { &mut *self.ptr };
        self.ptr = unsafe { self.ptr.add(1) };
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B> ExactSizeIterator for IterMut<'_, B> {}
impl<B> FusedIterator for IterMut<'_, B> {}

#[cfg(test)]
mod tests {
    use crate::PolyVec;

    #[test]
    fn iterates_in_slot_order() {
        let vec = PolyVec::from([1, 2, 3, 4]);
        let seen: Vec<i32> = vec.iter().copied().collect();
        assert_eq!(seen, [1, 2, 3, 4]);
    }

    #[test]
    fn exact_size_and_fused() {
        let vec = PolyVec::from([10, 20]);
        let mut it = vec.iter();
        assert_eq!(it.len(), 2);
        it.next();
        assert_eq!(it.len(), 1);
        it.next();
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn iter_mut_writes_through() {
        let mut vec = PolyVec::from([1, 2, 3]);
        for v in vec.iter_mut() {
            *v *= 10;
        }
        assert_eq!(vec.as_slice(), [10, 20, 30]);
    }

    #[test]
    fn empty_container_yields_nothing() {
        let vec: PolyVec<u64> = PolyVec::new();
        assert_eq!(vec.iter().count(), 0);
    }
}
