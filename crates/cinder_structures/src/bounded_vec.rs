//! Fixed-capacity inline vector

use core::ops::{Index, IndexMut};

/// A vector with inline storage and a compile-time capacity.
///
/// `#[repr(C)]` and valid when zero-initialized (`len == 0`), so it can be
/// embedded in structs carved out of a zeroed arena and passed across the
/// dynamic module boundary.
///
/// `push` reports failure when full instead of growing; indexed access is
/// bounds-checked against `len`, not capacity.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct BoundedVec<T, const N: usize> {
    len: u32,
    items: [T; N],
}

impl<T: Copy + Default, const N: usize> BoundedVec<T, N> {
    pub fn new() -> Self {
        Self {
            len: 0,
            items: [T::default(); N],
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for BoundedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedVec<T, N> {
    pub const CAPACITY: usize = N;

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Append an element. Returns `Err` with the element when full.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.items[self.len()] = item;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        if idx < self.len() {
            Some(&self.items[idx])
        } else {
            None
        }
    }

    /// Remove by swapping the last element into `idx`. Order is not kept.
    pub fn swap_remove(&mut self, idx: usize) -> T
    where
        T: Copy,
    {
        assert!(idx < self.len(), "index {} out of bounds (len {})", idx, self.len());
        let item = self.items[idx];
        self.len -= 1;
        self.items[idx] = self.items[self.len()];
        item
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len()]
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T, const N: usize> Index<usize> for BoundedVec<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &T {
        assert!(idx < self.len(), "index {} out of bounds (len {})", idx, self.len());
        &self.items[idx]
    }
}

impl<T, const N: usize> IndexMut<usize> for BoundedVec<T, N> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut T {
        assert!(idx < self.len(), "index {} out of bounds (len {})", idx, self.len());
        &mut self.items[idx]
    }
}
