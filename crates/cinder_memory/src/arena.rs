//! Arena allocator - fast linear allocation with bulk deallocation

use core::cell::{Cell, UnsafeCell};
use core::ptr::NonNull;

/// Every allocation is rounded up to this alignment.
pub const ARENA_ALIGN: usize = 8;

/// Arena allocator - sequential offsets from a preallocated buffer.
///
/// Allocations are served linearly; individual deallocations are not
/// supported, only bulk [`reset`](Arena::reset) (and [`rewind`](Arena::rewind)
/// to a saved [`Mark`]). Exhaustion is an invariant violation and panics with
/// a diagnostic rather than returning an error: capacities are sized at
/// startup and overrunning one indicates a build defect.
///
/// The backing buffer is heap-allocated and never moves, so pointers handed
/// out stay valid when the `Arena` value itself is moved.
pub struct Arena {
    /// Backing memory, zero-initialized at creation
    buffer: UnsafeCell<Box<[u8]>>,
    /// Current allocation offset
    used: Cell<usize>,
    /// Total capacity in bytes
    capacity: usize,
}

/// Saved arena offset for scoped scratch allocations.
#[derive(Clone, Copy, Debug)]
pub struct Mark {
    used: usize,
}

impl Arena {
    /// Create a new arena with the given capacity. The buffer is
    /// zero-initialized exactly once, here; `reset` leaves stale bytes.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "arena capacity must be non-zero");
        let buffer = vec![0u8; capacity].into_boxed_slice();

        Self {
            buffer: UnsafeCell::new(buffer),
            used: Cell::new(0),
            capacity,
        }
    }

    /// Create a new arena with the given capacity in KB
    pub fn with_capacity_kb(kb: usize) -> Self {
        Self::new(kb * 1024)
    }

    /// Create a new arena with the given capacity in MB
    pub fn with_capacity_mb(mb: usize) -> Self {
        Self::new(mb * 1024 * 1024)
    }

    /// Allocate `size` bytes, rounded up to [`ARENA_ALIGN`].
    ///
    /// Panics if the arena is exhausted.
    pub fn alloc(&self, size: usize) -> NonNull<u8> {
        let aligned = size
            .checked_add(ARENA_ALIGN - 1)
            .expect("arena allocation size overflow")
            & !(ARENA_ALIGN - 1);
        let offset = self.used.get();
        assert!(
            offset + aligned <= self.capacity,
            "arena exhausted: {} used + {} requested > {} capacity",
            offset,
            aligned,
            self.capacity
        );
        self.used.set(offset + aligned);

        // No reference to the whole buffer is formed here; handed-out
        // regions are disjoint, so they never alias each other.
        unsafe {
            let base = (*self.buffer.get()).as_mut_ptr();
            NonNull::new_unchecked(base.add(offset))
        }
    }

    /// Allocate storage for a `T`.
    ///
    /// The returned pointer addresses zeroed bytes only if this region of
    /// the arena has never been allocated since creation; after a reset,
    /// stale bytes from the previous epoch remain.
    pub fn alloc_type<T>(&self) -> NonNull<T> {
        assert!(
            core::mem::align_of::<T>() <= ARENA_ALIGN,
            "type alignment {} exceeds arena alignment",
            core::mem::align_of::<T>()
        );
        self.alloc(core::mem::size_of::<T>()).cast()
    }

    /// Allocate storage for `n` values of `T`, contiguous.
    pub fn alloc_array<T>(&self, n: usize) -> NonNull<T> {
        assert!(
            core::mem::align_of::<T>() <= ARENA_ALIGN,
            "type alignment {} exceeds arena alignment",
            core::mem::align_of::<T>()
        );
        let bytes = core::mem::size_of::<T>()
            .checked_mul(n)
            .expect("arena array size overflow");
        self.alloc(bytes).cast()
    }

    /// Allocate a byte slice of length `len`.
    ///
    /// The slice borrows the arena, so it cannot outlive a `reset` or
    /// `rewind` (both take `&mut self`).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice(&self, len: usize) -> &mut [u8] {
        let ptr = self.alloc(len);
        unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
    }

    /// Set `used` back to 0. Memory contents are untouched: callers must
    /// not assume zeroed memory after a reset.
    pub fn reset(&mut self) {
        self.used.set(0);
    }

    /// Save the current offset for a later [`rewind`](Arena::rewind).
    pub fn mark(&self) -> Mark {
        Mark { used: self.used.get() }
    }

    /// Roll back to a previously saved mark, discarding everything
    /// allocated since.
    pub fn rewind(&mut self, mark: Mark) {
        debug_assert!(mark.used <= self.used.get());
        self.used.set(mark.used);
    }

    /// Bytes currently allocated
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }
}

// The buffer is uniquely owned; the arena is confined to the single
// runtime thread, so only Send is offered.
unsafe impl Send for Arena {}
