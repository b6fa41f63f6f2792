//! Fixed-capacity storage for per-frame records.

/// Appending more items than a buffer has room for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Overflow {
    pub requested: usize,
    pub available: usize,
}

/// Preallocated, append-only store with a hard capacity.
///
/// Storage is reserved once at construction; appends never reallocate.
/// Writers reserve an exact slot count up front via [`reserve`](Self::reserve),
/// so a request that does not fit fails before anything is written.
#[derive(Debug)]
pub struct FixedBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> FixedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }

    /// Checks that `count` more items fit without writing anything.
    #[inline]
    pub fn check(&self, count: usize) -> Result<(), Overflow> {
        if count > self.remaining() {
            Err(Overflow { requested: count, available: self.remaining() })
        } else {
            Ok(())
        }
    }

    /// Appends a single item.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<usize, Overflow> {
        self.check(1)?;
        let index = self.items.len();
        self.items.push(item);
        Ok(index)
    }

    /// Reserves exactly `count` slots and returns a writer for them.
    pub fn reserve(&mut self, count: usize) -> Result<Reserved<'_, T>, Overflow> {
        self.check(count)?;
        let start = self.items.len();
        Ok(Reserved { items: &mut self.items, start, remaining: count })
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Drops all items. Keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops all items and the allocation. The buffer reports zero capacity afterwards.
    pub fn release(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

/// Writer over slots reserved by [`FixedBuffer::reserve`].
pub struct Reserved<'a, T> {
    items: &'a mut Vec<T>,
    start: usize,
    remaining: usize,
}

impl<T> Reserved<'_, T> {
    /// Index of the first reserved slot.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of items written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.items.len() - self.start
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Writes the next item. Writes past the reservation are dropped.
    #[inline]
    pub fn push(&mut self, item: T) {
        debug_assert!(self.remaining > 0, "write past reserved range");
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        self.items.push(item);
    }

    /// Items written through this reservation.
    #[inline]
    pub fn written_mut(&mut self) -> &mut [T] {
        &mut self.items[self.start..]
    }
}
