//! Append/recycle slot storage shared by every container in the crate.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use tracing::trace;

/// Slots addressed by stable ids, plus the FIFO queue of ids freed by erasure.
///
/// Slots are never physically removed. Releasing an id only queues it, and
/// the payload stays readable until the id is handed out again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SlotStore<T> {
    slots: Vec<T>,
    free: VecDeque<usize>,
}

impl<T> SlotStore<T> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: VecDeque::new(),
        }
    }

    #[inline]
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            slots: Vec::with_capacity(n),
            free: VecDeque::new(),
        }
    }

    /// Stores `item` in the oldest freed slot, or appends a new one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub(crate) fn allocate(&mut self, item: T) -> usize {
        if let Some(id) = self.free.pop_front() {
            self.slots[id] = item;
            trace!(id, recycled = true, "slot allocated");
            id
        } else {
            let id = self.slots.len();
            self.slots.push(item);
            trace!(id, recycled = false, "slot allocated");
            id
        }
    }

    /// Queues `id` for reuse. The caller checks that it is live.
    #[inline]
    pub(crate) fn release(&mut self, id: usize) {
        debug_assert!(id < self.slots.len());
        debug_assert!(self.free.len() < self.slots.len());
        self.free.push_back(id);
        trace!(id, free = self.free.len(), "slot released");
    }

    /// The id the next allocation will return.
    #[inline]
    pub(crate) fn next_id(&self) -> usize {
        self.free.front().copied().unwrap_or(self.slots.len())
    }

    #[inline(always)]
    pub(crate) fn get(&self, id: usize) -> Option<&T> {
        self.slots.get(id)
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.slots.get_mut(id)
    }

    #[inline(always)]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots
    }

    /// High-water mark: every id ever allocated, freed ones included.
    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn live_len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub(crate) fn free_ids(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    #[inline]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

impl<T> Default for SlotStore<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_allocate_appends_then_recycles_fifo() {
        let mut store = SlotStore::new();
        assert_eq!(store.allocate('a'), 0);
        assert_eq!(store.allocate('b'), 1);
        assert_eq!(store.allocate('c'), 2);

        store.release(2);
        store.release(0);
        assert_eq!(store.next_id(), 2);
        assert_eq!(store.free_ids().collect::<Vec<_>>(), vec![2, 0]);

        // oldest release first
        assert_eq!(store.allocate('x'), 2);
        assert_eq!(store.allocate('y'), 0);
        assert_eq!(store.allocate('z'), 3);
        assert_eq!(store.as_slice(), &['y', 'b', 'x', 'z']);
    }

    #[test]
    fn test_len_is_high_water_mark() {
        let mut store = SlotStore::new();
        store.allocate(1);
        store.allocate(2);
        store.release(1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.live_len(), 1);
        // stale payload is still there
        assert_eq!(store.get(1), Some(&2));
    }

    #[test]
    fn test_clear_and_capacity() {
        let mut store: SlotStore<u8> = SlotStore::with_capacity(8);
        assert!(store.capacity() >= 8);
        store.allocate(1);
        store.release(0);
        store.clear();
        assert_eq!(store.len(), 0);
        assert_eq!(store.next_id(), 0);
        assert_eq!(store.free_ids().len(), 0);
        store.reserve(32);
        assert!(store.capacity() >= 32);
    }

    #[test]
    fn test_bulk_release_then_refill() {
        const N: usize = 50_000;
        let mut store = SlotStore::with_capacity(N);
        for i in 0..N {
            store.allocate(i);
        }
        for id in (0..N).rev() {
            store.release(id);
        }
        assert_eq!(store.live_len(), 0);
        assert_eq!(store.next_id(), N - 1);

        for i in 0..N {
            assert_eq!(store.allocate(i), N - 1 - i);
        }
        assert_eq!(store.len(), N);
        assert_eq!(store.free_ids().len(), 0);
    }
}
