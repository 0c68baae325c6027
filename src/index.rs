//! Lookup tables from an item to the slot id it occupies.
//!
//! Each container keeps one [`SlotIndex`] per indexed domain: the bijection
//! map keeps two (keys and values), the serial map keeps one (keys). The
//! default backend is `BTreeMap`, which needs `Ord` and gives O(log n)
//! lookups. `hashbrown::HashMap` can be plugged in for `Eq + Hash` domains.

use core::hash::{BuildHasher, Hash};

use alloc::collections::BTreeMap;

use hashbrown::HashMap;

/// An item -> slot id table.
///
/// Implementations treat items that compare equal as the same item: binding
/// an item that is already bound replaces its slot id.
pub trait SlotIndex<T> {
    /// Returns the slot id bound to `item`, if any.
    fn slot(&self, item: &T) -> Option<usize>;

    /// Binds `item` to `id`, returning the id it was bound to before.
    fn bind(&mut self, item: T, id: usize) -> Option<usize>;

    /// Removes the binding for `item`, returning its slot id.
    fn unbind(&mut self, item: &T) -> Option<usize>;

    /// Number of bound items.
    fn len(&self) -> usize;

    /// Returns `true` if no item is bound.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every binding.
    fn clear(&mut self);

    /// Reserves room for at least `additional` more bindings, where the
    /// backend supports it.
    fn reserve(&mut self, additional: usize);
}

impl<T: Ord> SlotIndex<T> for BTreeMap<T, usize> {
    #[inline]
    fn slot(&self, item: &T) -> Option<usize> {
        self.get(item).copied()
    }

    #[inline]
    fn bind(&mut self, item: T, id: usize) -> Option<usize> {
        self.insert(item, id)
    }

    #[inline]
    fn unbind(&mut self, item: &T) -> Option<usize> {
        self.remove(item)
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    // B-trees allocate per node
    #[inline]
    fn reserve(&mut self, _additional: usize) {}
}

impl<T, S> SlotIndex<T> for HashMap<T, usize, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn slot(&self, item: &T) -> Option<usize> {
        self.get(item).copied()
    }

    #[inline]
    fn bind(&mut self, item: T, id: usize) -> Option<usize> {
        self.insert(item, id)
    }

    #[inline]
    fn unbind(&mut self, item: &T) -> Option<usize> {
        self.remove(item)
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        HashMap::clear(self)
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        HashMap::reserve(self, additional)
    }
}
