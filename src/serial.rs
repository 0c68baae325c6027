//! Interning: arbitrary keys to dense, reusable integer ids.

use core::fmt;
use core::iter::{Enumerate, FromIterator};
use core::slice;

use alloc::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::index::SlotIndex;
use crate::store::SlotStore;

/// A bijection between keys and the ids `0..len()`.
///
/// This is a [`BijectionMap`](crate::BijectionMap) whose value side is the
/// slot id itself. New keys get the oldest freed id, or the next fresh one.
/// Ids, [`len`](Self::len) and stale payloads behave exactly as in the
/// bijection map.
///
/// # Examples
///
/// ```
/// use bijection_map::SerialBijectionMap;
///
/// let mut symbols = SerialBijectionMap::new();
/// assert_eq!(symbols.next_id(), 0);
/// assert_eq!(symbols.intern("main"), 0);
/// assert_eq!(symbols.intern("argc"), 1);
/// assert_eq!(symbols.intern("main"), 0);
///
/// assert!(symbols.erase_key(&"main"));
/// assert_eq!(symbols.next_id(), 0);
/// assert_eq!(symbols.intern("argv"), 0);
/// ```
pub struct SerialBijectionMap<K, KI = BTreeMap<K, usize>> {
    store: SlotStore<K>,
    index: KI, // key -> id
}

impl<K> SerialBijectionMap<K> {
    /// Creates an empty `SerialBijectionMap` with an ordered index.
    #[inline]
    pub const fn new() -> Self {
        Self {
            store: SlotStore::new(),
            index: BTreeMap::new(),
        }
    }

    /// Creates an empty `SerialBijectionMap` with room for `n` keys.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            store: SlotStore::with_capacity(n),
            index: BTreeMap::new(),
        }
    }
}

impl<K, KI> SerialBijectionMap<K, KI>
where
    K: Clone,
    KI: SlotIndex<K>,
{
    /// Creates an empty `SerialBijectionMap` over the given index backend.
    ///
    /// Any bindings already in `index` are cleared.
    #[inline]
    pub fn with_index(mut index: KI) -> Self {
        index.clear();
        Self {
            store: SlotStore::new(),
            index,
        }
    }

    /// Assigns `key` the next id, unless it already has one.
    ///
    /// Returns whether `key` was inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::SerialBijectionMap;
    ///
    /// let mut ids = SerialBijectionMap::new();
    /// assert!(ids.intern_unique('a'));
    /// assert!(!ids.intern_unique('a'));
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn intern_unique(&mut self, key: K) -> bool {
        if self.index.slot(&key).is_some() {
            return false
        }

        self.bind_new(key);
        true
    }

    /// Returns the id of `key`, assigning the next id if it has none.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn intern(&mut self, key: K) -> usize {
        match self.index.slot(&key) {
            Some(id) => id,
            None => self.bind_new(key),
        }
    }

    /// Erases `key`, freeing its id. Returns `false` if `key` has no id.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn erase_key(&mut self, key: &K) -> bool {
        match self.index.unbind(key) {
            Some(id) => {
                self.store.release(id);
                true
            }
            None => false,
        }
    }

    /// Erases the key holding `id`.
    ///
    /// Returns `false` if `id` was never assigned or is already free.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn erase_id(&mut self, id: usize) -> bool {
        if !self.is_live(id) {
            return false
        }

        if let Some(key) = self.store.get(id) {
            self.index.unbind(key);
        }
        self.store.release(id);
        true
    }

    /// Returns the id of `key`.
    #[inline]
    pub fn find_key(&self, key: &K) -> Option<usize> {
        self.index.slot(key)
    }

    /// Returns `true` if `key` holds an id.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.slot(key).is_some()
    }

    /// Returns `true` if `id` is currently assigned to a key.
    #[inline]
    pub fn is_live(&self, id: usize) -> bool {
        self.store
            .get(id)
            .is_some_and(|key| self.index.slot(key) == Some(id))
    }

    /// Empties the map. Ids start from 0 again afterwards.
    #[inline]
    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
    }

    /// Reserves capacity for at least `additional` more keys.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.store.reserve(additional);
        self.index.reserve(additional);
    }

    fn bind_new(&mut self, key: K) -> usize {
        let id = self.store.allocate(key.clone());
        self.index.bind(key, id);
        id
    }
}

impl<K, KI> SerialBijectionMap<K, KI> {
    /// Returns the key stored at `id`, stale or not.
    ///
    /// # Errors
    ///
    /// [`Error::SlotOutOfBounds`] if `id >= self.len()`.
    #[inline]
    pub fn get_key(&self, id: usize) -> Result<&K> {
        self.store
            .get(id)
            .ok_or_else(|| Error::out_of_bounds(id, self.store.len()))
    }

    /// Returns the id the next new key will get, without assigning it.
    #[inline]
    pub fn next_id(&self) -> usize {
        self.store.next_id()
    }

    /// Number of ids ever assigned, freed ones included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no id has ever been assigned (or since `clear`).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Number of keys currently holding an id.
    #[inline(always)]
    pub fn live_len(&self) -> usize {
        self.store.live_len()
    }

    /// Returns the freed ids in the order they will be reused.
    #[inline]
    pub fn free_ids(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.store.free_ids()
    }

    /// Iterates `(id, &key)` over every assigned id, stale ones included.
    #[inline]
    pub fn iter(&self) -> Enumerate<slice::Iter<'_, K>> {
        self.store.as_slice().iter().enumerate()
    }
}

impl<'a, K, KI> IntoIterator for &'a SerialBijectionMap<K, KI> {
    type Item = (usize, &'a K);
    type IntoIter = Enumerate<slice::Iter<'a, K>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, KI> FromIterator<K> for SerialBijectionMap<K, KI>
where
    K: Clone,
    KI: SlotIndex<K> + Default,
{
    /// Interns the keys in order; repeated keys keep their first id.
    #[inline]
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, KI> Extend<K> for SerialBijectionMap<K, KI>
where
    K: Clone,
    KI: SlotIndex<K>,
{
    #[inline]
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(move |k| _ = self.intern_unique(k));
    }
}

impl<K, KI: Default> Default for SerialBijectionMap<K, KI> {
    #[inline]
    fn default() -> Self {
        Self {
            store: SlotStore::new(),
            index: KI::default(),
        }
    }
}

impl<K: Clone, KI: Clone> Clone for SerialBijectionMap<K, KI> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            index: self.index.clone(),
        }
    }
}

impl<K: PartialEq, KI> PartialEq for SerialBijectionMap<K, KI> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl<K: Eq, KI> Eq for SerialBijectionMap<K, KI> {}

impl<K, KI> fmt::Debug for SerialBijectionMap<K, KI>
where
    K: fmt::Debug + Clone,
    KI: SlotIndex<K>,
{
    /// Shows live `key: id` pairs.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .filter(|&(id, _)| self.is_live(id))
                    .map(|(id, k)| (k, id)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use hashbrown::HashMap;

    #[test]
    fn test_intern_is_idempotent() {
        let mut ids = SerialBijectionMap::new();
        let predicted = ids.next_id();
        let first = ids.intern(String::from("x"));
        assert_eq!(first, predicted);
        assert_eq!(ids.intern(String::from("x")), first);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_intern_unique_reports_insertion() {
        let mut ids = SerialBijectionMap::new();
        assert!(ids.intern_unique("a"));
        assert!(ids.intern_unique("b"));
        assert!(!ids.intern_unique("a"));
        assert_eq!(ids.find_key(&"b"), Some(1));
        assert_eq!(ids.find_key(&"c"), None);
        assert!(ids.contains_key(&"a"));
    }

    #[test]
    fn test_erase_recycles_fifo_and_keeps_len() {
        let mut ids = SerialBijectionMap::new();
        for key in ["a", "b", "c", "d"] {
            ids.intern(key);
        }

        assert!(ids.erase_id(3));
        assert!(ids.erase_key(&"b"));
        assert_eq!(ids.free_ids().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(ids.len(), 4);
        assert_eq!(ids.live_len(), 2);
        assert_eq!(ids.next_id(), 3);

        assert_eq!(ids.intern("e"), 3);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.intern("f"), 1);
        assert_eq!(ids.intern("g"), 4);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_erase_misses() {
        let mut ids = SerialBijectionMap::new();
        ids.intern(7u32);
        assert!(!ids.erase_key(&8));
        assert!(!ids.erase_id(1));
        assert!(ids.erase_id(0));
        assert!(!ids.erase_id(0));
        assert!(!ids.erase_key(&7));
        assert_eq!(ids.free_ids().len(), 1);
    }

    #[test]
    fn test_stale_key_visible_after_erase() {
        let mut ids = SerialBijectionMap::new();
        ids.intern('a');
        ids.intern('b');
        ids.erase_key(&'a');

        assert_eq!(ids.get_key(0), Ok(&'a'));
        assert!(!ids.is_live(0));
        assert_eq!(ids.find_key(&'a'), None);
        assert_eq!(ids.iter().collect::<Vec<_>>(), vec![(0, &'a'), (1, &'b')]);
        assert_eq!(ids.get_key(2), Err(Error::SlotOutOfBounds { id: 2, len: 2 }));

        // re-interning the erased key takes the freed id
        assert_eq!(ids.intern('a'), 0);
        assert!(ids.is_live(0));
    }

    #[test]
    fn test_from_iterator_skips_repeats() {
        let ids: SerialBijectionMap<_> = ["x", "y", "x", "z"].into_iter().collect();
        assert_eq!(ids.len(), 3);
        let keys: Vec<_> = (&ids).into_iter().map(|(_, k)| *k).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_clone_eq_debug_clear() {
        let mut a = SerialBijectionMap::with_capacity(4);
        a.intern("one");
        a.intern("two");
        a.erase_key(&"one");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), r#"{"two": 1}"#);

        a.clear();
        assert!(a.is_empty());
        assert_ne!(a, b);
        assert_eq!(a.intern("three"), 0);
    }

    #[test]
    fn test_hash_index() {
        let mut ids: SerialBijectionMap<&str, HashMap<&str, usize>> =
            SerialBijectionMap::with_index(HashMap::new());
        assert_eq!(ids.intern("a"), 0);
        assert_eq!(ids.intern("b"), 1);
        assert!(ids.erase_key(&"a"));
        assert_eq!(ids.intern("c"), 0);
        ids.reserve(4);
        assert_eq!(ids.find_key(&"c"), Some(0));
    }

    #[test]
    fn test_with_index_drops_prefilled_bindings() {
        let mut index = BTreeMap::<char, usize>::new();
        index.insert('q', 9);

        let mut ids = SerialBijectionMap::with_index(index);
        assert_eq!(ids.find_key(&'q'), None);
        assert!(!ids.erase_key(&'q'));
        assert_eq!(ids.intern('q'), 0);
        assert!(ids.is_live(0));
        assert_eq!(ids.free_ids().len(), 0);
    }
}
