//! Directional lookups over a [`BijectionMap`], without iteration.

use core::fmt;
use core::iter::FromIterator;

use alloc::collections::BTreeMap;

use crate::error::Result;
use crate::index::SlotIndex;
use crate::map::BijectionMap;

/// A [`BijectionMap`] facade for call sites that look up one direction at a
/// time: value by key, or key by value.
///
/// # Examples
///
/// ```
/// use bijection_map::BijectionKvMap;
///
/// let mut ops: BijectionKvMap<&str, char> = [("add", '+'), ("sub", '-')].into_iter().collect();
///
/// assert_eq!(ops.value_for_key(&"sub"), Some(&'-'));
/// assert_eq!(ops.key_for_value(&'+'), Some(&"add"));
///
/// assert!(!ops.insert("plus", '+'));
/// assert!(ops.erase_value(&'+'));
/// assert!(ops.insert("plus", '+'));
/// ```
pub struct BijectionKvMap<K, V, KI = BTreeMap<K, usize>, VI = BTreeMap<V, usize>> {
    inner: BijectionMap<K, V, KI, VI>,
}

impl<K, V> BijectionKvMap<K, V> {
    /// Creates an empty `BijectionKvMap` with ordered indices.
    #[inline]
    pub const fn new() -> Self {
        Self { inner: BijectionMap::new() }
    }

    /// Creates an empty `BijectionKvMap` with room for `n` pairs.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self { inner: BijectionMap::with_capacity(n) }
    }
}

impl<K, V, KI, VI> BijectionKvMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    /// Creates an empty `BijectionKvMap` over the given index backends.
    ///
    /// Any bindings already in `keys` or `values` are cleared.
    #[inline]
    pub fn with_indices(keys: KI, values: VI) -> Self {
        Self { inner: BijectionMap::with_indices(keys, values) }
    }

    /// Inserts a pair. Returns `false` if the key or the value is taken.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.inner.insert(key, value).is_some()
    }

    /// Erases the pair bound to `key`.
    #[inline]
    pub fn erase_key(&mut self, key: &K) -> bool {
        self.inner.erase_key(key)
    }

    /// Erases the pair bound to `value`.
    #[inline]
    pub fn erase_value(&mut self, value: &V) -> bool {
        match self.inner.find_value(value) {
            Some(id) => self.inner.erase_id(id),
            None => false,
        }
    }

    /// Returns the slot id bound to `key`.
    #[inline]
    pub fn find_key(&self, key: &K) -> Option<usize> {
        self.inner.find_key(key)
    }

    /// Returns the slot id bound to `value`.
    #[inline]
    pub fn find_value(&self, value: &V) -> Option<usize> {
        self.inner.find_value(value)
    }

    /// Returns the value bound to `key`.
    #[inline]
    pub fn value_for_key(&self, key: &K) -> Option<&V> {
        let id = self.inner.find_key(key)?;
        self.inner.get_value(id).ok()
    }

    /// Returns the key bound to `value`.
    #[inline]
    pub fn key_for_value(&self, value: &V) -> Option<&K> {
        let id = self.inner.find_value(value)?;
        self.inner.get_key(id).ok()
    }

    /// Returns `true` if `key` is bound.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns `true` if `value` is bound.
    #[inline]
    pub fn contains_value(&self, value: &V) -> bool {
        self.inner.contains_value(value)
    }

    /// Empties the map. Ids start from 0 again afterwards.
    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Reserves capacity for at least `additional` more pairs.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.inner.reserve(additional)
    }
}

impl<K, V, KI, VI> BijectionKvMap<K, V, KI, VI> {
    /// Returns the pair stored at slot `id`, stale or not.
    #[inline]
    pub fn get(&self, id: usize) -> Result<(&K, &V)> {
        self.inner.get(id)
    }

    /// Slot high-water mark, as [`BijectionMap::len`].
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no slot has ever been allocated (or since `clear`).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of live pairs.
    #[inline(always)]
    pub fn live_len(&self) -> usize {
        self.inner.live_len()
    }
}

impl<K, V, KI, VI> FromIterator<(K, V)> for BijectionKvMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K> + Default,
    VI: SlotIndex<V> + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

impl<K, V, KI, VI> Extend<(K, V)> for BijectionKvMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.inner.extend(iter)
    }
}

impl<K, V, KI, VI> Default for BijectionKvMap<K, V, KI, VI>
where
    KI: Default,
    VI: Default,
{
    #[inline]
    fn default() -> Self {
        Self { inner: BijectionMap::default() }
    }
}

impl<K, V, KI, VI> Clone for BijectionKvMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: Clone,
    VI: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<K, V, KI, VI> PartialEq for BijectionKvMap<K, V, KI, VI>
where
    K: PartialEq,
    V: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V, KI, VI> Eq for BijectionKvMap<K, V, KI, VI>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, KI, VI> fmt::Debug for BijectionKvMap<K, V, KI, VI>
where
    K: fmt::Debug + Clone,
    V: fmt::Debug + Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
