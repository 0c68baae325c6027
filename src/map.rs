//! The bijection map: a slot store with a key index and a value index.

use core::cmp::Ordering;
use core::iter::{FromIterator, FusedIterator};
use core::{fmt, mem, ptr};

use alloc::collections::BTreeMap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::index::SlotIndex;
use crate::store::SlotStore;

/// A key-value pair stored in a `BijectionMap` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot<K, V> {
    key: K,
    value: V,
}

impl<K, V> Slot<K, V> {
    #[inline(always)]
    const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline(always)]
    const fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

/// A one-to-one map between keys and values with stable slot ids.
///
/// Every pair lives in a slot addressed by a `usize` id. Both sides are
/// indexed, so a pair can be found from its key or from its value. No two
/// live slots share a key, and no two live slots share a value.
///
/// Erasing a pair unbinds it from both indices and queues its id for reuse;
/// ids are recycled oldest-first before the store grows. The payload of an
/// erased slot is left in place, so [`len`](Self::len), [`get`](Self::get)
/// and [`iter`](Self::iter) still see it until the id is handed out again.
/// Use [`is_live`](Self::is_live) to tell the two apart.
pub struct BijectionMap<K, V, KI = BTreeMap<K, usize>, VI = BTreeMap<V, usize>> {
    store: SlotStore<Slot<K, V>>,
    keys: KI, // key -> slot id
    values: VI, // value -> slot id
}

impl<K, V> BijectionMap<K, V> {
    /// Creates an empty `BijectionMap` with ordered indices.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let mut map = BijectionMap::new();
    /// assert_eq!(map.insert("a", 1), Some(0));
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            store: SlotStore::new(),
            keys: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Creates an empty `BijectionMap` with room for `n` slots.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            store: SlotStore::with_capacity(n),
            keys: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }
}

impl<K, V, KI, VI> BijectionMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    /// Creates an empty `BijectionMap` over the given index backends.
    ///
    /// Any bindings already in `keys` or `values` are cleared; only the
    /// backends themselves (hasher, allocation) are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::HashBijectionMap;
    ///
    /// let mut map: HashBijectionMap<&str, u32> = HashBijectionMap::with_indices(
    ///     Default::default(),
    ///     Default::default(),
    /// );
    /// map.insert("x", 9);
    /// assert_eq!(map.find_value(&9), Some(0));
    /// ```
    #[inline]
    pub fn with_indices(mut keys: KI, mut values: VI) -> Self {
        keys.clear();
        values.clear();
        Self {
            store: SlotStore::new(),
            keys,
            values,
        }
    }

    /// Inserts a pair, returning the slot id it was stored at.
    ///
    /// Returns `None` and leaves the map untouched if `key` or `value` is
    /// already bound, whatever it is bound to.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let mut map = BijectionMap::new();
    /// assert_eq!(map.insert("a", 1), Some(0));
    /// assert_eq!(map.insert("a", 2), None); // key taken
    /// assert_eq!(map.insert("b", 1), None); // value taken
    /// assert_eq!(map.insert("b", 2), Some(1));
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn insert(&mut self, key: K, value: V) -> Option<usize> {
        if self.keys.slot(&key).is_some() || self.values.slot(&value).is_some() {
            trace!("insert rejected: key or value already bound");
            return None
        }

        Some(self.bind_new(key, value))
    }

    /// Inserts a pair, or rebinds one side of an existing pair in place.
    ///
    /// * If `key` is bound, its slot gets `value`.
    /// * Otherwise, if `value` is bound, its slot gets `key`.
    /// * Otherwise this is [`insert`](Self::insert).
    ///
    /// The counterpart that gets replaced is unbound from its index, so both
    /// indices keep pointing at the rebound slot. Returns `None` without
    /// changing anything if `key` and `value` are bound to two different
    /// slots, since merging them would break the one-to-one property.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let mut map = BijectionMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// assert_eq!(map.insert_or_update("a", 10), Some(0));
    /// assert_eq!(map.find_value(&1), None);
    /// assert_eq!(map.find_value(&10), Some(0));
    ///
    /// assert_eq!(map.insert_or_update("z", 2), Some(1));
    /// assert_eq!(map.find_key(&"b"), None);
    ///
    /// assert_eq!(map.insert_or_update("a", 2), None); // 2 belongs to "z"
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn insert_or_update(&mut self, key: K, value: V) -> Option<usize> {
        let key_slot = self.keys.slot(&key);
        let value_slot = self.values.slot(&value);

        match (key_slot, value_slot) {
            (Some(a), Some(b)) if a == b => Some(a),
            (Some(a), Some(b)) => {
                trace!(key_slot = a, value_slot = b, "update rejected: sides bound to different slots");
                None
            }
            (Some(id), None) => {
                let slot = self.slot_mut(id);
                let old = mem::replace(&mut slot.value, value.clone());
                self.values.unbind(&old);
                self.values.bind(value, id);
                trace!(id, side = "value", "slot rebound");
                Some(id)
            }
            (None, Some(id)) => {
                let slot = self.slot_mut(id);
                let old = mem::replace(&mut slot.key, key.clone());
                self.keys.unbind(&old);
                self.keys.bind(key, id);
                trace!(id, side = "key", "slot rebound");
                Some(id)
            }
            (None, None) => Some(self.bind_new(key, value)),
        }
    }

    /// Erases the pair bound to `key`. Returns `false` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let mut map = BijectionMap::new();
    /// map.insert("a", 1);
    /// assert!(map.erase_key(&"a"));
    /// assert!(!map.erase_key(&"a"));
    /// assert_eq!(map.find_value(&1), None);
    /// assert_eq!(map.len(), 1); // the slot is still allocated
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn erase_key(&mut self, key: &K) -> bool {
        match self.keys.slot(key) {
            Some(id) => {
                self.release(id);
                true
            }
            None => false,
        }
    }

    /// Erases the pair stored at slot `id`.
    ///
    /// Returns `false` if `id` was never allocated or is already free.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn erase_id(&mut self, id: usize) -> bool {
        if !self.is_live(id) {
            return false
        }

        self.release(id);
        true
    }

    /// Returns the slot id bound to `key`.
    #[inline]
    pub fn find_key(&self, key: &K) -> Option<usize> {
        self.keys.slot(key)
    }

    /// Returns the slot id bound to `value`.
    #[inline]
    pub fn find_value(&self, value: &V) -> Option<usize> {
        self.values.slot(value)
    }

    /// Returns `true` if `key` is bound to a live slot.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_key(key).is_some()
    }

    /// Returns `true` if `value` is bound to a live slot.
    #[inline]
    pub fn contains_value(&self, value: &V) -> bool {
        self.find_value(value).is_some()
    }

    /// Returns `true` if slot `id` currently holds a pair, i.e. it has been
    /// allocated and not erased since.
    #[inline]
    pub fn is_live(&self, id: usize) -> bool {
        self.store
            .get(id)
            .is_some_and(|slot| self.keys.slot(&slot.key) == Some(id))
    }

    /// Empties the map. Ids start from 0 again afterwards.
    #[inline]
    pub fn clear(&mut self) {
        self.store.clear();
        self.keys.clear();
        self.values.clear();
    }

    /// Reserves capacity for at least `additional` more slots.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.store.reserve(additional);
        self.keys.reserve(additional);
        self.values.reserve(additional);
    }

    fn bind_new(&mut self, key: K, value: V) -> usize {
        let id = self.store.allocate(Slot::new(key.clone(), value.clone()));
        self.keys.bind(key, id);
        self.values.bind(value, id);
        id
    }

    fn release(&mut self, id: usize) {
        if let Some(slot) = self.store.get(id) {
            self.keys.unbind(&slot.key);
            self.values.unbind(&slot.value);
            self.store.release(id);
        }
    }

    #[inline(always)]
    fn slot_mut(&mut self, id: usize) -> &mut Slot<K, V> {
        // ids handed to this come straight from our own indices
        match self.store.get_mut(id) {
            Some(slot) => slot,
            None => unreachable!("index points past the slot store"),
        }
    }
}

impl<K, V, KI, VI> BijectionMap<K, V, KI, VI> {
    /// Returns the pair stored at slot `id`.
    ///
    /// Erased slots still return their last pair until the id is reused.
    ///
    /// # Errors
    ///
    /// [`Error::SlotOutOfBounds`] if `id >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::{BijectionMap, Error};
    ///
    /// let mut map = BijectionMap::new();
    /// let id = map.insert("a", 1).unwrap();
    /// assert_eq!(map.get(id), Ok((&"a", &1)));
    /// assert_eq!(map.get(5), Err(Error::SlotOutOfBounds { id: 5, len: 1 }));
    /// ```
    #[inline]
    pub fn get(&self, id: usize) -> Result<(&K, &V)> {
        self.slot(id).map(Slot::pair)
    }

    /// Returns the key stored at slot `id`.
    #[inline]
    pub fn get_key(&self, id: usize) -> Result<&K> {
        self.slot(id).map(|slot| &slot.key)
    }

    /// Returns the value stored at slot `id`.
    #[inline]
    pub fn get_value(&self, id: usize) -> Result<&V> {
        self.slot(id).map(|slot| &slot.value)
    }

    /// Returns the number of slots ever allocated.
    ///
    /// This is a high-water mark: erased slots still count until they are
    /// reused. See [`live_len`](Self::live_len) for the number of pairs.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no slot has ever been allocated (or since `clear`).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Returns the number of live pairs.
    #[inline(always)]
    pub fn live_len(&self) -> usize {
        self.store.live_len()
    }

    /// Returns the id the next successful insert will use: the oldest freed
    /// id if any, else `len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let mut map = BijectionMap::new();
    /// map.insert('a', 1);
    /// map.insert('b', 2);
    /// assert_eq!(map.next_id(), 2);
    /// map.erase_key(&'a');
    /// assert_eq!(map.next_id(), 0);
    /// ```
    #[inline]
    pub fn next_id(&self) -> usize {
        self.store.next_id()
    }

    /// Returns the freed ids in the order they will be reused.
    #[inline]
    pub fn free_ids(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.store.free_ids()
    }

    /// Returns an iterator over every allocated slot in id order.
    ///
    /// Erased slots are visited too, with their stale pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use bijection_map::BijectionMap;
    ///
    /// let map: BijectionMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let items: Vec<_> = map.iter().collect();
    /// assert_eq!(items, vec![(0, &"a", &1), (1, &"b", &2)]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let slots = self.store.as_slice();
        Iter {
            slots,
            front: 0,
            back: slots.len(),
        }
    }

    /// Returns a random-access cursor positioned at slot `id`.
    ///
    /// `cursor(self.len())` is the end position; larger ids clamp to it.
    #[inline]
    pub fn cursor(&self, id: usize) -> Cursor<'_, K, V> {
        let slots = self.store.as_slice();
        Cursor {
            slots,
            pos: id.min(slots.len()),
        }
    }

    #[inline]
    fn slot(&self, id: usize) -> Result<&Slot<K, V>> {
        self.store
            .get(id)
            .ok_or_else(|| Error::out_of_bounds(id, self.store.len()))
    }
}

/// Borrowing iterator over all allocated slots in id order.
///
/// Yields `(id, &key, &value)`.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    front: usize,
    back: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (usize, &'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None
        }

        let id = self.front;
        self.front += 1;
        let slot = &self.slots[id];
        Some((id, &slot.key, &slot.value))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None
        }

        self.back -= 1;
        let slot = &self.slots[self.back];
        Some((self.back, &slot.key, &slot.value))
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V, KI, VI> IntoIterator for &'a BijectionMap<K, V, KI, VI> {
    type Item = (usize, &'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A random-access position inside a `BijectionMap`'s slot store.
///
/// Cursors can move by arbitrary offsets and compare by position. A cursor
/// never points past the end position (`len()`): forward moves clamp to it,
/// and backward moves before slot 0 return `None`. Two
/// cursors are equal only if they point into the same map; cursors into
/// different maps are unordered.
///
/// # Examples
///
/// ```
/// use bijection_map::BijectionMap;
///
/// let map: BijectionMap<_, _> = [('a', 1), ('b', 2), ('c', 3)].into_iter().collect();
///
/// let begin = map.cursor(0);
/// let end = map.cursor(map.len());
/// let mid = begin.advance(2);
///
/// assert!(begin < mid && mid < end);
/// assert_eq!(mid.get(), Ok((&'c', &3)));
/// assert_eq!(mid.retreat(1).unwrap().get(), Ok((&'b', &2)));
/// assert_eq!(end.offset_from(&begin), 3);
/// assert!(mid.advance(1) == end);
/// ```
#[derive(Debug)]
pub struct Cursor<'a, K, V> {
    slots: &'a [Slot<K, V>],
    pos: usize,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    /// The slot id this cursor points at.
    #[inline(always)]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` at the end of the slot store.
    #[inline(always)]
    pub const fn is_end(&self) -> bool {
        self.pos == self.slots.len()
    }

    /// Returns the pair at the current position.
    ///
    /// # Errors
    ///
    /// [`Error::SlotOutOfBounds`] at the end.
    #[inline]
    pub fn get(&self) -> Result<(&'a K, &'a V)> {
        self.slots
            .get(self.pos)
            .map(Slot::pair)
            .ok_or_else(|| Error::out_of_bounds(self.pos, self.slots.len()))
    }

    /// Moves forward by `n` slots, stopping at the end.
    #[inline]
    pub fn advance(self, n: usize) -> Self {
        let pos = self.pos.saturating_add(n).min(self.slots.len());
        Self { slots: self.slots, pos }
    }

    /// Moves back by `n` slots, or `None` if that would go before slot 0.
    #[inline]
    pub fn retreat(self, n: usize) -> Option<Self> {
        let pos = self.pos.checked_sub(n)?;
        Some(Self { slots: self.slots, pos })
    }

    /// Moves by a signed offset, or `None` if that would go before slot 0.
    /// Forward moves stop at the end.
    #[inline]
    pub fn offset(self, delta: isize) -> Option<Self> {
        if delta < 0 {
            self.retreat(delta.unsigned_abs())
        } else {
            Some(self.advance(delta.unsigned_abs()))
        }
    }

    /// Signed distance from `origin` to `self`.
    ///
    /// Positions never exceed the slot count, so the distance fits an `isize`.
    #[inline]
    pub const fn offset_from(&self, origin: &Self) -> isize {
        if self.pos >= origin.pos {
            (self.pos - origin.pos) as isize
        } else {
            -((origin.pos - self.pos) as isize)
        }
    }

    /// Iterates from this position to the end of the slot store.
    #[inline]
    pub fn iter(&self) -> Iter<'a, K, V> {
        Iter {
            slots: self.slots,
            front: self.pos,
            back: self.slots.len(),
        }
    }

    #[inline(always)]
    fn same_map(&self, other: &Self) -> bool {
        ptr::eq(self.slots, other.slots)
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_map(other) && self.pos == other.pos
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> PartialOrd for Cursor<'_, K, V> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_map(other) {
            Some(self.pos.cmp(&other.pos))
        } else {
            None
        }
    }
}

impl<K, V, KI, VI> FromIterator<(K, V)> for BijectionMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K> + Default,
    VI: SlotIndex<V> + Default,
{
    /// Inserts the pairs in order. A pair whose key or value is already
    /// taken by an earlier pair is dropped.
    #[cfg_attr(feature = "inline-more", inline)]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, KI, VI> Extend<(K, V)> for BijectionMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(move |(k, v)| _ = self.insert(k, v));
    }
}

impl<K, V, KI, VI> Default for BijectionMap<K, V, KI, VI>
where
    KI: Default,
    VI: Default,
{
    #[inline]
    fn default() -> Self {
        Self {
            store: SlotStore::new(),
            keys: KI::default(),
            values: VI::default(),
        }
    }
}

impl<K, V, KI, VI> Clone for BijectionMap<K, V, KI, VI>
where
    K: Clone,
    V: Clone,
    KI: Clone,
    VI: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

/// Structural equality: same slots (stale payloads included) and the same
/// free-id queue. The indices are fully determined by those two.
impl<K, V, KI, VI> PartialEq for BijectionMap<K, V, KI, VI>
where
    K: PartialEq,
    V: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl<K, V, KI, VI> Eq for BijectionMap<K, V, KI, VI>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, KI, VI> fmt::Debug for BijectionMap<K, V, KI, VI>
where
    K: fmt::Debug + Clone,
    V: fmt::Debug + Clone,
    KI: SlotIndex<K>,
    VI: SlotIndex<V>,
{
    /// Shows live pairs only.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .filter(|&(id, _, _)| self.is_live(id))
                    .map(|(_, k, v)| (k, v)),
            )
            .finish()
    }
}
