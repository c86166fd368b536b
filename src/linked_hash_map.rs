//! LinkedHashMap: insertion-ordered map over a linear-probing index with
//! tombstones.

use crate::element_store::{self, ElementStore};
use crate::error::Error;
use crate::index_table::{IndexTable, Probe};
use crate::sizing;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::ops::Index;
use slotmap::DefaultKey;
use std::collections::hash_map::RandomState;

/// Stable reference to one entry.
///
/// A handle stays valid until its entry is removed; index rebuilds (grow,
/// shrink, tombstone purge) never invalidate it. Handles are generational,
/// so a handle to a removed entry never resolves to a later one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    /// The entry's key, or `None` if the entry has been removed.
    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a K> {
        map.store.get(self.0).map(|n| &n.key)
    }

    /// The entry's value, or `None` if the entry has been removed.
    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a V> {
        map.store.get(self.0).map(|n| &n.value)
    }

    /// Mutable access to the entry's value, or `None` if the entry has been
    /// removed.
    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Option<&'a mut V> {
        map.store.get_mut(self.0).map(|n| &mut n.value)
    }
}

/// A hash map that iterates in insertion order.
///
/// Entries live in an arena-backed doubly-linked list; an open-addressing
/// table of arena keys resolves lookups by linear probing. Removed slots
/// become tombstones until the table is rebuilt. The table grows, shrinks or
/// purges tombstones synchronously inside `insert`/`remove` according to
/// [`MAX_LOAD`](Self::MAX_LOAD), [`MIN_LOAD`](Self::MIN_LOAD) and
/// [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY).
pub struct LinkedHashMap<K, V, S = RandomState> {
    hasher: S,
    index: IndexTable,
    store: ElementStore<K, V>,
}

impl<K, V> LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// An empty map with the default hasher and capacity.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V, S> Default for LinkedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    /// Grow threshold numerator.
    pub const MAX_LOAD: usize = sizing::MAX_LOAD;
    /// Shrink threshold numerator.
    pub const MIN_LOAD: usize = sizing::MIN_LOAD;
    /// Initial and minimum index capacity.
    pub const DEFAULT_CAPACITY: usize = sizing::DEFAULT_CAPACITY;

    /// An empty map that hashes keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: IndexTable::with_capacity(sizing::DEFAULT_CAPACITY),
            store: ElementStore::new(),
        }
    }

    /// The hashing strategy this map was built with.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the map has no live entries.
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Number of slots in the index table.
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Drop every entry and every tombstone and return to the default capacity.
    pub fn clear(&mut self) {
        log::trace!(
            "clearing {} entries at capacity {}",
            self.len(),
            self.capacity()
        );
        self.store.clear();
        self.index.reset(sizing::DEFAULT_CAPACITY);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.store.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Rebuild the index at `capacity` from the stored hashes, in insertion
    /// order. Entries stay where they are in the arena.
    fn rehash(&mut self, capacity: usize) {
        log::debug!(
            "rehashing index: capacity {} -> {}, {} entries, {} tombstones purged",
            self.index.capacity(),
            capacity,
            self.store.len(),
            self.index.tombstones()
        );
        self.index.reset(capacity);
        for (k, node) in self.store.iter() {
            let pos = self.index.first_free(node.hash);
            self.index.occupy(pos, k);
        }
        debug_assert_eq!(self.index.occupied(), self.store.len());
    }

    fn reserve_one(&mut self) {
        if let Some(capacity) =
            sizing::before_insert(self.len(), self.index.tombstones(), self.index.capacity())
        {
            self.rehash(capacity);
        }
    }

    fn shrink_for_erase(&mut self) {
        if let Some(capacity) = sizing::before_erase(self.len(), self.index.capacity()) {
            self.rehash(capacity);
        }
    }

    /// Append an entry whose key is known not to be present.
    fn push_unique(&mut self, key: K, value: V, hash: u64) {
        self.reserve_one();
        let pos = self.index.first_free(hash);
        let node = self.store.push_back(key, value, hash);
        self.index.occupy(pos, node);
    }

    /// Copy `source`'s entries in order, reusing its cached hashes.
    fn extend_unique_from(&mut self, source: &Self)
    where
        K: Clone,
        V: Clone,
    {
        for (_, node) in source.store.iter() {
            self.push_unique(node.key.clone(), node.value.clone(), node.hash);
        }
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Slot position and arena key of the entry for `q`.
    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let store = &self.store;
        self.index.find(hash, |k| {
            store
                .get(k)
                .is_some_and(|n| n.hash == hash && n.key.borrow() == q)
        })
    }

    /// Grow if needed, then either find `key` (`Err` with the existing node)
    /// or append a new entry built by `make_value` (`Ok` with the new node).
    fn insert_hashed<F>(&mut self, key: K, hash: u64, make_value: F) -> Result<DefaultKey, DefaultKey>
    where
        F: FnOnce() -> V,
    {
        self.reserve_one();
        let store = &self.store;
        let probe = self.index.probe(hash, |k| {
            store.get(k).is_some_and(|n| n.hash == hash && n.key == key)
        });
        match probe {
            Probe::Found(_, node) => Err(node),
            Probe::Vacant(pos) => {
                let node = self.store.push_back(key, make_value(), hash);
                self.index.occupy(pos, node);
                Ok(node)
            }
        }
    }

    /// Insert `key` with `value`.
    ///
    /// Returns the new entry's handle, or `None` if `key` was already present;
    /// in that case the map is unchanged and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> Option<Handle> {
        self.insert_with(key, || value)
    }

    /// Like [`insert`](Self::insert), but `default` only runs when `key` is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> Option<Handle>
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        self.insert_hashed(key, hash, default).ok().map(Handle)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.locate(hash, q).map(|(_, node)| Handle(node))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find(q)?.0;
        self.store.get(node).map(|n| (&n.key, &n.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find(q)?.0;
        self.store.get_mut(node).map(|n| &mut n.value)
    }

    /// Checked lookup: the value for `q` or [`Error::KeyNotFound`].
    pub fn at<Q>(&self, q: &Q) -> crate::Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    /// Mutable access to the value for `key`, inserting `V::default()` first
    /// if it is absent. Only the insertion can trigger growth.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let hash = self.make_hash(&key);
        let node = match self.locate(hash, &key) {
            Some((_, node)) => node,
            None => match self.insert_hashed(key, hash, V::default) {
                Ok(node) | Err(node) => node,
            },
        };
        &mut self.store[node].value
    }

    /// Remove `q` and return its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Remove `q` and return the owned key and value. Absent keys are a no-op.
    ///
    /// A shrink, if due, happens before the key is looked up.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.shrink_for_erase();
        let hash = self.make_hash(q);
        let (pos, _) = self.locate(hash, q)?;
        self.take_slot(pos)
    }

    /// Remove the entry `handle` refers to. Stale handles are a no-op.
    pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let hash = self.store.get(handle.0)?.hash;
        self.shrink_for_erase();
        let (pos, _) = self.index.find(hash, |k| k == handle.0)?;
        self.take_slot(pos)
    }

    fn take_slot(&mut self, pos: usize) -> Option<(K, V)> {
        let node = self.index.vacate(pos)?;
        let node = self.store.remove(node)?;
        Some((node.key, node.value))
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Deep copy of the logical entries. The copy gets a fresh index with no
    /// tombstones, sized as if the entries had been inserted one by one.
    fn clone(&self) -> Self {
        let mut map = Self::with_hasher(self.hasher.clone());
        map.extend_unique_from(self);
        map
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.hasher = source.hasher.clone();
        self.extend_unique_from(source);
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics with [`Error::KeyNotFound`] if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts each pair in order; later duplicates of a key are ignored.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            let _ = self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

/// Iterator over `(&K, &V)` in insertion order.
pub struct Iter<'a, K, V> {
    inner: element_store::Iter<'a, K, V>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, n)| (&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, n)| (&n.key, &n.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// Iterator over `(&K, &mut V)` in insertion order.
pub struct IterMut<'a, K, V> {
    inner: element_store::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, n)| (&n.key, &mut n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, n)| (&n.key, &mut n.value))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}
impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {}
impl<'a, K, V> FusedIterator for ValuesMut<'a, K, V> {}

/// Owning iterator over `(K, V)` in insertion order.
pub struct IntoIter<K, V> {
    store: ElementStore<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.store.pop_front().map(|n| (n.key, n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.store.len(), Some(self.store.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.store.pop_back().map(|n| (n.key, n.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { store: self.store }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

#[cfg(test)]
impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Panics unless the index, the arena and the sizing state agree.
    pub(crate) fn assert_invariants(&self) {
        let cap = self.index.capacity();
        assert!(cap >= sizing::DEFAULT_CAPACITY, "capacity below floor");
        assert_eq!(self.index.occupied(), self.store.len(), "occupied != len");
        assert_eq!(
            self.index.count_slots(),
            (self.index.occupied(), self.index.tombstones()),
            "slot counters drifted from the slots"
        );
        assert!(
            (self.len() + self.index.tombstones()) * sizing::MAX_LOAD <= cap,
            "load bound violated: len {} tombstones {} capacity {}",
            self.len(),
            self.index.tombstones(),
            cap
        );
        for k in self.index.occupied_keys() {
            assert!(self.store.get(k).is_some(), "slot points at a dead node");
        }
        assert_eq!(self.iter().count(), self.len());
        for (k, node) in self.store.iter() {
            assert_eq!(node.hash, self.make_hash(&node.key), "stale cached hash");
            let found = self.locate(node.hash, &node.key).map(|(_, n)| n);
            assert_eq!(found, Some(k), "key not reachable from its home slot");
        }
    }
}
