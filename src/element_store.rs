//! Element store: an insertion-ordered doubly-linked list whose nodes live in
//! a generational arena.
//!
//! Nodes link to each other by arena key, not by position, so a node keeps
//! its key for as long as it is alive regardless of what happens to its
//! neighbours or to the index table above it. Removed keys are never
//! reissued with the same generation, so a stale key cannot alias a new node.
//!
//! The arena is a `DenseSlotMap`: live nodes are packed, so walking all of
//! them costs the live count even after heavy churn.

use core::ops::{Index, IndexMut};
use slotmap::{DefaultKey, DenseSlotMap, SparseSecondaryMap};

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub(crate) struct ElementStore<K, V> {
    nodes: DenseSlotMap<DefaultKey, Node<K, V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<K, V> ElementStore<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: DenseSlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, k: DefaultKey) -> Option<&Node<K, V>> {
        self.nodes.get(k)
    }

    pub(crate) fn get_mut(&mut self, k: DefaultKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(k)
    }

    /// Append a node at the back of the sequence and return its arena key.
    pub(crate) fn push_back(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let prev = self.tail;
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            prev,
            next: None,
        });
        match prev {
            Some(p) => self.nodes[p].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        k
    }

    /// Unlink and return the node at `k`.
    pub(crate) fn remove(&mut self, k: DefaultKey) -> Option<Node<K, V>> {
        let node = self.nodes.remove(k)?;
        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Arena keys in insertion order.
    pub(crate) fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter { keys: self.keys() }
    }

    /// Mutable iteration in insertion order.
    ///
    /// Every node is borrowed once up front from the packed arena, which
    /// hands out disjoint `&mut` references; the links then only decide the
    /// order in which they are yielded. Both steps are O(len).
    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let front = self.head;
        let back = self.tail;
        let remaining = self.nodes.len();
        let mut nodes = SparseSecondaryMap::with_capacity(remaining);
        for (k, node) in self.nodes.iter_mut() {
            nodes.insert(k, node);
        }
        IterMut {
            nodes,
            front,
            back,
            remaining,
        }
    }

    pub(crate) fn pop_front(&mut self) -> Option<Node<K, V>> {
        let k = self.head?;
        self.remove(k)
    }

    pub(crate) fn pop_back(&mut self) -> Option<Node<K, V>> {
        let k = self.tail?;
        self.remove(k)
    }
}

impl<K, V> Index<DefaultKey> for ElementStore<K, V> {
    type Output = Node<K, V>;

    /// Panics if `k` is stale.
    fn index(&self, k: DefaultKey) -> &Node<K, V> {
        &self.nodes[k]
    }
}

impl<K, V> IndexMut<DefaultKey> for ElementStore<K, V> {
    fn index_mut(&mut self, k: DefaultKey) -> &mut Node<K, V> {
        &mut self.nodes[k]
    }
}

/// Arena keys in insertion order; double-ended.
pub(crate) struct Keys<'a, K, V> {
    nodes: &'a DenseSlotMap<DefaultKey, Node<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Keys {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = DefaultKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.front?;
        self.front = self.nodes.get(k).and_then(|n| n.next);
        self.remaining -= 1;
        Some(k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.back?;
        self.back = self.nodes.get(k).and_then(|n| n.prev);
        self.remaining -= 1;
        Some(k)
    }
}

/// Nodes in insertion order.
pub(crate) struct Iter<'a, K, V> {
    keys: Keys<'a, K, V>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            keys: self.keys.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (DefaultKey, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.keys.next()?;
        self.keys.nodes.get(k).map(|n| (k, n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let k = self.keys.next_back()?;
        self.keys.nodes.get(k).map(|n| (k, n))
    }
}

pub(crate) struct IterMut<'a, K, V> {
    nodes: SparseSecondaryMap<DefaultKey, &'a mut Node<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (DefaultKey, &'a mut Node<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.front?;
        let node = self.nodes.remove(k)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((k, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.back?;
        let node = self.nodes.remove(k)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((k, node))
    }
}
