//! linked-probe-map: a single-threaded hash map that iterates in insertion
//! order, built from an open-addressing index over an arena-backed linked
//! list.
//!
//! ```
//! use linked_probe_map::LinkedHashMap;
//!
//! let mut map = LinkedHashMap::new();
//! *map.get_or_insert_default("a") = 1;
//! *map.get_or_insert_default("b") = 2;
//! map.remove("a");
//! assert!(map.find("a").is_none());
//! assert_eq!(map.get("b"), Some(&2));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - `ElementStore<K, V>`: owns every key and value. Nodes sit in a
//!     `slotmap::DenseSlotMap` and are chained into a doubly-linked list in
//!     insertion order. A node's arena key never changes while it lives.
//!   - `IndexTable`: a flat array of `Empty | Occupied(arena key) |
//!     Tombstone` slots resolved by linear probing with wraparound from
//!     `hash % capacity`.
//!   - `sizing`: integer load thresholds that decide when the index grows,
//!     shrinks or is rebuilt in place to purge tombstones.
//!   - `LinkedHashMap<K, V, S>`: public API tying the three together.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no atomics.
//! - Unique keys: inserting a present key is a no-op that returns `None`.
//! - O(1) average insert, lookup and removal; iteration follows insertion
//!   order, excluding removed entries.
//! - No `unsafe`.
//!
//! Probing and tombstones
//! - Removal turns the slot into a tombstone so chains passing through it
//!   stay connected. Probes stop only at `Empty`.
//! - Insertion probes until it finds the key or an `Empty` slot, then places
//!   the new entry in the first tombstone seen (or that `Empty` slot).
//! - Tombstones count towards the load: `(len + tombstones) * MAX_LOAD` never
//!   exceeds the capacity, so at least half of the slots are `Empty` and
//!   every probe terminates.
//!
//! Hasher and rehashing invariants
//! - Each node caches its `u64` hash. Index rebuilds place nodes from the
//!   cached hash in insertion order and never call `K: Hash` or `K: Eq`.
//! - A rebuild only touches the index; nodes stay in the arena, so handles
//!   remain valid across grow, shrink and purge.
//!
//! Notes and non-goals
//! - No thread safety, persistence, custom allocators or key ordering other
//!   than insertion order.
//! - No equality or ordering between maps.
//! - `at` is the only fallible accessor; every other absent-key case is
//!   reported as `None`.

mod element_store;
mod error;
mod index_table;
pub mod linked_hash_map;
mod linked_hash_map_proptest;
pub mod sizing;

// Public surface
pub use error::Error;
pub use linked_hash_map::{Handle, LinkedHashMap};

/// Result alias for the checked accessors.
pub type Result<T> = core::result::Result<T, Error>;
