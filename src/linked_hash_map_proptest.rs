#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can check
// internal invariants (index/arena agreement, load bound) after every step.

use crate::linked_hash_map::{Handle, LinkedHashMap};
use crate::Error;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertWith(usize, i32),
    Remove(usize),
    RemoveHandle(usize),
    Find(usize),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    IndexDefault(usize, i32),
    Iterate,
    CloneCheck,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario(
    pool_len: std::ops::RangeInclusive<usize>,
    ops_len: std::ops::Range<usize>,
) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", pool_len).prop_flat_map(move |pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertWith(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            1 => idx.clone().prop_map(OpI::Find),
            1 => idx.clone().prop_map(OpI::At),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::IndexDefault(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::CloneCheck),
        ];
        proptest::collection::vec(op, ops_len.clone()).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Model: std HashMap for contents plus a Vec for insertion order.
// Invariants exercised across random operation sequences:
// - Duplicate inserts are no-ops returning None; values stay unchanged.
// - `find`/`contains_key`/`get` parity with the model; `at` errors iff absent.
// - Handles stay stable for live entries across resizes and die on removal.
// - `iter` yields exactly the model's entries in insertion order.
// - `len`/`is_empty` parity and internal invariants after every op.
fn run_scenario<S>(
    mut sut: LinkedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut order: Vec<Key> = Vec::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                match sut.insert(k.clone(), v) {
                    Some(h) => {
                        prop_assert!(!already, "insert must be a no-op on duplicate");
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k.clone(), v);
                        order.push(k);
                    }
                    None => prop_assert!(already, "None only when key exists"),
                }
            }
            OpI::InsertWith(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let mut ran = false;
                let res = sut.insert_with(k.clone(), || {
                    ran = true;
                    v
                });
                prop_assert_eq!(ran, !already, "default must run iff key absent");
                match res {
                    Some(h) => {
                        live.insert(k.clone(), h);
                        model.insert(k.clone(), v);
                        order.push(k);
                    }
                    None => prop_assert!(already),
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove_entry(&k);
                match model.remove(&k) {
                    Some(mv) => {
                        prop_assert_eq!(removed, Some((k.clone(), mv)));
                        order.retain(|o| o != &k);
                        if let Some(h) = live.remove(&k) {
                            stale.push(h);
                        }
                    }
                    None => prop_assert!(removed.is_none(), "erase of absent key is a no-op"),
                }
                // Second erase of the same key is always a no-op.
                prop_assert!(sut.remove(&k).is_none());
            }
            OpI::RemoveHandle(i) => {
                let k = key_from(pool, i);
                if let Some(h) = live.remove(&k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert!(kk == k);
                    prop_assert_eq!(Some(vv), model.remove(&k));
                    order.retain(|o| o != &k);
                    stale.push(h);
                }
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let found = sut.find(&k);
                prop_assert_eq!(found.is_some(), model.contains_key(&k));
                if let Some(h) = found {
                    prop_assert_eq!(Some(&h), live.get(&k), "handle must be stable");
                    prop_assert_eq!(h.value(&sut), model.get(&k));
                }
            }
            OpI::At(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(mv) => prop_assert_eq!(sut.at(&k), Ok(mv)),
                    None => prop_assert_eq!(sut.at(&k), Err(Error::KeyNotFound)),
                }
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence mismatch"),
                }
            }
            OpI::IndexDefault(i, d) => {
                let k = key_from(pool, i);
                let v = sut.get_or_insert_default(k.clone());
                *v = v.wrapping_add(d);
                if !model.contains_key(&k) {
                    order.push(k.clone());
                    if let Some(h) = sut.find(&k) {
                        live.insert(k.clone(), h);
                    }
                }
                let mv = model.entry(k).or_default();
                *mv = mv.wrapping_add(d);
            }
            OpI::Iterate => {
                let keys: Vec<Key> = sut.keys().cloned().collect();
                prop_assert_eq!(&keys, &order);
                for (k, v) in sut.iter() {
                    prop_assert_eq!(Some(v), model.get(k));
                }
                let rev: Vec<Key> = sut.keys().rev().cloned().collect();
                let mut expected_rev = order.clone();
                expected_rev.reverse();
                prop_assert_eq!(rev, expected_rev);
            }
            OpI::CloneCheck => {
                let c = sut.clone();
                c.assert_invariants();
                let ck: Vec<Key> = c.keys().cloned().collect();
                prop_assert_eq!(&ck, &order);
                prop_assert!(c.capacity() <= sut.capacity());
            }
        }

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none(), "stale handle must not resolve");
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.assert_invariants();
    }

    let drained: Vec<(Key, i32)> = sut.into_iter().collect();
    let expected: Vec<(Key, i32)> = order.iter().map(|k| (k.clone(), model[k])).collect();
    prop_assert_eq!(drained, expected);
    Ok(())
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(1..=8, 1..60)) {
        run_scenario(LinkedHashMap::new(), &pool, ops)?;
    }

    // Worst-case collisions: every key shares one home slot, so every
    // lookup walks the whole chain through tombstones.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(1..=8, 1..60)) {
        run_scenario(LinkedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    // Larger pools push the table through several grow/shrink cycles.
    #[test]
    fn prop_state_machine_across_resizes((pool, ops) in arb_scenario(16..=64, 100..400)) {
        run_scenario(LinkedHashMap::new(), &pool, ops)?;
    }
}
