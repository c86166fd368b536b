// LinkedHashMap integration suite.
//
// Each test documents what behavior is being verified through the public
// API only. The core invariants exercised:
// - Count: len() equals distinct live keys and the length of a full iteration.
// - Lookup consistency: present keys resolve to their latest value; absent
//   keys give None from find/get and KeyNotFound from at.
// - Uniqueness: duplicate insert is a no-op.
// - Order: iteration follows insertion order, skipping removed entries.
// - Resizing: growth and shrink keep every entry reachable.
use linked_probe_map::{Error, LinkedHashMap};
use std::collections::BTreeSet;

// Test: the map-indexing scenario.
// Verifies: erase removes only the named key; the other keeps its value.
#[test]
fn index_then_erase_scenario() {
    let mut map: LinkedHashMap<&str, i32> = LinkedHashMap::new();
    *map.get_or_insert_default("a") = 1;
    *map.get_or_insert_default("b") = 2;
    map.remove("a");
    assert!(map.find("a").is_none());
    let b = map.find("b").expect("b present");
    assert_eq!(b.value(&map), Some(&2));
    assert_eq!(map.len(), 1);
}

// Test: unique keys policy.
// Verifies: second insert returns None and leaves value and len unchanged.
#[test]
fn duplicate_insert_is_noop() {
    let mut m = LinkedHashMap::new();
    assert!(m.insert("dup".to_string(), 1).is_some());
    assert!(m.insert("dup".to_string(), 2).is_none());
    assert_eq!(m.get("dup"), Some(&1));
    assert_eq!(m.len(), 1);
}

// Test: idempotent erase.
// Verifies: erasing absent keys, or erasing twice, changes nothing.
#[test]
fn erase_is_idempotent() {
    let mut m: LinkedHashMap<i32, i32> = (0..5).map(|i| (i, i * i)).collect();
    assert_eq!(m.remove(&42), None);
    assert_eq!(m.len(), 5);
    assert_eq!(m.remove(&3), Some(9));
    assert_eq!(m.remove(&3), None);
    assert_eq!(m.len(), 4);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 4]);
}

// Test: insertion order.
// Verifies: pure inserts iterate in insertion order, forward and backward.
#[test]
fn iteration_follows_insertion_order() {
    let words = ["pear", "apple", "fig", "kiwi", "banana", "cherry"];
    let mut m = LinkedHashMap::new();
    for (i, w) in words.iter().enumerate() {
        m.insert(*w, i);
    }
    let keys: Vec<&str> = m.keys().copied().collect();
    assert_eq!(keys, words);
    let values: Vec<usize> = m.values().copied().collect();
    assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    let back: Vec<&str> = m.iter().rev().map(|(k, _)| *k).collect();
    assert_eq!(back, vec!["cherry", "banana", "kiwi", "fig", "apple", "pear"]);
    assert_eq!(m.iter().len(), words.len());
}

// Test: removing and re-inserting moves a key to the back.
#[test]
fn reinsert_after_erase_appends() {
    let mut m = LinkedHashMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    m.remove(&1);
    m.insert(1, 'z');
    assert_eq!(
        m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        vec![(2, 'b'), (3, 'c'), (1, 'z')]
    );
}

// Test: resize correctness on 1000 sequential keys.
// Verifies: 1000 distinct entries, len 1000, every key resolvable.
#[test]
fn thousand_sequential_keys() {
    let mut m = LinkedHashMap::new();
    for k in 0..1000u32 {
        assert!(m.insert(k, k * 2).is_some());
    }
    assert_eq!(m.len(), 1000);
    // 17 doubled until 1000 entries fit at MAX_LOAD.
    assert_eq!(m.capacity(), 17 * 128);
    let seen: BTreeSet<u32> = m.keys().copied().collect();
    assert_eq!(seen.len(), 1000);
    assert_eq!(m.iter().count(), 1000);
    assert!(m.keys().copied().eq(0..1000));
    for k in 0..1000u32 {
        assert_eq!(m.at(&k), Ok(&(k * 2)));
    }
}

// Test: shrink-then-grow round trip.
// Verifies: erasing 95 of 100 keys shrinks to the floor; re-inserting
// restores all 100.
#[test]
fn shrink_then_grow_round_trip() {
    let mut m = LinkedHashMap::new();
    for k in 0..100 {
        m.insert(k, format!("v{k}"));
    }
    let grown = m.capacity();
    for k in 0..95 {
        assert_eq!(m.remove(&k), Some(format!("v{k}")));
    }
    assert_eq!(m.len(), 5);
    assert!(m.capacity() < grown);
    assert_eq!(m.capacity(), LinkedHashMap::<i32, String>::DEFAULT_CAPACITY);

    for k in 0..95 {
        assert!(m.insert(k, format!("w{k}")).is_some());
    }
    assert_eq!(m.len(), 100);
    for k in 0..100 {
        assert!(m.find(&k).is_some(), "key {k} missing after round trip");
    }
    assert_eq!(m.get(&96).map(String::as_str), Some("v96"));
    assert_eq!(m.get(&3).map(String::as_str), Some("w3"));
}

// Test: the single error kind.
// Verifies: at() on an absent key returns KeyNotFound with a readable message.
#[test]
fn at_reports_key_not_found() {
    let m: LinkedHashMap<String, i32> = LinkedHashMap::new();
    let err = m.at("missing").unwrap_err();
    assert_eq!(err, Error::KeyNotFound);
    assert_eq!(err.to_string(), "key does not exist");
}

#[test]
#[should_panic(expected = "key does not exist")]
fn index_operator_panics_on_absent_key() {
    let m: LinkedHashMap<&str, i32> = LinkedHashMap::from([("a", 1)]);
    let _missing: i32 = m["b"];
}

// Test: lookup consistency after updates through every mutable path.
#[test]
fn latest_assigned_value_wins() {
    let mut m: LinkedHashMap<&str, i32> = LinkedHashMap::new();
    m.insert("k", 1);
    *m.get_mut("k").unwrap() = 2;
    assert_eq!(m["k"], 2);
    *m.get_or_insert_default("k") += 1;
    assert_eq!(m.get("k"), Some(&3));
    for (_, v) in m.iter_mut() {
        *v *= 10;
    }
    assert_eq!(m.get_key_value("k"), Some((&"k", &30)));
    for v in m.values_mut() {
        *v += 1;
    }
    assert_eq!(m.at("k"), Ok(&31));
}

// Test: construction paths agree.
// Verifies: FromIterator, From<array> and Extend keep the first occurrence
// of a duplicated key and its position.
#[test]
fn constructors_keep_first_occurrence() {
    let pairs = vec![("x", 1), ("y", 2), ("x", 3), ("z", 4)];
    let a: LinkedHashMap<&str, i32> = pairs.clone().into_iter().collect();
    let b = LinkedHashMap::from([("x", 1), ("y", 2), ("x", 3), ("z", 4)]);
    let mut c = LinkedHashMap::new();
    c.extend(pairs);
    for m in [&a, &b, &c] {
        assert_eq!(
            m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            vec![("x", 1), ("y", 2), ("z", 4)]
        );
    }
}

// Test: deep copy.
// Verifies: a clone is independent of its source; clone_from replaces the
// target's contents.
#[test]
fn clone_is_independent() {
    let mut src: LinkedHashMap<String, Vec<u8>> = LinkedHashMap::new();
    src.insert("a".into(), vec![1]);
    src.insert("b".into(), vec![2]);
    let mut copy = src.clone();
    copy.get_mut("a").unwrap().push(9);
    copy.remove("b");
    assert_eq!(src.get("a"), Some(&vec![1]));
    assert!(src.contains_key("b"));

    let mut target = LinkedHashMap::new();
    target.insert("old".to_string(), vec![0]);
    target.clone_from(&src);
    assert!(!target.contains_key("old"));
    assert_eq!(target.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
}

// Test: clear resets to an empty map at the floor capacity.
#[test]
fn clear_resets() {
    let mut m: LinkedHashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 17);
    assert!(m.get(&1).is_none());
    m.insert(1, 1);
    assert_eq!(m.len(), 1);
}

// Test: owning iteration drains in order from both ends.
#[test]
fn into_iter_in_order() {
    let m = LinkedHashMap::from([(1, "one"), (2, "two"), (3, "three"), (4, "four")]);
    let mut it = m.into_iter();
    assert_eq!(it.len(), 4);
    assert_eq!(it.next(), Some((1, "one")));
    assert_eq!(it.next_back(), Some((4, "four")));
    assert_eq!(it.collect::<Vec<_>>(), vec![(2, "two"), (3, "three")]);
}

// Test: iterating via references uses the same order as iter()/iter_mut().
#[test]
fn into_iterator_for_references() {
    let mut m = LinkedHashMap::from([("a", 1), ("b", 2)]);
    for (_, v) in &mut m {
        *v += 1;
    }
    let mut seen = Vec::new();
    for (k, v) in &m {
        seen.push((*k, *v));
    }
    assert_eq!(seen, vec![("a", 2), ("b", 3)]);
}

// Test: the configuration constants and the hasher accessor.
#[test]
fn constants_and_hasher() {
    type M = LinkedHashMap<u8, u8>;
    assert_eq!(M::MAX_LOAD, 2);
    assert_eq!(M::MIN_LOAD, 6);
    assert_eq!(M::DEFAULT_CAPACITY, 17);
    assert_eq!(linked_probe_map::sizing::DEFAULT_CAPACITY, 17);

    let m = M::new();
    assert_eq!(m.capacity(), M::DEFAULT_CAPACITY);
    use std::hash::BuildHasher;
    let h = m.hasher();
    assert_eq!(h.hash_one(7u8), h.hash_one(7u8));
}

#[test]
fn debug_prints_in_insertion_order() {
    let m = LinkedHashMap::from([("b", 2), ("a", 1)]);
    assert_eq!(format!("{m:?}"), r#"{"b": 2, "a": 1}"#);
}
