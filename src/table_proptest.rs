#![cfg(test)]

// Property tests for StrTable kept inside the crate so they can inspect the
// bucket store directly.

use crate::entry::Entry;
use crate::hash::{Fast, Good, StrHash};
use crate::store::Store;
use crate::{Put, StrTable, TableConfig, TableError};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length. The pool may contain the empty key.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Insert(usize, i32),
    Remove(usize),
    Discard(usize),
    Get(usize),
    Mutate(usize, i32),
    Contains(String),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,12}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Discard),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => "[a-z]{0,6}".prop_map(OpI::Contains),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Walk every bucket and chain, checking placement, uniqueness, the live
/// count and the arena size. Returns the contents.
fn check_structure<V: Clone, H: StrHash>(
    store: &Store<V>,
    hasher: &H,
) -> Result<BTreeMap<String, V>, TestCaseError> {
    let mut seen = BTreeMap::new();
    let mut slots = 0;
    for b in 0..store.size() {
        let head = store.head(b);
        if !head.is_set() {
            prop_assert!(head.next().is_none(), "unset head must not link a chain");
            continue;
        }
        slots += 1;
        let mut cur: Option<&Entry<V>> = Some(head);
        while let Some(e) = cur {
            prop_assert!(e.is_set());
            prop_assert_eq!(store.bucket_of(hasher.hash_str(e.key())), b);
            let v = e.value().cloned();
            prop_assert!(v.is_some());
            let dup = seen.insert(e.key().to_string(), v.unwrap());
            prop_assert!(dup.is_none(), "key {} stored twice", e.key());
            cur = e.next().map(|n| store.node(n));
        }
    }
    prop_assert_eq!(seen.len(), store.count());
    prop_assert_eq!(store.node_count(), store.count() - slots);
    Ok(seen)
}

fn valid(k: &str) -> bool {
    !k.is_empty()
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Invalid (empty) keys are rejected and change nothing.
// - `put` reports Inserted/Replaced like the model and hands the replaced
//   value to the destructor; `insert` returns it instead.
// - `remove` returns the value without the destructor; `discard` routes it
//   through the destructor; `clear` destroys every live value.
// - After each op: every entry sits in `hash % size`, keys are unique,
//   `len` matches the model, load is below `maxload`, size is odd and
//   never shrinks.
fn run_state_machine<H: StrHash>(
    table: StrTable<i32, H>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let destroyed = Rc::new(RefCell::new(Vec::new()));
    let sink = destroyed.clone();
    let mut sut = table.with_destructor(move |v| sink.borrow_mut().push(v));
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut expected_destroyed: Vec<i32> = Vec::new();
    let mut last_size = sut.size();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                match sut.put(k, v) {
                    Ok(Put::Inserted) => {
                        prop_assert!(valid(k));
                        prop_assert!(model.insert(k.clone(), v).is_none());
                    }
                    Ok(Put::Replaced) => {
                        let old = model.insert(k.clone(), v);
                        prop_assert!(old.is_some(), "replaced only when present");
                        expected_destroyed.extend(old);
                    }
                    Err(e) => {
                        prop_assert_eq!(e, TableError::InvalidKey);
                        prop_assert!(!valid(k));
                    }
                }
            }
            OpI::Insert(i, v) => {
                let k = &pool[i];
                match sut.insert(k, v) {
                    Ok(old) => {
                        prop_assert!(valid(k));
                        prop_assert_eq!(old, model.insert(k.clone(), v));
                    }
                    Err(e) => {
                        prop_assert_eq!(e, TableError::InvalidKey);
                        prop_assert!(!valid(k));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Discard(i) => {
                let k = &pool[i];
                let old = model.remove(k);
                prop_assert_eq!(sut.discard(k), old.is_some());
                expected_destroyed.extend(old);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence differs for {:?}", k),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Clear => {
                let size = sut.size();
                let mut all: Vec<i32> = model.drain().map(|(_, v)| v).collect();
                let order_before: Vec<i32> = sut.values().copied().collect();
                sut.clear();
                prop_assert_eq!(sut.size(), size, "clear keeps the bucket count");
                // clear releases in bucket/chain order, the same order iter uses
                let released: Vec<i32> = destroyed.borrow()[expected_destroyed.len()..].to_vec();
                prop_assert_eq!(&released, &order_before);
                let mut got = released.clone();
                all.sort_unstable();
                got.sort_unstable();
                prop_assert_eq!(&got, &all);
                expected_destroyed.extend(released);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<&str> = sut.keys().collect();
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().len(), model.len());
            }
        }

        // Post-conditions after each op
        let contents = check_structure(sut.store(), sut.hasher())?;
        let m: BTreeMap<String, i32> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(contents, m);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(&*destroyed.borrow(), &expected_destroyed);

        let info = sut.info();
        prop_assert!(info.load() < f64::from(sut.maxload()));
        prop_assert_eq!(info.size % 2, 1);
        prop_assert!(info.size >= last_size, "table never shrinks");
        prop_assert!(info.longest_chain <= info.count);
        prop_assert!(info.slots <= info.count);
        last_size = info.size;
    }

    // Dropping the table destroys the survivors.
    let survivors = model.len();
    let before = destroyed.borrow().len();
    drop(sut);
    prop_assert_eq!(destroyed.borrow().len(), before + survivors);
    Ok(())
}

fn small_config() -> TableConfig {
    // tiny initial size so growth is exercised often
    TableConfig::default().with_initsize(1)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_fast((pool, ops) in arb_scenario()) {
        run_state_machine(StrTable::create(small_config(), Fast).unwrap(), pool, ops)?;
    }

    #[test]
    fn prop_state_machine_good((pool, ops) in arb_scenario()) {
        run_state_machine(StrTable::create(small_config(), Good).unwrap(), pool, ops)?;
    }
}

fn const_hash(_: &str) -> u32 {
    0
}

// Property: same invariants as above with every key in one bucket. This
// stresses head displacement, promotion and mid-chain splicing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let table = StrTable::create(TableConfig::default().with_initsize(7), const_hash).unwrap();
        run_state_machine(table, pool, ops)?;
    }

    // Property: random load settings always normalize to a table that keeps
    // its load below maxload while growing.
    #[test]
    fn prop_growth_respects_any_loads(
        initsize in 0usize..40,
        minload in -1.0f32..2.0,
        maxload in -1.0f32..2.0,
        n in 1usize..300,
    ) {
        let config = TableConfig { initsize, minload, maxload };
        let mut t: StrTable<usize> = StrTable::create(config, Fast).unwrap();
        let norm = config.normalized();
        prop_assert_eq!(t.maxload(), norm.maxload);
        prop_assert!(t.minload() > 0.0 && t.minload() < t.maxload());
        for i in 0..n {
            t.put(&format!("key-{i}"), i).unwrap();
            prop_assert!((t.len() as f32 / t.size() as f32) < t.maxload());
        }
        for i in 0..n {
            prop_assert_eq!(t.get(&format!("key-{i}")), Some(&i));
        }
    }
}
