#![cfg(test)]

// Property tests for FilterHashMap kept inside the crate so they can
// reach the layout internals without feature gates.

use crate::table::{CapacityExhausted, FilterHashMap};
use proptest::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
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

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    Mutate(usize, i32),
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (usize, f64, Vec<String>, Vec<OpI>)> {
    let capacity = 1usize..=32;
    let load_factor = proptest::sample::select(vec![0.3, 0.5, 0.8, 0.9, 0.99]);
    let pool = proptest::collection::vec("[a-z]{0,5}", 1..=8);
    (capacity, load_factor, pool).prop_flat_map(|(cap, f, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Get),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (cap, f, pool.clone(), ops))
    })
}

fn run_state_machine<S: BuildHasher>(
    mut sut: FilterHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), proptest::test_runner::TestCaseError> {
    // Model of the successful inserts; refused inserts leave it unchanged.
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                match sut.insert(k.clone(), v) {
                    Ok(prev) => {
                        let model_prev = model.insert(k, v);
                        prop_assert_eq!(prev, model_prev, "previous value must match model");
                    }
                    Err(CapacityExhausted { key, value }) => {
                        // A resident key always terminates its own probe
                        // path, so only new keys can be refused, and the
                        // refused pair must come back intact.
                        prop_assert!(!model.contains_key(&k), "resident key must never exhaust");
                        prop_assert_eq!(key, k);
                        prop_assert_eq!(value, v);
                    }
                }
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                let sut_entry = sut.get_mut(&k);
                let model_entry = model.get_mut(&k);
                prop_assert_eq!(sut_entry.is_some(), model_entry.is_some());
                if let (Some(sv), Some(mv)) = (sut_entry, model_entry) {
                    *sv = sv.saturating_add(d);
                    *mv = mv.saturating_add(d);
                }
            }
        }

        // Post-conditions after each op: len counts live entries only.
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() <= sut.layout().slot_count());
    }

    // Final sweep: every modeled entry is retrievable with its latest value.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Round trip: successful inserts are retrievable with the latest value.
// - Updates return the previous value and never change `len`.
// - Capacity exhaustion only hits keys absent from the table, returns the
//   refused pair intact, and leaves the table untouched.
// - `len`/`is_empty` parity with the model after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, f, pool, ops) in arb_scenario()) {
        let sut: FilterHashMap<Key, i32> = FilterHashMap::new(cap, f).expect("valid parameters");
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key probes the same
// slot in every subtable, so the table degenerates to one usable slot per
// subtable and exhaustion fires as early as possible. Equality (not hash)
// must still resolve keys correctly.
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
    fn prop_state_machine_with_collisions((cap, f, pool, ops) in arb_scenario()) {
        let sut: FilterHashMap<Key, i32, ConstBuildHasher> =
            FilterHashMap::with_hasher(cap, f, ConstBuildHasher).expect("valid parameters");
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: filling with distinct keys until the first refusal never
// loses or corrupts an entry, and the entry count never exceeds the
// backing array.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_fill_to_exhaustion_preserves_entries(cap in 1usize..=64, f in proptest::sample::select(vec![0.5, 0.8, 0.9, 0.99])) {
        let mut sut: FilterHashMap<String, usize> = FilterHashMap::new(cap, f).expect("valid parameters");
        let slot_count = sut.layout().slot_count();

        let mut stored = Vec::new();
        // Twice the slot count guarantees the walk runs out of vacant
        // slots along some probe path before the keys run out.
        for i in 0..slot_count * 2 {
            let k = format!("k{i}");
            match sut.insert(k.clone(), i) {
                Ok(prev) => {
                    prop_assert_eq!(prev, None, "distinct keys cannot have a previous value");
                    stored.push((k, i));
                }
                Err(CapacityExhausted { key, value }) => {
                    prop_assert_eq!(key, k);
                    prop_assert_eq!(value, i);
                    break;
                }
            }
        }

        prop_assert_eq!(sut.len(), stored.len());
        prop_assert!(sut.len() <= slot_count);
        for (k, v) in &stored {
            prop_assert_eq!(sut.get(k.as_str()), Some(v));
        }
    }
}
