// FilterHashMap public-API test suite (consolidated).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Layout: the backing array is ceil(capacity / load_factor) slots,
//   partitioned exactly by geometrically shrinking subtables.
// - Round trip: inserted keys read back their latest value until the
//   table refuses an insert.
// - Exhaustion: a refused insert returns the pair, is distinct from
//   "absent", and never disturbs resident entries.
// - Counting: len() counts live entries; updates do not inflate it.
use filter_hashmap::{CapacityExhausted, ConfigError, FilterHashMap};
use std::hash::{BuildHasher, Hasher};

// Forces every key onto one probe path; each subtable then has exactly
// one usable slot.
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

// Test: construction parameter validation.
// Assumes: validation happens before any backing storage exists.
// Verifies: zero capacity and out-of-range load factors are rejected
// with the matching ConfigError.
#[test]
fn construction_validation() {
    assert_eq!(
        FilterHashMap::<String, i32>::new(0, 0.9).unwrap_err(),
        ConfigError::ZeroCapacity
    );
    assert_eq!(
        FilterHashMap::<String, i32>::new(10, -0.9).unwrap_err(),
        ConfigError::LoadFactorOutOfRange
    );
    assert_eq!(
        FilterHashMap::<String, i32>::new(10, 0.0).unwrap_err(),
        ConfigError::LoadFactorOutOfRange
    );
    assert_eq!(
        FilterHashMap::<String, i32>::new(10, 1.0).unwrap_err(),
        ConfigError::LoadFactorOutOfRange
    );
    assert_eq!(
        FilterHashMap::<String, i32>::new(10, 1.9).unwrap_err(),
        ConfigError::LoadFactorOutOfRange
    );
}

// Test: configured parameters are recorded as given.
// Verifies: initial_capacity() and max_load_factor() round-trip the
// constructor arguments.
#[test]
fn parameters_recorded() {
    let m = FilterHashMap::<String, i32>::new(10, 0.9).unwrap();
    assert_eq!(m.initial_capacity(), 10);
    assert_eq!(m.max_load_factor(), 0.9);
}

// Test: deterministic layout for the (10, 0.99) worked example.
// Assumes: subtable sizes follow floor(remaining * f / -ln(1 - f)),
// clamped to 1.
// Verifies: 11 slots; first subtable size 2 at offset 0, second size 1
// at offset 2, last size 1 at offset 10; exact partition.
#[test]
fn layout_worked_example() {
    let m = FilterHashMap::<String, i32>::new(10, 0.99).unwrap();
    let layout = m.layout();
    assert_eq!(layout.slot_count(), 11);

    let subs = layout.subtables();
    assert_eq!((subs[0].size(), subs[0].start_index()), (2, 0));
    assert_eq!((subs[1].size(), subs[1].start_index()), (1, 2));
    let last = subs.last().unwrap();
    assert_eq!((last.size(), last.start_index()), (1, 10));

    let covered: usize = subs.iter().map(|s| s.size()).sum();
    assert_eq!(covered, layout.slot_count());
}

// Test: two maps built with the same parameters derive the same layout.
// Verifies: layout construction is a pure function of (capacity, f).
#[test]
fn layout_is_deterministic() {
    let a = FilterHashMap::<String, i32>::new(500, 0.85).unwrap();
    let b = FilterHashMap::<String, i32>::new(500, 0.85).unwrap();
    assert_eq!(a.layout().slot_count(), b.layout().slot_count());
    assert_eq!(a.layout().subtables(), b.layout().subtables());
}

// Test: insert/get round trip and update semantics through the public
// surface.
// Assumes: the table is far below capacity, so no insert is refused.
// Verifies: latest value wins, previous value is returned, len() is
// unchanged by updates.
#[test]
fn round_trip_and_update() {
    let mut m = FilterHashMap::<String, u32>::new(1000, 0.8).unwrap();
    for i in 0..100u32 {
        assert_eq!(m.insert(format!("key-{i}"), i).unwrap(), None);
    }
    assert_eq!(m.len(), 100);

    for i in 0..100u32 {
        assert_eq!(m.get(&format!("key-{i}")), Some(&i));
    }
    assert_eq!(m.get("key-100"), None);

    assert_eq!(m.insert("key-7".to_string(), 700).unwrap(), Some(7));
    assert_eq!(m.get("key-7"), Some(&700));
    assert_eq!(m.len(), 100, "update must not change the entry count");
}

// Test: capacity exhaustion is reported, not absorbed.
// Assumes: with a constant hasher, the table degenerates to one slot per
// subtable, so exhaustion triggers after exactly `subtable count`
// distinct keys.
// Verifies: the error carries the refused pair; resident entries and
// their updatability are untouched; the refused key stays absent.
#[test]
fn exhaustion_signals_and_preserves_data() {
    let mut m: FilterHashMap<String, i32, ConstBuildHasher> =
        FilterHashMap::with_hasher(16, 0.95, ConstBuildHasher).unwrap();
    let levels = m.layout().subtables().len();

    for i in 0..levels {
        m.insert(format!("k{i}"), i as i32).unwrap();
    }

    let CapacityExhausted { key, value } = m.insert("late".to_string(), 123).unwrap_err();
    assert_eq!(key, "late");
    assert_eq!(value, 123);
    assert_eq!(m.get("late"), None, "refused key must remain absent");

    for i in 0..levels {
        assert_eq!(m.get(&format!("k{i}")), Some(&(i as i32)));
    }
    assert_eq!(m.insert("k1".to_string(), -1).unwrap(), Some(1));
    assert_eq!(m.len(), levels);
}

// Test: Default uses the crate's documented fallback parameters.
// Verifies: 2048 capacity at 0.8 load factor, empty on construction.
#[test]
fn default_parameters() {
    let m = FilterHashMap::<String, i32>::default();
    assert_eq!(m.initial_capacity(), 2048);
    assert_eq!(m.max_load_factor(), 0.8);
    assert!(m.is_empty());
    assert_eq!(m.layout().slot_count(), 2560); // ceil(2048 / 0.8)
}

// Test: in-place mutation through get_mut.
// Verifies: mutations persist; absent keys yield None.
#[test]
fn get_mut_roundtrip() {
    let mut m = FilterHashMap::<&'static str, Vec<u32>>::new(16, 0.8).unwrap();
    m.insert("v", vec![1, 2]).unwrap();
    m.get_mut(&"v").unwrap().push(3);
    assert_eq!(m.get(&"v"), Some(&vec![1, 2, 3]));
    assert!(m.get_mut(&"absent").is_none());
}
