//! FilterHashMap: the slot store and the cross-subtable probe walk.

use crate::layout::{ConfigError, Layout};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Initial capacity used by [`FilterHashMap::default`].
pub const DEFAULT_INITIAL_CAPACITY: usize = 2048;
/// Maximum load factor used by [`FilterHashMap::default`].
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.8;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// An insert was refused because every subtable's probed slot for the
/// key's hash is held by a different key.
///
/// The refused pair is handed back so the caller can apply its own
/// growth policy (rebuild at a larger capacity and reinsert, reject,
/// evict); the table itself never drops or overwrites an entry. This
/// condition is distinct from a key being absent.
#[derive(Debug)]
pub struct CapacityExhausted<K, V> {
    pub key: K,
    pub value: V,
}

/// Outcome of walking the subtables for one hash. The walk stops at the
/// first subtable whose probed slot is usable; only if every probed slot
/// holds a foreign key is the path exhausted.
enum Probe {
    /// Probed slot is empty.
    Vacant(usize),
    /// Probed slot holds the key being searched.
    Occupied(usize),
    /// Every subtable's probed slot holds a different key.
    Exhausted,
}

/// A fixed-capacity map over one flat slot array, partitioned into
/// decreasing-size subtables that are each probed exactly once.
///
/// See the crate docs for the design; [`Layout`] for the partition.
pub struct FilterHashMap<K, V, S = RandomState> {
    hasher: S,
    layout: Layout,
    slots: Vec<Option<Entry<K, V>>>,
    len: usize,
    initial_capacity: usize,
    max_load_factor: f64,
}

impl<K, V> FilterHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Build a table for `initial_capacity` entries at the given maximum
    /// load factor, with the default hasher.
    ///
    /// Fails with [`ConfigError`] (before allocating any storage) if the
    /// capacity is zero or the load factor is not strictly between 0
    /// and 1.
    pub fn new(initial_capacity: usize, max_load_factor: f64) -> Result<Self, ConfigError> {
        Self::with_hasher(initial_capacity, max_load_factor, Default::default())
    }
}

impl<K, V> Default for FilterHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR)
            .expect("default construction parameters are valid")
    }
}

// Entries are elided: Debug must not require K/V to be Debug.
impl<K, V, S> fmt::Debug for FilterHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterHashMap")
            .field("len", &self.len)
            .field("initial_capacity", &self.initial_capacity)
            .field("max_load_factor", &self.max_load_factor)
            .field("slot_count", &self.layout.slot_count())
            .finish_non_exhaustive()
    }
}

/// Identity first, equality second. The pointer check is purely a fast
/// path for expensive `Eq` impls; equal-but-distinct keys still match
/// through the equality branch, so observable behavior is unchanged.
fn key_matches<Q>(stored: &Q, probe: &Q) -> bool
where
    Q: ?Sized + Eq,
{
    core::ptr::eq(stored, probe) || stored == probe
}

impl<K, V, S> FilterHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Like [`FilterHashMap::new`], with an explicit hasher.
    pub fn with_hasher(
        initial_capacity: usize,
        max_load_factor: f64,
        hasher: S,
    ) -> Result<Self, ConfigError> {
        let layout = Layout::new(initial_capacity, max_load_factor)?;
        let mut slots = Vec::new();
        slots.resize_with(layout.slot_count(), || None);
        Ok(Self {
            hasher,
            layout,
            slots,
            len: 0,
            initial_capacity,
            max_load_factor,
        })
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Number of live entries. Grows on first insertion of a key and is
    /// unchanged by updates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The capacity the table was built for.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The load factor the layout was tuned for.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// The subtable partition backing this table.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Walk the subtables in creation order, probing each once, until a
    /// slot terminates the scan: empty, or occupied by the probed key.
    fn locate<Q>(&self, q: &Q, hash: u64) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        for subtable in self.layout.subtables() {
            let index = subtable.slot_index(hash);
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(entry) => {
                    if key_matches(entry.key.borrow(), q) {
                        return Probe::Occupied(index);
                    }
                }
            }
        }
        Probe::Exhausted
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        match self.locate(q, hash) {
            Probe::Occupied(index) => self.slots[index].as_ref().map(|e| &e.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        match self.locate(q, hash) {
            Probe::Occupied(index) => self.slots[index].as_mut().map(|e| &mut e.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Insert or update. Returns the previous value when the key was
    /// already present. When every subtable's probed slot is held by a
    /// foreign key, the insert is refused and the pair comes back in
    /// [`CapacityExhausted`]; the table is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityExhausted<K, V>> {
        let hash = self.make_hash(&key);
        match self.locate(&key, hash) {
            Probe::Vacant(index) => {
                self.slots[index] = Some(Entry { key, value });
                self.len += 1;
                Ok(None)
            }
            Probe::Occupied(index) => {
                let previous = self.slots[index].replace(Entry { key, value });
                Ok(previous.map(|e| e.value))
            }
            Probe::Exhausted => Err(CapacityExhausted { key, value }),
        }
    }
}
