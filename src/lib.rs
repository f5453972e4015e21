//! filter-hashmap: a multi-level open-addressing hash table ("filter
//! hashing") over a single flat slot array, with at most one probe per
//! level.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a fixed-capacity map whose probe count is bounded by the
//!   number of subtables, not by the table size.
//! - Layers:
//!   - Layout: derives, from an initial capacity and a maximum load
//!     factor, the backing-array length and an ordered partition of it
//!     into geometrically shrinking subtables.
//!   - FilterHashMap<K, V, S>: the slot store plus the probe walk.
//!     A key is hashed once; subtables are consulted in creation order,
//!     each with exactly one probe (`hash % size + start`), stopping at
//!     the first empty or matching slot.
//!
//! Sizing
//! - Each subtable's size is `floor(remaining * f / -ln(1 - f))`,
//!   clamped to at least 1, where `remaining` is the unallocated tail of
//!   the array and `f` the maximum load factor. Filled to `f`, each
//!   subtable absorbs a bounded fraction of the keys that overflowed the
//!   previous ones, which is what keeps the amortized probe count
//!   comparable to uniform open addressing.
//!
//! Constraints
//! - Single-threaded: no internal synchronization; callers needing
//!   shared access must wrap the whole table in their own lock.
//! - Fixed capacity: subtables are built once and never move. When an
//!   insert finds every subtable's probed slot held by a foreign key,
//!   it is refused with [`CapacityExhausted`], returning the key and
//!   value to the caller. Growth policy (rebuild larger and reinsert,
//!   reject, evict) is deliberately left to the caller.
//! - Entries are never dropped or overwritten by a foreign key; a
//!   refused insert leaves the table untouched.
//!
//! Notes and non-goals
//! - No removal, iteration, or bulk operations; the public surface is
//!   construction, `get`/`get_mut`, `insert`, and `len`/`is_empty`,
//!   plus read-only layout introspection.
//! - `len()` counts live entries: it grows on first insertion of a key
//!   and is unchanged by updates.
//! - Hashes come from `BuildHasher::hash_one` as unsigned 64-bit values,
//!   so no sign handling (and none of its bias) is involved.

pub mod layout;
mod table;
mod table_proptest;

// Public surface
pub use layout::{ConfigError, Layout, Subtable};
pub use table::{
    CapacityExhausted, FilterHashMap, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR,
};
