//! Layout: partitioning the backing array into geometrically shrinking
//! subtables.

/// Rejected construction parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The initial capacity must be a positive integer.
    ZeroCapacity,
    /// The maximum load factor must lie strictly between 0 and 1.
    LoadFactorOutOfRange,
}

/// A contiguous index range of the backing array, probed as an
/// independent modulo-hashed table: one slot per lookup, no secondary
/// probing within the range.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Subtable {
    size: usize,
    start_index: usize,
}

impl Subtable {
    /// Number of slots in this subtable.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Absolute index of the first slot.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Absolute index of the single slot this subtable offers for `hash`.
    pub(crate) fn slot_index(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize + self.start_index
    }
}

/// Size of the next subtable, given the unallocated tail of the array.
///
/// `floor(remaining * f / -ln(1 - f))`, clamped to at least 1. The
/// divisor is computed as `-ln_1p(-f)` to stay accurate for small `f`.
/// Since `f / -ln(1 - f) < 1` on `(0, 1)`, the result never exceeds
/// `remaining`.
fn subtable_size(remaining: usize, max_load_factor: f64) -> usize {
    let c = -f64::ln_1p(-max_load_factor);
    let size = (remaining as f64 * max_load_factor / c).floor() as usize;
    size.max(1)
}

/// The build-time partition of the backing array: total slot count plus
/// the ordered subtable sequence. Built once; subtables never move or
/// resize afterward.
#[derive(Clone, Debug)]
pub struct Layout {
    slot_count: usize,
    subtables: Vec<Subtable>,
}

impl Layout {
    /// Compute the layout for `initial_capacity` entries at a target
    /// maximum load factor.
    ///
    /// The array length is `ceil(initial_capacity / max_load_factor)`.
    /// Subtables are appended back to back, each sized from the space
    /// still unallocated, until the array is covered. The subtables
    /// partition `[0, slot_count)` exactly: no truncation of the final
    /// subtable is needed because each computed size fits the remaining
    /// space (see [`subtable_size`]).
    ///
    /// Parameters are validated before anything is allocated.
    pub fn new(initial_capacity: usize, max_load_factor: f64) -> Result<Self, ConfigError> {
        if initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(max_load_factor > 0.0 && max_load_factor < 1.0) {
            // Also rejects NaN: both comparisons are false for it.
            return Err(ConfigError::LoadFactorOutOfRange);
        }

        let target = (initial_capacity as f64 / max_load_factor).ceil() as usize;
        let mut subtables = Vec::new();
        let mut allocated = 0;
        while allocated < target {
            let size = subtable_size(target - allocated, max_load_factor);
            subtables.push(Subtable {
                size,
                start_index: allocated,
            });
            allocated += size;
        }
        debug_assert_eq!(allocated, target);

        Ok(Self {
            slot_count: allocated,
            subtables,
        })
    }

    /// Length of the backing array this layout describes.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Subtables in creation (probe) order.
    pub fn subtables(&self) -> &[Subtable] {
        &self.subtables
    }
}
