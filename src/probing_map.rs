use std::{
    borrow::Borrow,
    hash::Hash,
    iter, mem,
};

use crate::{
    config::{ConfigWarning, ProbingConfig, validated_capacity},
    probe::{ProbeSequence, hash_key},
    slot::{ProbeMode, Slot},
};

/// An open-addressing hash map with quadratic probing and lazy deletion.
///
/// Removed entries become tombstones that keep the key, so probe sequences
/// passing through them still reach keys stored further along. Tombstones are
/// dropped when the table grows. The table doubles once the live entry count
/// reaches [`threshold`](Self::threshold), or once live entries plus
/// tombstones would leave no empty slot.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock to share it.
#[derive(Debug, Clone)]
pub struct ProbingMap<K, V> {
    /// The backing array; its length is the capacity
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots
    live: usize,
    /// Number of tombstone slots
    tombstones: usize,
    /// Growth tunables, already validated
    config: ProbingConfig,
    /// Inputs that were replaced at construction
    warnings: Vec<ConfigWarning>,
}

impl<K, V> ProbingMap<K, V>
where
    K: Hash + Eq,
{
    /// Creates a map with `capacity` slots and the given load factor.
    ///
    /// A capacity of 0 becomes 1 and a load factor outside `(0, 1]` becomes
    /// [`DEFAULT_LOAD_FACTOR`](crate::DEFAULT_LOAD_FACTOR). Both are logged
    /// and reported by [`warnings`](Self::warnings).
    #[must_use]
    pub fn new(capacity: usize, load_factor: f64) -> Self {
        Self::with_config(capacity, ProbingConfig::with_load_factor(load_factor))
    }

    /// Creates a map with `capacity` slots and the default load factor
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(capacity, ProbingConfig::default())
    }

    /// Creates a map with `capacity` slots and explicit growth tunables
    #[must_use]
    pub fn with_config(capacity: usize, config: ProbingConfig) -> Self {
        let (capacity, capacity_warning) = validated_capacity(capacity);
        let (config, config_warnings) = config.validated();
        let warnings = capacity_warning.into_iter().chain(config_warnings).collect();

        Self { slots: empty_slots(capacity), live: 0, tombstones: 0, config, warnings }
    }

    /// Walks the probe sequence of `key` and returns the first slot index
    /// where `mode` stops, together with the number of slots examined.
    ///
    /// `None` means the sequence ran out without a stop.
    fn probe_with_steps<Q>(&self, key: &Q, mode: ProbeMode) -> (Option<usize>, usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut steps: usize = 0;
        for index in ProbeSequence::new(key, self.slots.len()) {
            steps = steps.saturating_add(1);
            if self.slots.get(index).is_some_and(|slot| mode.stops_at(slot, key)) {
                return (Some(index), steps);
            }
        }
        (None, steps)
    }

    /// Index of the slot where `mode` stops for `key`
    fn probe<Q>(&self, key: &Q, mode: ProbeMode) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probe_with_steps(key, mode).0
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the previous value if the key was present; the entry count is
    /// unchanged in that case.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.probe(&key, ProbeMode::Lookup) {
            if let Some(Slot::Occupied { value: current, .. }) = self.slots.get_mut(index) {
                let previous = mem::replace(current, value);
                self.check_capacity_and_grow();
                return Some(previous);
            }
        }

        self.insert_new(key, value);
        self.check_capacity_and_grow();
        None
    }

    /// Writes a key that is known to be absent
    fn insert_new(&mut self, key: K, value: V) {
        loop {
            if let Some(slot) =
                self.probe(&key, ProbeMode::Insert).and_then(|index| self.slots.get_mut(index))
            {
                let replaced = mem::replace(slot, Slot::Occupied { key, value });
                if replaced.is_tombstone() {
                    self.tombstones = self.tombstones.saturating_sub(1);
                }
                self.live = self.live.saturating_add(1);
                return;
            }

            // Every slot this key can reach is taken by other keys
            self.grow();
        }
    }

    /// Retrieves the value for a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots.get(self.probe(key, ProbeMode::Lookup)?)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone { .. } => None,
        }
    }

    /// Retrieves a mutable reference to the value for a key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.probe(key, ProbeMode::Lookup)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone { .. } => None,
        }
    }

    /// Returns true if the map holds a live entry for `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes a key, leaving a tombstone in its slot.
    ///
    /// Returns the removed value, or `None` (with no change) if the key is
    /// absent or already removed.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.probe(key, ProbeMode::Remove)?;
        let slot = self.slots.get_mut(index)?;

        match mem::replace(slot, Slot::Empty) {
            Slot::Occupied { key, value } => {
                *slot = Slot::Tombstone { key };
                self.live = self.live.saturating_sub(1);
                self.tombstones = self.tombstones.saturating_add(1);
                Some(value)
            }
            untouched => {
                *slot = untouched;
                None
            }
        }
    }

    /// Grows when live entries reach the threshold, or when live entries and
    /// tombstones together would leave no empty slot to end a probe.
    fn check_capacity_and_grow(&mut self) {
        let used = self.live.saturating_add(self.tombstones);
        if self.live >= self.threshold() || used >= self.slots.len() {
            self.grow();
        }
    }

    /// Rehashes every live entry into a table of twice the capacity and drops
    /// all tombstones.
    ///
    /// Hashes are taken and placements computed before anything is moved, so
    /// the map is either fully rebuilt or untouched.
    fn grow(&mut self) {
        let old_capacity = self.slots.len();

        let hashes: Vec<u64> = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied { key, .. } => Some(hash_key(key)),
                Slot::Empty | Slot::Tombstone { .. } => None,
            })
            .collect();

        let mut capacity = old_capacity.saturating_mul(2).max(1);
        let placement = loop {
            if let Some(placement) = place(&hashes, capacity) {
                break placement;
            }
            capacity = capacity.saturating_mul(2);
        };

        let mut slots = empty_slots(capacity);
        let live = mem::take(&mut self.slots).into_iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty | Slot::Tombstone { .. } => None,
        });
        for ((key, value), index) in live.zip(placement) {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Slot::Occupied { key, value };
            }
        }

        tracing::debug!(
            old_capacity,
            new_capacity = capacity,
            live = self.live,
            dropped_tombstones = self.tombstones,
            "probing map grew"
        );

        self.slots = slots;
        self.tombstones = 0;
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.live
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the number of slots in the backing array
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones since the last growth
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Live entry count at which the next `put` grows the table:
    /// `floor(capacity * min(load_factor + deviation, max_load_factor))`
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn threshold(&self) -> usize {
        (self.slots.len() as f64 * self.config.effective_load_factor()).floor() as usize
    }

    /// Returns the current ratio of live entries to slots
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.live as f64 / self.slots.len().max(1) as f64
    }

    /// Returns the growth tunables in effect
    #[must_use]
    pub fn config(&self) -> &ProbingConfig {
        &self.config
    }

    /// Returns the construction inputs that were replaced by defaults
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Returns the candidate slot indices for `key` at the current capacity
    pub fn probe_sequence<Q>(&self, key: &Q) -> ProbeSequence
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        ProbeSequence::new(key, self.slots.len())
    }

    /// Returns how many slots a lookup of `key` examines
    pub fn probe_length<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probe_with_steps(key, ProbeMode::Lookup).1
    }

    /// Slot index holding the live entry for `key`
    #[cfg(test)]
    fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probe(key, ProbeMode::Lookup)
            .filter(|&index| self.slots.get(index).is_some_and(|slot| slot.holds(key)))
    }
}

/// A backing array of `capacity` empty slots
fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Assigns each hash the first free slot on its probe sequence in a fresh
/// table of `capacity` slots. Returns `None` if some hash finds no free slot.
fn place(hashes: &[u64], capacity: usize) -> Option<Vec<usize>> {
    let mut taken = vec![false; capacity];
    hashes
        .iter()
        .map(|&hash| {
            let index = ProbeSequence::from_hash(hash, capacity)
                .find(|&index| taken.get(index).is_some_and(|used| !used))?;
            if let Some(flag) = taken.get_mut(index) {
                *flag = true;
            }
            Some(index)
        })
        .collect()
}
