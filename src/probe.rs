//! Key hashing and the quadratic probe sequence

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    iter::FusedIterator,
};

/// Hashes a key with its own `Hash` impl.
///
/// `DefaultHasher::new()` uses fixed keys, so the same key always lands on the
/// same sequence, across maps and across runs.
pub(crate) fn hash_key<Q: Hash + ?Sized>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Candidate slot indices for one key: `(base + i²) mod capacity` for
/// `i = 0, 1, 2, ...`.
///
/// The running `base + i²` wraps in `u64` before the modulo, so it never goes
/// negative. Quadratic residues do not cover every slot of a table (for a
/// capacity of 8 only offsets 0, 1 and 4 are reachable), so the sequence is
/// cut off after `capacity` candidates.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// `base + i²` for the next candidate
    position: u64,
    /// Next `i`
    step: u64,
    /// Number of slots in the table
    capacity: u64,
    /// Candidates still to yield
    remaining: usize,
}

impl ProbeSequence {
    /// Starts a sequence from a precomputed hash
    pub(crate) fn from_hash(hash: u64, capacity: usize) -> Self {
        Self {
            position: hash,
            step: 0,
            capacity: to_u64(capacity).max(1),
            remaining: capacity,
        }
    }

    /// Starts the sequence for `key` over a table of `capacity` slots
    pub(crate) fn new<Q: Hash + ?Sized>(key: &Q, capacity: usize) -> Self {
        Self::from_hash(hash_key(key), capacity)
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);

        let index = self.position.checked_rem(self.capacity).unwrap_or(0);

        // (i + 1)² = i² + 2i + 1
        let delta = self.step.wrapping_mul(2).wrapping_add(1);
        self.position = self.position.wrapping_add(delta);
        self.step = self.step.wrapping_add(1);

        Some(to_usize(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

impl FusedIterator for ProbeSequence {}

/// Widens a slot count to the hash width
#[allow(clippy::cast_possible_truncation)]
const fn to_u64(n: usize) -> u64 {
    n as u64
}

/// Narrows a residue back to an index. The residue is below a `usize`
/// capacity, so nothing is lost.
#[allow(clippy::cast_possible_truncation)]
const fn to_usize(n: u64) -> usize {
    n as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_offsets() {
        let hash = 3;
        let indices: Vec<usize> = ProbeSequence::from_hash(hash, 16).take(5).collect();
        // 3 + {0, 1, 4, 9, 16}
        assert_eq!(indices, vec![3, 4, 7, 12, 3]);
    }

    #[test]
    fn test_capacity_bounds_length() {
        assert_eq!(ProbeSequence::from_hash(42, 8).count(), 8);
        assert_eq!(ProbeSequence::from_hash(42, 1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(ProbeSequence::from_hash(42, 0).count(), 0);
    }

    #[test]
    fn test_power_of_two_capacity_reaches_few_residues() {
        let mut seen: Vec<usize> = ProbeSequence::from_hash(0, 8).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 4]);
    }

    #[test]
    fn test_accumulator_wraps_instead_of_overflowing() {
        let indices: Vec<usize> = ProbeSequence::from_hash(u64::MAX, 8).take(3).collect();
        // u64::MAX % 8 = 7, then (MAX + 1) wraps to 0, then (MAX + 4) wraps to 3.
        assert_eq!(indices, vec![7, 0, 3]);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_key("apple"), hash_key("apple"));
        assert_eq!(hash_key(&"apple".to_string()), hash_key("apple"));
        let a: Vec<usize> = ProbeSequence::new("apple", 32).collect();
        let b: Vec<usize> = ProbeSequence::new("apple", 32).collect();
        assert_eq!(a, b);
    }
}
