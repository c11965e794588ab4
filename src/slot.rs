//! Backing-array cells and the per-operation probe stop rules

use std::borrow::Borrow;

/// One cell of the backing array.
///
/// The array index is the only handle to a slot; nothing outside the map ever
/// holds a reference to one across operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<K, V> {
    /// Never written since the array was allocated. Terminates every probe.
    Empty,
    /// A live entry
    Occupied {
        /// The stored key
        key: K,
        /// The value associated with the key
        value: V,
    },
    /// A removed entry. The key is kept so the slot still reads as "in use"
    /// to probes passing through it.
    Tombstone {
        /// The key that was removed
        key: K,
    },
}

impl<K, V> Slot<K, V> {
    /// Returns true for slots that have never been written
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true for removed entries
    pub(crate) const fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone { .. })
    }

    /// Returns true when the slot holds a live entry for `target`
    pub(crate) fn holds<Q>(&self, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Occupied { key, .. } => key.borrow() == target,
            Self::Empty | Self::Tombstone { .. } => false,
        }
    }
}

/// Which operation a probe is serving. Each mode has its own stop rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeMode {
    /// Find a slot to write a key the map does not contain yet
    Insert,
    /// Find the live entry for a key
    Lookup,
    /// Find the live entry to turn into a tombstone
    Remove,
}

impl ProbeMode {
    /// Returns true when a probe in this mode should stop at `slot`
    pub(crate) fn stops_at<K, V, Q>(self, slot: &Slot<K, V>, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Insert => slot.is_empty() || slot.is_tombstone() || slot.holds(target),
            // A tombstone never stops these, even one carrying the target key:
            // a removed key must not be found.
            Self::Lookup | Self::Remove => slot.is_empty() || slot.holds(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(key: &str, value: i32) -> Slot<String, i32> {
        Slot::Occupied { key: key.to_string(), value }
    }

    fn tombstone(key: &str) -> Slot<String, i32> {
        Slot::Tombstone { key: key.to_string() }
    }

    #[test]
    fn test_empty_stops_every_mode() {
        let slot: Slot<String, i32> = Slot::Empty;
        for mode in [ProbeMode::Insert, ProbeMode::Lookup, ProbeMode::Remove] {
            assert!(mode.stops_at(&slot, "a"), "{mode:?} should stop at an empty slot");
        }
    }

    #[test]
    fn test_matching_entry_stops_every_mode() {
        let slot = occupied("a", 1);
        for mode in [ProbeMode::Insert, ProbeMode::Lookup, ProbeMode::Remove] {
            assert!(mode.stops_at(&slot, "a"));
        }
    }

    #[test]
    fn test_other_entry_stops_no_mode() {
        let slot = occupied("a", 1);
        for mode in [ProbeMode::Insert, ProbeMode::Lookup, ProbeMode::Remove] {
            assert!(!mode.stops_at(&slot, "b"));
        }
    }

    #[test]
    fn test_tombstone_only_stops_insert() {
        for slot in [tombstone("a"), tombstone("b")] {
            assert!(ProbeMode::Insert.stops_at(&slot, "a"));
            assert!(!ProbeMode::Lookup.stops_at(&slot, "a"));
            assert!(!ProbeMode::Remove.stops_at(&slot, "a"));
        }
    }
}
