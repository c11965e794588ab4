//! # Probing Map
//!
//! An open-addressing hash map with quadratic probing and tombstone deletion.
//!
//! `ProbingMap` keeps every entry in one flat array of slots. A key's slot is
//! found by walking `(hash + i²) mod capacity` for `i = 0, 1, 2, ...` until a
//! slot ends the walk. Removal leaves a tombstone in place so other keys
//! stored further along the same walk stay reachable. The table doubles when
//! live entries reach the load-factor threshold, or when tombstones would
//! otherwise leave no empty slot; growth discards every tombstone.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probing_map::ProbingMap;
//!
//! // Four slots, grow at half full (plus a little slack)
//! let mut map = ProbingMap::new(4, 0.5);
//!
//! // Insert values
//! assert_eq!(map.put("apple".to_string(), 1), None);
//! map.put("banana".to_string(), 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(map.put("apple".to_string(), 10), Some(1));
//! assert_eq!(map.size(), 2);
//!
//! // Remove values
//! assert_eq!(map.remove("apple"), Some(10));
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Configuration
//!
//! Out-of-range construction input never fails. It is replaced by a default,
//! logged through `tracing`, and reported back:
//!
//! ```rust
//! use probing_map::{ConfigWarning, ProbingMap};
//!
//! let map: ProbingMap<u32, u32> = ProbingMap::new(0, 3.0);
//!
//! assert_eq!(map.capacity(), 1);
//! assert!(matches!(map.warnings(), [
//!     ConfigWarning::CapacityClamped { .. },
//!     ConfigWarning::LoadFactorOutOfRange { .. },
//! ]));
//! ```
//!
//! The map is single-threaded. Share it behind a `Mutex` or `RwLock`.

/// Growth tunables and construction diagnostics
mod config;
/// Key hashing and the quadratic probe sequence
mod probe;
/// The open-addressing map
mod probing_map;
/// Backing-array cells and probe stop rules
mod slot;
/// Utility traits and std trait impls for the map
mod utils;

pub use config::{
    ConfigWarning, DEFAULT_CAPACITY, DEFAULT_DEVIATION, DEFAULT_LOAD_FACTOR,
    DEFAULT_MAX_LOAD_FACTOR, ProbingConfig,
};
pub use probe::ProbeSequence;
pub use probing_map::ProbingMap;
pub use utils::HashMapExtensions;
