//! Growth tunables for `ProbingMap` and the diagnostics produced when they are
//! out of range.
//!
//! Construction is permissive: a bad value is replaced by its default, logged
//! with `tracing::warn!` and kept on the map as a [`ConfigWarning`].

use thiserror::Error;

/// Load factor used when none is given or the given one is out of range
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Slack added on top of the load factor before growth triggers
pub const DEFAULT_DEVIATION: f64 = 0.1;

/// Upper bound on `load_factor + deviation`
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.95;

/// Initial number of slots for `ProbingMap::default()`
pub const DEFAULT_CAPACITY: usize = 16;

/// A construction input that was replaced by a usable value.
///
/// None of these abort construction.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigWarning {
    /// Capacity below one slot
    #[error("[probing map] initial capacity {requested} is below 1, using 1")]
    CapacityClamped {
        /// The capacity the caller asked for
        requested: usize,
    },
    /// Load factor outside `(0, 1]`
    #[error(
        "[probing map] load factor {requested} is outside (0, 1], using {default}",
        default = DEFAULT_LOAD_FACTOR
    )]
    LoadFactorOutOfRange {
        /// The load factor the caller asked for
        requested: f64,
    },
    /// Negative or non-finite deviation
    #[error(
        "[probing map] deviation {requested} is not a finite value >= 0, using {default}",
        default = DEFAULT_DEVIATION
    )]
    DeviationOutOfRange {
        /// The deviation the caller asked for
        requested: f64,
    },
    /// Max load factor outside `(0, 1]`
    #[error(
        "[probing map] max load factor {requested} is outside (0, 1], using {default}",
        default = DEFAULT_MAX_LOAD_FACTOR
    )]
    MaxLoadFactorOutOfRange {
        /// The cap the caller asked for
        requested: f64,
    },
}

/// Controls when a `ProbingMap` grows.
///
/// Growth triggers once the live entry count reaches
/// `floor(capacity * min(load_factor + deviation, max_load_factor))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbingConfig {
    /// Target ratio of live entries to slots, in `(0, 1]`
    pub load_factor: f64,
    /// Hysteresis above the load factor, finite and `>= 0`
    pub deviation: f64,
    /// Cap on the effective load factor, in `(0, 1]`
    pub max_load_factor: f64,
}

impl Default for ProbingConfig {
    fn default() -> Self {
        Self {
            load_factor: DEFAULT_LOAD_FACTOR,
            deviation: DEFAULT_DEVIATION,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl ProbingConfig {
    /// Default tunables with the given load factor
    #[must_use]
    pub fn with_load_factor(load_factor: f64) -> Self {
        Self { load_factor, ..Self::default() }
    }

    /// Effective fill ratio at which growth triggers
    #[must_use]
    pub fn effective_load_factor(&self) -> f64 {
        (self.load_factor + self.deviation).min(self.max_load_factor)
    }

    /// Replaces every out-of-range field with its default.
    ///
    /// Returns the usable config and one warning per replaced field. Each
    /// warning is also logged.
    #[must_use]
    pub fn validated(self) -> (Self, Vec<ConfigWarning>) {
        let mut config = self;
        let mut warnings = Vec::new();

        if !in_unit_interval(config.load_factor) {
            warnings.push(ConfigWarning::LoadFactorOutOfRange { requested: config.load_factor });
            config.load_factor = DEFAULT_LOAD_FACTOR;
        }
        if !(config.deviation.is_finite() && config.deviation >= 0.0) {
            warnings.push(ConfigWarning::DeviationOutOfRange { requested: config.deviation });
            config.deviation = DEFAULT_DEVIATION;
        }
        if !in_unit_interval(config.max_load_factor) {
            warnings
                .push(ConfigWarning::MaxLoadFactorOutOfRange { requested: config.max_load_factor });
            config.max_load_factor = DEFAULT_MAX_LOAD_FACTOR;
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        (config, warnings)
    }
}

/// Clamps a requested initial capacity to at least one slot
pub(crate) fn validated_capacity(requested: usize) -> (usize, Option<ConfigWarning>) {
    if requested == 0 {
        let warning = ConfigWarning::CapacityClamped { requested };
        tracing::warn!("{warning}");
        (1, Some(warning))
    } else {
        (requested, None)
    }
}

/// `(0, 1]`. NaN is outside.
fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let (config, warnings) = ProbingConfig::default().validated();
        assert!(warnings.is_empty());
        assert_eq!(config, ProbingConfig::default());
        assert!((config.effective_load_factor() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_load_factor_bounds() {
        for bad in [0.0, -0.5, 1.01, f64::NAN, f64::INFINITY] {
            let (config, warnings) = ProbingConfig::with_load_factor(bad).validated();
            assert!((config.load_factor - DEFAULT_LOAD_FACTOR).abs() < f64::EPSILON);
            assert_eq!(warnings.len(), 1);
            assert!(matches!(warnings.first(), Some(ConfigWarning::LoadFactorOutOfRange { .. })));
        }

        let (config, warnings) = ProbingConfig::with_load_factor(1.0).validated();
        assert!(warnings.is_empty());
        assert!((config.load_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let config = ProbingConfig { load_factor: 2.0, deviation: -1.0, max_load_factor: 0.0 };
        let (config, warnings) = config.validated();
        assert_eq!(config, ProbingConfig::default());
        assert_eq!(
            warnings,
            vec![
                ConfigWarning::LoadFactorOutOfRange { requested: 2.0 },
                ConfigWarning::DeviationOutOfRange { requested: -1.0 },
                ConfigWarning::MaxLoadFactorOutOfRange { requested: 0.0 },
            ]
        );
    }

    #[test]
    fn test_cap_limits_effective_load_factor() {
        let config = ProbingConfig { load_factor: 0.9, ..ProbingConfig::default() };
        assert!((config.effective_load_factor() - DEFAULT_MAX_LOAD_FACTOR).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_clamp() {
        assert_eq!(validated_capacity(0), (1, Some(ConfigWarning::CapacityClamped { requested: 0 })));
        assert_eq!(validated_capacity(7), (7, None));
    }

    #[test]
    fn test_warning_messages() {
        let message = ConfigWarning::LoadFactorOutOfRange { requested: 1.5 }.to_string();
        assert!(message.contains("1.5"));
        assert!(message.contains("0.5"));
    }
}
