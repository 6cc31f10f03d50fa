//! Emissions factors per transport mode.
//!
//! Factors are opaque scale factors applied to `distance * weight`. The table
//! is built once at start-up and only read afterwards.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{EcoTrackError, ErrorCode, Result};

/// Mode every unknown or empty mode string falls back to
pub const DEFAULT_MODE: &str = "truck";

/// Built-in factors, keyed by lowercase mode name
pub const DEFAULT_FACTORS: &[(&str, f64)] = &[
    ("truck", 0.02),
    ("train", 0.015),
    ("ship", 0.01),
    ("plane", 0.05),
];

/// Normalize a raw mode string for lookup
pub fn normalize_mode(mode: &str) -> String {
    mode.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsFactorTable {
    factors: BTreeMap<String, f64>,
}

impl Default for EmissionsFactorTable {
    fn default() -> Self {
        Self {
            factors: DEFAULT_FACTORS
                .iter()
                .map(|(mode, factor)| (mode.to_string(), *factor))
                .collect(),
        }
    }
}

impl EmissionsFactorTable {
    /// Build a table from the defaults with `overrides` merged on top.
    ///
    /// Override keys are normalized; every factor must be finite and positive.
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        let mut table = Self::default();
        for (mode, factor) in overrides {
            let key = normalize_mode(mode);
            if key.is_empty() {
                return Err(EcoTrackError::config(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    "emissions factor override has an empty mode name",
                ));
            }
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(EcoTrackError::config(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    format!("emissions factor for '{key}' must be positive, got {factor}"),
                ));
            }
            table.factors.insert(key, *factor);
        }
        Ok(table)
    }

    /// Resolve a raw mode string to the mode name actually used for lookup
    pub fn resolve_mode(&self, mode: &str) -> String {
        let key = normalize_mode(mode);
        if self.factors.contains_key(&key) {
            key
        } else {
            DEFAULT_MODE.to_string()
        }
    }

    /// Factor for `mode`; unknown and empty modes get the truck factor.
    pub fn factor_for(&self, mode: &str) -> f64 {
        let key = normalize_mode(mode);
        self.factors
            .get(&key)
            .or_else(|| self.factors.get(DEFAULT_MODE))
            .copied()
            .unwrap_or(0.02)
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.factors.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_factors() {
        let table = EmissionsFactorTable::default();
        assert_eq!(table.factor_for("truck"), 0.02);
        assert_eq!(table.factor_for("train"), 0.015);
        assert_eq!(table.factor_for("ship"), 0.01);
        assert_eq!(table.factor_for("plane"), 0.05);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = EmissionsFactorTable::default();
        assert_eq!(table.factor_for("PLANE"), 0.05);
        assert_eq!(table.factor_for(" Train "), 0.015);
    }

    #[test]
    fn test_unknown_and_empty_fall_back_to_truck() {
        let table = EmissionsFactorTable::default();
        assert_eq!(table.factor_for(""), 0.02);
        assert_eq!(table.factor_for("rocket"), 0.02);
        assert_eq!(table.resolve_mode("rocket"), "truck");
        assert_eq!(table.resolve_mode("Ship"), "ship");
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let overrides = BTreeMap::from([
            ("Plane".to_string(), 0.08),
            ("barge".to_string(), 0.005),
        ]);
        let table = EmissionsFactorTable::with_overrides(&overrides).unwrap();
        assert_eq!(table.factor_for("plane"), 0.08);
        assert_eq!(table.factor_for("barge"), 0.005);
        assert_eq!(table.factor_for("truck"), 0.02);
        assert_eq!(table.modes().count(), 5);
    }

    #[test]
    fn test_overrides_reject_non_positive() {
        let overrides = BTreeMap::from([("ship".to_string(), 0.0)]);
        let err = EmissionsFactorTable::with_overrides(&overrides).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_VALUE);

        let overrides = BTreeMap::from([("ship".to_string(), f64::NAN)]);
        assert!(EmissionsFactorTable::with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_overrides_reject_empty_mode() {
        let overrides = BTreeMap::from([("  ".to_string(), 0.1)]);
        assert!(EmissionsFactorTable::with_overrides(&overrides).is_err());
    }

    proptest! {
        #[test]
        fn test_factor_for_is_total(mode in ".*") {
            let table = EmissionsFactorTable::default();
            let factor = table.factor_for(&mode);
            prop_assert!(factor > 0.0);
            if !table.modes().any(|m| m == normalize_mode(&mode)) {
                prop_assert_eq!(factor, 0.02);
            }
        }
    }
}
