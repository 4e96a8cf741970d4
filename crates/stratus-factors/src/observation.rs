//! Macro observation records.
//!
//! An [`Observation`] is a thin wrapper around a `name → value` mapping with
//! typed accessors for the indicators the engine consumes. Pair-specific keys
//! follow the `US-CC_*` convention, where `CC` is the instrument's country
//! code: `US-JP_2Y`, `US-JP_10Y`, `US-JP_CPI_YOY`, plus the global `VIX`.
//! Missing keys default to 0, except `VIX` which defaults to 20. Unknown keys
//! are carried but ignored.

use crate::instrument::CountryCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default VIX level used when the indicator is absent.
pub const DEFAULT_VIX: f64 = 20.0;

/// A single cross-country macro observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    values: HashMap<String, f64>,
}

impl Observation {
    /// Create an empty observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an indicator value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Set an indicator value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Raw lookup of an indicator by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of indicators carried.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the observation carries no indicators.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// US-vs-foreign 2-year yield spread for the given country (default 0).
    pub fn yield_spread_2y(&self, code: CountryCode) -> f64 {
        self.indicator(code, "2Y")
    }

    /// US-vs-foreign 10-year yield spread for the given country (default 0).
    pub fn yield_spread_10y(&self, code: CountryCode) -> f64 {
        self.indicator(code, "10Y")
    }

    /// US-vs-foreign CPI year-over-year differential (default 0).
    pub fn inflation_differential(&self, code: CountryCode) -> f64 {
        self.indicator(code, "CPI_YOY")
    }

    /// Global VIX level (default [`DEFAULT_VIX`]).
    pub fn vix(&self) -> f64 {
        self.get("VIX").unwrap_or(DEFAULT_VIX)
    }

    fn indicator(&self, code: CountryCode, suffix: &str) -> f64 {
        self.get(&format!("US-{}_{}", code.as_str(), suffix))
            .unwrap_or(0.0)
    }
}

impl FromIterator<(String, f64)> for Observation {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_zero() {
        let obs = Observation::new();
        assert_eq!(obs.yield_spread_2y(CountryCode::Jp), 0.0);
        assert_eq!(obs.yield_spread_10y(CountryCode::Eu), 0.0);
        assert_eq!(obs.inflation_differential(CountryCode::Ca), 0.0);
    }

    #[test]
    fn test_vix_defaults_to_twenty() {
        let obs = Observation::new();
        assert_eq!(obs.vix(), 20.0);
        let obs = obs.with("VIX", 31.5);
        assert_eq!(obs.vix(), 31.5);
    }

    #[test]
    fn test_pair_specific_keys() {
        let obs = Observation::new()
            .with("US-JP_2Y", 1.25)
            .with("US-JP_10Y", 0.75)
            .with("US-JP_CPI_YOY", -0.5);

        assert_eq!(obs.yield_spread_2y(CountryCode::Jp), 1.25);
        assert_eq!(obs.yield_spread_10y(CountryCode::Jp), 0.75);
        assert_eq!(obs.inflation_differential(CountryCode::Jp), -0.5);

        // The same observation read through another country code sees nothing
        assert_eq!(obs.yield_spread_2y(CountryCode::Eu), 0.0);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let obs = Observation::new().with("US-JP_UNEMPLOYMENT", 3.1);
        assert_eq!(obs.yield_spread_2y(CountryCode::Jp), 0.0);
        assert_eq!(obs.len(), 1);
    }
}
