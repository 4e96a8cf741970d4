//! Instrument catalog for the supported FX pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Foreign-leg country codes recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    /// Japan
    Jp,
    /// Canada
    Ca,
    /// Australia
    Au,
    /// Euro area
    Eu,
    /// United Kingdom
    Gb,
}

impl CountryCode {
    /// Returns all country codes.
    pub fn all() -> Vec<Self> {
        vec![Self::Jp, Self::Ca, Self::Au, Self::Eu, Self::Gb]
    }

    /// Two-letter code as used in indicator keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jp => "JP",
            Self::Ca => "CA",
            Self::Au => "AU",
            Self::Eu => "EU",
            Self::Gb => "GB",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static description of one tradable FX pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    /// Pair name, e.g. `USDJPY`.
    pub pair: String,
    /// Country code of the foreign leg.
    pub country_code: CountryCode,
    /// Whether USD is the quote currency; flips the sign of all forces.
    pub inverted: bool,
}

impl InstrumentDescriptor {
    /// Create a descriptor.
    pub fn new(pair: impl Into<String>, country_code: CountryCode, inverted: bool) -> Self {
        Self {
            pair: pair.into(),
            country_code,
            inverted,
        }
    }

    /// Sign applied to every force computed for this pair.
    pub const fn force_multiplier(&self) -> f64 {
        if self.inverted { -1.0 } else { 1.0 }
    }
}

/// The fixed catalog of supported pairs.
///
/// Unknown pairs silently fall back to the JP/non-inverted defaults.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    descriptors: Vec<InstrumentDescriptor>,
}

impl InstrumentCatalog {
    /// Create the catalog with the default pair table.
    pub fn new() -> Self {
        let descriptors = vec![
            InstrumentDescriptor::new("USDJPY", CountryCode::Jp, false),
            InstrumentDescriptor::new("USDCAD", CountryCode::Ca, false),
            InstrumentDescriptor::new("AUDUSD", CountryCode::Au, true),
            InstrumentDescriptor::new("EURUSD", CountryCode::Eu, true),
            InstrumentDescriptor::new("GBPUSD", CountryCode::Gb, true),
        ];
        Self { descriptors }
    }

    /// All catalogued descriptors.
    pub fn descriptors(&self) -> &[InstrumentDescriptor] {
        &self.descriptors
    }

    /// All catalogued pair names.
    pub fn pairs(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.pair.as_str()).collect()
    }

    /// Whether a pair is catalogued.
    pub fn contains(&self, pair: &str) -> bool {
        self.descriptors.iter().any(|d| d.pair == pair)
    }

    /// Descriptor for a pair; unknown pairs get JP/non-inverted defaults.
    pub fn descriptor(&self, pair: &str) -> InstrumentDescriptor {
        self.descriptors
            .iter()
            .find(|d| d.pair == pair)
            .cloned()
            .unwrap_or_else(|| InstrumentDescriptor::new(pair, CountryCode::Jp, false))
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
