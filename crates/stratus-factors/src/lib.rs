#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stratusfx/stratus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod correlation;
pub mod forces;
pub mod instrument;
pub mod natural_rate;
pub mod observation;

// Re-export main types
pub use correlation::CorrelationTracker;
pub use forces::{Forces, amplify, base_forces, risk_multiplier};
pub use instrument::{CountryCode, InstrumentCatalog, InstrumentDescriptor};
pub use natural_rate::{NaturalRateEstimator, PolicyRuleConfig, Regime};
pub use observation::{DEFAULT_VIX, Observation};

use thiserror::Error;

/// Errors raised while constructing factor components.
#[derive(Debug, Error)]
pub enum FactorError {
    /// A configuration value is out of its admissible range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical primitive error
    #[error("Math error: {0}")]
    Math(#[from] stratus_math::MathError),
}
