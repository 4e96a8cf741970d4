#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stratusfx/stratus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cloud;
pub mod engine;
pub mod invariants;
pub mod signal;

// Re-export main types
pub use cloud::PointCloud;
pub use engine::{Engine, EngineConfig, StepMetrics, StepResult};
pub use signal::{Signal, SignalThresholds};

use thiserror::Error;

/// Errors reported at engine construction.
///
/// A constructed engine never fails: `step()` always returns a well-formed
/// result, degrading metrics to zero where prerequisites are missing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Cloud too small for PCA and pairwise statistics
    #[error("Insufficient cloud size: need at least {required} points, got {actual}")]
    InvalidPointCount {
        /// Minimum admissible number of points
        required: usize,
        /// Configured number of points
        actual: usize,
    },

    /// Rolling window too small to ever hold a difference pair
    #[error("Insufficient window: need capacity of at least {required}, got {actual}")]
    InvalidWindow {
        /// Minimum admissible capacity
        required: usize,
        /// Configured capacity
        actual: usize,
    },

    /// A configuration value is out of its admissible range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Factor-layer construction error
    #[error("Factor error: {0}")]
    Factor(#[from] stratus_factors::FactorError),

    /// Numerical primitive error
    #[error("Math error: {0}")]
    Math(#[from] stratus_math::MathError),
}
