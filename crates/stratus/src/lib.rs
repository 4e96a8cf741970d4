#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stratusfx/stratus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export sub-crates
pub use stratus_engine as engine;
pub use stratus_factors as factors;
pub use stratus_math as math;

// Re-export the types most consumers need
pub use stratus_engine::{Engine, EngineConfig, Signal, SignalThresholds, StepMetrics, StepResult};
pub use stratus_factors::{
    CountryCode, InstrumentCatalog, InstrumentDescriptor, Observation, PolicyRuleConfig, Regime,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
