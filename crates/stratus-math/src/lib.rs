#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stratusfx/stratus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod gaussian;
pub mod pca;
pub mod rolling;
pub mod rotation;

// Re-export main types
pub use gaussian::{cholesky3, sample_mvn3};
pub use pca::{PcaResult, principal_axes};
pub use rolling::RollingWindow;
pub use rotation::{Quaternion, rotate_points, rotation_matrix};

use thiserror::Error;

/// Errors that can occur in the numerical primitives.
#[derive(Debug, Error)]
pub enum MathError {
    /// Rolling window created with a zero capacity
    #[error("invalid window capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Matrix handed to the Cholesky factorization is not positive definite
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
}
