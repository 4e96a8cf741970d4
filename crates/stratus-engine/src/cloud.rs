//! Point-cloud state and regime-conditioned redistribution.
//!
//! The cloud is an N×3 empirical distribution over the (monetary, inflation,
//! risk) state space. Each step it is redistributed from a multivariate
//! normal whose mean is the current force vector and whose covariance depends
//! on the monetary regime, then rotated by the force rotation. `previous`
//! always holds the prior step's final cloud, so per-step displacements
//! reflect redistribution and rotation together — downstream invariants are
//! tuned against exactly this definition.

use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use stratus_factors::{Forces, Regime};
use stratus_math::{cholesky3, rotate_points, sample_mvn3};

/// Baseline covariance of the cloud distribution in target equilibrium.
///
/// Symmetric and diagonally dominant, hence positive-definite.
pub const BASELINE_COVARIANCE: [[f64; 3]; 3] = [
    [1.0, 0.1, -0.1],
    [0.1, 1.0, -0.1],
    [-0.1, -0.1, 1.0],
];

const IDENTITY3: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Standard deviation of the i.i.d. noise added to the seed cloud.
const SEED_NOISE_STD: f64 = 0.01;

/// Cap on the lower-bound coupling sensitivity.
const MAX_SENSITIVITY: f64 = 0.8;

/// Covariance used while the lower bound is at risk of binding.
///
/// Cross-dimension couplings strengthen with the lower-bound probability,
/// capped at a sensitivity of 0.8.
pub fn lower_bound_covariance(lb_prob: f64) -> [[f64; 3]; 3] {
    let s = (1.5 * lb_prob).min(MAX_SENSITIVITY);
    [
        [1.0, 0.3 * s, -0.4 * s],
        [0.3 * s, 1.0, -0.3 * s],
        [-0.4 * s, -0.3 * s, 1.0],
    ]
}

/// Redistribution covariance for the given regime.
pub fn regime_covariance(regime: Regime, lb_prob: f64) -> [[f64; 3]; 3] {
    match regime {
        Regime::TargetEquilibrium => BASELINE_COVARIANCE,
        Regime::LowerBoundRisk => lower_bound_covariance(lb_prob),
    }
}

/// Per-instrument cloud state: the seed cloud plus the current and previous
/// snapshots.
#[derive(Debug, Clone)]
pub struct PointCloud {
    initial: Array2<f64>,
    current: Array2<f64>,
    previous: Array2<f64>,
    baseline_chol: [[f64; 3]; 3],
}

impl PointCloud {
    /// Draw the seed cloud from `N(0, Σ₀)` plus small i.i.d. noise.
    ///
    /// Deterministic for a given RNG state; the engine owns and seeds the
    /// RNG, so identical seeds give identical clouds.
    pub fn seeded<R: Rng + ?Sized>(num_points: usize, rng: &mut R) -> Self {
        // Σ₀ is positive-definite by construction; the fallback only guards
        // the factorization contract
        let baseline_chol = cholesky3(&BASELINE_COVARIANCE).unwrap_or(IDENTITY3);

        let mut initial = sample_mvn3([0.0; 3], &baseline_chol, num_points, rng);
        for v in initial.iter_mut() {
            let noise: f64 = rng.sample(StandardNormal);
            *v += SEED_NOISE_STD * noise;
        }

        let current = initial.clone();
        let previous = initial.clone();
        Self {
            initial,
            current,
            previous,
            baseline_chol,
        }
    }

    /// Number of points in the cloud.
    pub fn num_points(&self) -> usize {
        self.current.nrows()
    }

    /// The post-step cloud.
    pub const fn current(&self) -> &Array2<f64> {
        &self.current
    }

    /// The prior step's final cloud.
    pub const fn previous(&self) -> &Array2<f64> {
        &self.previous
    }

    /// The seed cloud.
    pub const fn initial(&self) -> &Array2<f64> {
        &self.initial
    }

    /// Snapshot `current → previous`, then replace `current` with fresh
    /// samples from `N(mean, cov)`.
    ///
    /// A covariance that fails to factor falls back to the baseline factor;
    /// the step never aborts.
    pub fn redistribute<R: Rng + ?Sized>(
        &mut self,
        mean: [f64; 3],
        cov: &[[f64; 3]; 3],
        rng: &mut R,
    ) {
        self.previous.assign(&self.current);
        let chol = cholesky3(cov).unwrap_or(self.baseline_chol);
        self.current = sample_mvn3(mean, &chol, self.num_points(), rng);
    }

    /// Rotate `current` in place by the composed force rotation.
    pub fn rotate(&mut self, forces: &Forces, scale: f64) {
        rotate_points(&mut self.current, forces.x, forces.y, forces.z, scale);
    }

    /// Replace non-finite coordinates with zero.
    pub fn sanitize(&mut self) {
        for v in self.current.iter_mut() {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
    }

    /// Restore both snapshots to the seed cloud.
    pub fn reset_to_initial(&mut self) {
        self.current.assign(&self.initial);
        self.previous.assign(&self.initial);
    }
}
