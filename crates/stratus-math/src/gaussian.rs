//! Multivariate normal sampling in three dimensions.
//!
//! Sampling goes through the usual route: factor the covariance as `L·Lᵀ`
//! with a closed-form 3×3 Cholesky, then map standard normal draws through
//! `μ + L·z`. The innovations are moment-matched first — recentered and
//! rewhitened so their empirical mean and population covariance are exactly
//! zero and identity — which pins the sample moments of the output to the
//! requested `μ` and `Σ`. Consumers difference principal axes across redraws;
//! without moment matching the Monte Carlo error in the sample covariance
//! leaks into those invariants as spurious reorientation. The RNG is injected
//! so that every consumer owns its own deterministic stream.

use crate::MathError;
use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;

/// Lower-triangular Cholesky factor of a symmetric 3×3 matrix.
///
/// # Errors
/// Returns [`MathError::NotPositiveDefinite`] when any pivot is not strictly
/// positive.
pub fn cholesky3(cov: &[[f64; 3]; 3]) -> Result<[[f64; 3]; 3], MathError> {
    let mut l = [[0.0f64; 3]; 3];

    let d0 = cov[0][0];
    if d0 <= 0.0 || !d0.is_finite() {
        return Err(MathError::NotPositiveDefinite);
    }
    l[0][0] = d0.sqrt();
    l[1][0] = cov[1][0] / l[0][0];
    l[2][0] = cov[2][0] / l[0][0];

    let d1 = cov[1][1] - l[1][0] * l[1][0];
    if d1 <= 0.0 || !d1.is_finite() {
        return Err(MathError::NotPositiveDefinite);
    }
    l[1][1] = d1.sqrt();
    l[2][1] = (cov[2][1] - l[2][0] * l[1][0]) / l[1][1];

    let d2 = cov[2][2] - l[2][0] * l[2][0] - l[2][1] * l[2][1];
    if d2 <= 0.0 || !d2.is_finite() {
        return Err(MathError::NotPositiveDefinite);
    }
    l[2][2] = d2.sqrt();

    Ok(l)
}

/// Draw `num_points` moment-matched samples from `N(mean, L·Lᵀ)` given the
/// Cholesky factor `L`.
///
/// The empirical mean and population covariance of the returned sample equal
/// `mean` and `L·Lᵀ` up to rounding. Below 4 points the centered innovation
/// covariance is singular, so the raw draws are mapped through unmatched.
pub fn sample_mvn3<R: Rng + ?Sized>(
    mean: [f64; 3],
    chol: &[[f64; 3]; 3],
    num_points: usize,
    rng: &mut R,
) -> Array2<f64> {
    let mut z = Array2::<f64>::zeros((num_points, 3));
    for v in z.iter_mut() {
        *v = rng.sample(StandardNormal);
    }
    moment_match(&mut z);

    let mut out = Array2::<f64>::zeros((num_points, 3));
    for i in 0..num_points {
        for r in 0..3 {
            out[[i, r]] = mean[r]
                + chol[r][0] * z[[i, 0]]
                + chol[r][1] * z[[i, 1]]
                + chol[r][2] * z[[i, 2]];
        }
    }
    out
}

/// Recenter and rewhiten innovations so the empirical mean is zero and the
/// population covariance is the identity.
///
/// Skipped below 4 rows (the centered covariance is rank-deficient). If the
/// innovation covariance fails to factor, the centered draws are kept as-is.
fn moment_match(z: &mut Array2<f64>) {
    let n = z.nrows();
    if n < 4 {
        return;
    }

    let mut mean = [0.0f64; 3];
    for row in z.rows() {
        for c in 0..3 {
            mean[c] += row[c];
        }
    }
    for m in mean.iter_mut() {
        *m /= n as f64;
    }
    for mut row in z.rows_mut() {
        for c in 0..3 {
            row[c] -= mean[c];
        }
    }

    let mut cov = [[0.0f64; 3]; 3];
    for row in z.rows() {
        for i in 0..3 {
            for j in 0..3 {
                cov[i][j] += row[i] * row[j];
            }
        }
    }
    for r in cov.iter_mut() {
        for v in r.iter_mut() {
            *v /= n as f64;
        }
    }

    let Ok(a) = cholesky3(&cov) else { return };

    // Forward-substitute a·w = z' row by row
    for mut row in z.rows_mut() {
        let w0 = row[0] / a[0][0];
        let w1 = (row[1] - a[1][0] * w0) / a[1][1];
        let w2 = (row[2] - a[2][0] * w0 - a[2][1] * w1) / a[2][2];
        row[0] = w0;
        row[1] = w1;
        row[2] = w2;
    }
}
