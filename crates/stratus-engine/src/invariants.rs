//! Rotational invariants of the cloud.
//!
//! Base invariants are computed from the current and previous snapshots every
//! step. Derived invariants (precession, instability, market mood) need a
//! short trailing history and are zero until the metrics log holds enough
//! rows.

use ndarray::Array2;
use rand::Rng;
use stratus_math::principal_axes;

/// Number of histogram bins for the pairwise-distance entropy.
pub const ENTROPY_BINS: usize = 20;

/// Upper edge of the entropy histogram range `[0, 5]`.
pub const ENTROPY_RANGE: f64 = 5.0;

/// Rows of trailing history required before derived invariants are emitted.
pub const DERIVED_MIN_HISTORY: usize = 5;

/// Weights of the (monetary, inflation, risk) axes in the market mood.
const MOOD_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

/// Guard against division by zero in the instability ratio.
const INSTABILITY_EPSILON: f64 = 1e-6;

/// Mean Euclidean displacement between the two snapshots.
pub fn mean_displacement(current: &Array2<f64>, previous: &Array2<f64>) -> f64 {
    let n = current.nrows();
    if n == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        let dx = current[[i, 0]] - previous[[i, 0]];
        let dy = current[[i, 1]] - previous[[i, 1]];
        let dz = current[[i, 2]] - previous[[i, 2]];
        total += (dx * dx + dy * dy + dz * dz).sqrt();
    }
    total / n as f64
}

/// Shannon entropy (nats) of the pairwise-distance histogram.
///
/// Distances are binned into [`ENTROPY_BINS`] equal bins over
/// `[0, ENTROPY_RANGE]`; distances beyond the range are discarded. An empty
/// histogram yields 0.
pub fn pairwise_distance_entropy(points: &Array2<f64>) -> f64 {
    let n = points.nrows();
    let mut counts = [0u64; ENTROPY_BINS];
    let bin_width = ENTROPY_RANGE / ENTROPY_BINS as f64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = points[[i, 0]] - points[[j, 0]];
            let dy = points[[i, 1]] - points[[j, 1]];
            let dz = points[[i, 2]] - points[[j, 2]];
            let dist = (dx * dx + dy * dy + dz * dz).sqrt();
            if dist.is_finite() && dist <= ENTROPY_RANGE {
                let bin = ((dist / bin_width) as usize).min(ENTROPY_BINS - 1);
                counts[bin] += 1;
            }
        }
    }

    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &count in &counts {
        if count > 0 {
            let p = count as f64 / total as f64;
            entropy -= p * p.ln();
        }
    }
    entropy
}

/// Angle of the cloud's principal axis against the monetary axis `(1, 0, 0)`.
pub fn principal_axis_angle<R: Rng + ?Sized>(points: &Array2<f64>, rng: &mut R) -> f64 {
    let pca = principal_axes(points, rng);
    let axis = pca.principal();
    axis[0].clamp(-1.0, 1.0).acos()
}

/// Rotational kinetic energy `Σᵢ ‖rᵢ × vᵢ‖² / N` with `v = current − previous`.
pub fn rotational_energy(current: &Array2<f64>, previous: &Array2<f64>) -> f64 {
    let n = current.nrows();
    if n == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        let r = [current[[i, 0]], current[[i, 1]], current[[i, 2]]];
        let v = [
            current[[i, 0]] - previous[[i, 0]],
            current[[i, 1]] - previous[[i, 1]],
            current[[i, 2]] - previous[[i, 2]],
        ];
        let l = [
            r[1] * v[2] - r[2] * v[1],
            r[2] * v[0] - r[0] * v[2],
            r[0] * v[1] - r[1] * v[0],
        ];
        total += l[0] * l[0] + l[1] * l[1] + l[2] * l[2];
    }
    total / n as f64
}

/// Mean of the second-order numerical gradient of a short series.
///
/// One-sided differences at the ends, centered differences inside — the
/// precession is this mean over the trailing axis angles.
pub fn gradient_mean(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = values[1] - values[0];
    for i in 1..n - 1 {
        total += (values[i + 1] - values[i - 1]) / 2.0;
    }
    total += values[n - 1] - values[n - 2];
    total / n as f64
}

/// Structural instability: recent rotational energy over recent displacement.
pub fn instability(energies: &[f64], deltas: &[f64]) -> f64 {
    if energies.is_empty() || deltas.is_empty() {
        return 0.0;
    }
    let mean_energy = energies.iter().sum::<f64>() / energies.len() as f64;
    let mean_delta = deltas.iter().sum::<f64>() / deltas.len() as f64;
    mean_energy / (mean_delta + INSTABILITY_EPSILON)
}

/// Directional bias of the flow: the displacement matrix's principal axis
/// projected onto the weighted macro axes.
pub fn market_mood<R: Rng + ?Sized>(
    current: &Array2<f64>,
    previous: &Array2<f64>,
    rng: &mut R,
) -> f64 {
    let mut displacement = current - previous;
    for v in displacement.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }

    let pca = principal_axes(&displacement, rng);
    let direction = pca.principal();
    MOOD_WEIGHTS[0] * direction[0] + MOOD_WEIGHTS[1] * direction[1] + MOOD_WEIGHTS[2] * direction[2]
}
