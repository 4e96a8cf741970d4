//! Principal component analysis of 3-D point clouds.
//!
//! Operates on the 3×3 covariance matrix of an N×3 sample and diagonalizes it
//! with a cyclic Jacobi sweep, which is stable for symmetric matrices of this
//! size. Degenerate inputs are handled up front: non-finite entries are
//! zeroed and a cloud with (near-)zero total variance receives a tiny
//! Gaussian perturbation before decomposition, so the routine always returns
//! usable axes.

use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;

/// Total-variance threshold below which the input is considered degenerate.
pub const DEGENERACY_TOLERANCE: f64 = 1e-18;

/// Standard deviation of the noise injected into degenerate inputs.
const NOISE_STD: f64 = 1e-10;

/// Convergence tolerance for off-diagonal elements in the Jacobi sweep.
const JACOBI_TOLERANCE: f64 = 1e-12;

/// Maximum Jacobi rotations; a 3×3 symmetric matrix converges in far fewer.
const MAX_ROTATIONS: usize = 100;

/// Principal axes of a point cloud.
#[derive(Debug, Clone, Copy)]
pub struct PcaResult {
    /// Unit-length principal axes, rows ordered by descending variance.
    pub axes: [[f64; 3]; 3],
    /// Explained variances (eigenvalues of the covariance matrix), descending.
    pub variances: [f64; 3],
}

impl PcaResult {
    /// The axis explaining the most variance.
    pub const fn principal(&self) -> [f64; 3] {
        self.axes[0]
    }
}

/// Compute the principal axes of an N×3 point cloud.
///
/// Non-finite entries are replaced with zero. If the total variance across
/// all three columns is at most [`DEGENERACY_TOLERANCE`], zero-mean Gaussian
/// noise of std `1e-10` is drawn from `rng` and added before decomposing, so
/// the decomposition never fails. The returned axes are unit length, ordered
/// by descending eigenvalue, and sign-fixed so that the first component of
/// non-negligible magnitude is positive. Fixing the sign off the leading
/// component keeps the orientation stable under sampling noise even when two
/// components tie in magnitude, which matters for consumers differencing the
/// axis over time.
pub fn principal_axes<R: Rng + ?Sized>(points: &Array2<f64>, rng: &mut R) -> PcaResult {
    let mut data = points.clone();
    for v in data.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }

    let mut cov = covariance3(&data);
    let total_variance = cov[0][0] + cov[1][1] + cov[2][2];
    if total_variance <= DEGENERACY_TOLERANCE {
        for v in data.iter_mut() {
            let noise: f64 = rng.sample(StandardNormal);
            *v += NOISE_STD * noise;
        }
        cov = covariance3(&data);
    }

    let (variances, mut axes) = jacobi3(&cov);
    for axis in axes.iter_mut() {
        orient(axis);
    }

    PcaResult { axes, variances }
}

/// Population covariance matrix of the three columns.
fn covariance3(data: &Array2<f64>) -> [[f64; 3]; 3] {
    let n = data.nrows();
    if n == 0 {
        return [[0.0; 3]; 3];
    }

    let mut mean = [0.0f64; 3];
    for row in data.rows() {
        for c in 0..3 {
            mean[c] += row[c];
        }
    }
    for m in mean.iter_mut() {
        *m /= n as f64;
    }

    let mut cov = [[0.0f64; 3]; 3];
    for row in data.rows() {
        for i in 0..3 {
            for j in 0..3 {
                cov[i][j] += (row[i] - mean[i]) * (row[j] - mean[j]);
            }
        }
    }
    for r in cov.iter_mut() {
        for v in r.iter_mut() {
            *v /= n as f64;
        }
    }
    cov
}

/// Jacobi eigendecomposition of a symmetric 3×3 matrix.
///
/// Returns eigenvalues in descending order and the matching unit
/// eigenvectors as rows.
fn jacobi3(matrix: &[[f64; 3]; 3]) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut a = *matrix;
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..MAX_ROTATIONS {
        let (p, q) = largest_off_diagonal(&a);
        if a[p][q].abs() < JACOBI_TOLERANCE {
            break;
        }

        let (cos_theta, sin_theta) = rotation_angles(a[p][p], a[q][q], a[p][q]);
        rotate(&mut a, &mut v, p, q, cos_theta, sin_theta);
    }

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| a[j][j].partial_cmp(&a[i][i]).unwrap_or(std::cmp::Ordering::Equal));

    let mut eigenvalues = [0.0f64; 3];
    let mut eigenvectors = [[0.0f64; 3]; 3];
    for (rank, &idx) in order.iter().enumerate() {
        eigenvalues[rank] = a[idx][idx];
        for c in 0..3 {
            // Columns of v are eigenvectors; emit them as rows
            eigenvectors[rank][c] = v[c][idx];
        }
    }

    (eigenvalues, eigenvectors)
}

fn largest_off_diagonal(a: &[[f64; 3]; 3]) -> (usize, usize) {
    let mut p = 0;
    let mut q = 1;
    let mut max_val = a[0][1].abs();
    for (i, j) in [(0usize, 2usize), (1, 2)] {
        if a[i][j].abs() > max_val {
            max_val = a[i][j].abs();
            p = i;
            q = j;
        }
    }
    (p, q)
}

fn rotation_angles(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    if apq.abs() < 1e-15 {
        return (1.0, 0.0);
    }

    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };
    let cos_theta = 1.0 / (1.0 + t * t).sqrt();
    let sin_theta = t * cos_theta;
    (cos_theta, sin_theta)
}

fn rotate(
    a: &mut [[f64; 3]; 3],
    v: &mut [[f64; 3]; 3],
    p: usize,
    q: usize,
    cos_theta: f64,
    sin_theta: f64,
) {
    let app = a[p][p];
    let aqq = a[q][q];
    let apq = a[p][q];

    a[p][p] = cos_theta * cos_theta * app - 2.0 * cos_theta * sin_theta * apq
        + sin_theta * sin_theta * aqq;
    a[q][q] =
        sin_theta * sin_theta * app + 2.0 * cos_theta * sin_theta * apq + cos_theta * cos_theta * aqq;
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    for i in 0..3 {
        if i != p && i != q {
            let aip = a[i][p];
            let aiq = a[i][q];
            a[i][p] = cos_theta * aip - sin_theta * aiq;
            a[p][i] = a[i][p];
            a[i][q] = sin_theta * aip + cos_theta * aiq;
            a[q][i] = a[i][q];
        }
    }

    for row in v.iter_mut() {
        let vip = row[p];
        let viq = row[q];
        row[p] = cos_theta * vip - sin_theta * viq;
        row[q] = sin_theta * vip + cos_theta * viq;
    }
}

/// Fix the sign ambiguity: the first component of non-negligible magnitude
/// becomes positive.
fn orient(axis: &mut [f64; 3]) {
    for c in 0..3 {
        if axis[c].abs() > 1e-12 {
            if axis[c] < 0.0 {
                for v in axis.iter_mut() {
                    *v = -*v;
                }
            }
            return;
        }
    }
}
