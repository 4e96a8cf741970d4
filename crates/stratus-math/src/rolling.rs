//! Fixed-capacity rolling windows over scalar series.
//!
//! A [`RollingWindow`] keeps the last `capacity` observations with O(1)
//! append-and-evict and exposes population statistics that degrade gracefully
//! on low-variance inputs. The correlation used throughout Stratus is the
//! Pearson correlation of *first differences*, which is undefined (and
//! reported as `None`) when either differenced series carries no variation.

use crate::MathError;
use std::collections::VecDeque;

/// Fixed-capacity ordered sequence of scalars.
///
/// Pushing beyond capacity evicts the oldest element.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` observations.
    ///
    /// # Errors
    /// Returns [`MathError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, MathError> {
        if capacity == 0 {
            return Err(MathError::InvalidCapacity(capacity));
        }
        Ok(Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append an observation, evicting the oldest one at capacity.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Number of observations currently held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of observations the window can hold.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Iterate over the held observations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Drop all observations.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Population mean of the held observations (0 when empty).
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation of the held observations (0 when empty).
    pub fn std(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let n = self.values.len() as f64;
        let variance = self.values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    }

    /// Pearson correlation of the first differences of the two windows.
    ///
    /// Uses the last `k = min(self.len(), other.len()) - 1` difference pairs.
    /// Returns `None` when `k < 2` or when either differenced series has zero
    /// standard deviation; callers retain their previous correlation in that
    /// case.
    pub fn diff_corr(&self, other: &Self) -> Option<f64> {
        let k = self.len().min(other.len()).checked_sub(1)?;
        if k < 2 {
            return None;
        }
        let a = trailing_differences(&self.values, k);
        let b = trailing_differences(&other.values, k);
        pearson(&a, &b)
    }
}

/// First differences of the last `pairs + 1` values, oldest first.
fn trailing_differences(values: &VecDeque<f64>, pairs: usize) -> Vec<f64> {
    let tail: Vec<f64> = values.iter().skip(values.len() - (pairs + 1)).copied().collect();
    tail.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Population Pearson correlation; `None` when either side has zero variance.
fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let var_a = a.iter().map(|&v| (v - mean_a).powi(2)).sum::<f64>() / n;
    let var_b = b.iter().map(|&v| (v - mean_b).powi(2)).sum::<f64>() / n;
    let std_a = var_a.sqrt();
    let std_b = var_b.sqrt();
    if std_a <= 0.0 || std_b <= 0.0 {
        return None;
    }

    let cov = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / n;

    Some(cov / (std_a * std_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window_from(values: &[f64], capacity: usize) -> RollingWindow {
        let mut w = RollingWindow::new(capacity).unwrap();
        for &v in values {
            w.push(v);
        }
        w
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(RollingWindow::new(0).is_err());
    }

    #[test]
    fn test_push_evicts_at_capacity() {
        let w = window_from(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(w.len(), 3);
        let held: Vec<f64> = w.iter().collect();
        assert_eq!(held, vec![3.0, 4.0, 5.0]);
        assert_eq!(w.latest(), Some(5.0));
    }

    #[test]
    fn test_mean_and_std_population() {
        let w = window_from(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 10);
        assert_relative_eq!(w.mean(), 5.0, epsilon = 1e-12);
        // Population std of the canonical example is exactly 2
        assert_relative_eq!(w.std(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_statistics_are_zero() {
        let w = RollingWindow::new(5).unwrap();
        assert_eq!(w.mean(), 0.0);
        assert_eq!(w.std(), 0.0);
        assert!(w.is_empty());
    }

    #[test]
    fn test_diff_corr_needs_three_points() {
        // Two points give a single difference pair, which is not enough
        let a = window_from(&[1.0, 2.0], 10);
        let b = window_from(&[3.0, 1.0], 10);
        assert!(a.diff_corr(&b).is_none());
    }

    #[test]
    fn test_diff_corr_constant_series_is_none() {
        let a = window_from(&[5.0, 5.0, 5.0, 5.0], 10);
        let b = window_from(&[1.0, 2.0, 4.0, 8.0], 10);
        assert!(a.diff_corr(&b).is_none());
        assert!(b.diff_corr(&a).is_none());
    }

    #[test]
    fn test_diff_corr_perfectly_correlated() {
        let a = window_from(&[0.0, 1.0, 3.0, 6.0, 10.0], 10);
        let b = window_from(&[0.0, 2.0, 6.0, 12.0, 20.0], 10);
        let corr = a.diff_corr(&b).unwrap();
        assert_relative_eq!(corr, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_corr_anti_correlated() {
        let a = window_from(&[0.0, 1.0, 3.0, 6.0, 10.0], 10);
        let b = window_from(&[0.0, -1.0, -3.0, -6.0, -10.0], 10);
        let corr = a.diff_corr(&b).unwrap();
        assert_relative_eq!(corr, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_corr_uses_shorter_window() {
        // Lengths 5 and 3 give k = 2 pairs, taken from the tails
        let a = window_from(&[100.0, 0.0, 1.0, 3.0, 6.0], 10);
        let b = window_from(&[1.0, 3.0, 6.0], 10);
        let corr = a.diff_corr(&b).unwrap();
        assert_relative_eq!(corr, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clear_empties_window() {
        let mut w = window_from(&[1.0, 2.0], 4);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.latest(), None);
    }
}
