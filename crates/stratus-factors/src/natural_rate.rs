//! Natural-rate estimation and monetary regime classification.
//!
//! The natural rate is proxied per step as `r* = s10 − π/2` (10-year spread
//! minus half the inflation differential) and smoothed with an exponential
//! moving average. The probability that the interest-rate lower bound binds
//! is a logistic mapping of the gap to the bound:
//!
//! ```text
//! P(lb) = 1 / (1 + exp(2·(r* − lower_bound)))
//! ```
//!
//! The regime threshold `(ψ−1)/ψ` comes from the monetary policy rule
//! coefficient ψ; with the default ψ = 1.5 the threshold is 1/3.

use crate::FactorError;
use crate::instrument::CountryCode;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};
use std::fmt;
use stratus_math::RollingWindow;

/// Monetary regime selected by the lower-bound probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Policy operates around its target equilibrium.
    TargetEquilibrium,
    /// The interest-rate lower bound is at risk of binding.
    LowerBoundRisk,
}

impl Regime {
    /// Upper-case name as emitted in result streams.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TargetEquilibrium => "TARGET_EQUILIBRIUM",
            Self::LowerBoundRisk => "LOWER_BOUND_RISK",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration of the policy rule behind the regime classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRuleConfig {
    /// Policy-rule coefficient ψ (default: 1.5). Must exceed 1.
    pub psi: f64,

    /// Interest-rate lower bound (default: 0.0).
    pub lower_bound: f64,

    /// EMA weight on the newest natural-rate estimate (default: 0.05).
    pub ema_alpha: f64,
}

impl Default for PolicyRuleConfig {
    fn default() -> Self {
        Self {
            psi: 1.5,
            lower_bound: 0.0,
            ema_alpha: 0.05,
        }
    }
}

impl PolicyRuleConfig {
    /// Regime threshold `(ψ−1)/ψ` on the lower-bound probability.
    pub fn regime_threshold(&self) -> f64 {
        (self.psi - 1.0) / self.psi
    }
}

/// EMA-smoothed natural-rate estimator with regime classification.
#[derive(Debug, Clone)]
pub struct NaturalRateEstimator {
    config: PolicyRuleConfig,
    natural_rate: Option<f64>,
    history: RollingWindow,
}

impl NaturalRateEstimator {
    /// Create an estimator keeping `window` natural-rate estimates.
    ///
    /// # Errors
    /// Returns [`FactorError::InvalidParameter`] when ψ ≤ 1, the EMA weight
    /// is outside (0, 1], or the lower bound is not finite.
    pub fn new(config: PolicyRuleConfig, window: usize) -> Result<Self, FactorError> {
        if !config.psi.is_finite() || config.psi <= 1.0 {
            return Err(FactorError::InvalidParameter(
                "psi must be finite and greater than 1".to_string(),
            ));
        }
        if !config.ema_alpha.is_finite() || config.ema_alpha <= 0.0 || config.ema_alpha > 1.0 {
            return Err(FactorError::InvalidParameter(
                "ema_alpha must be in (0, 1]".to_string(),
            ));
        }
        if !config.lower_bound.is_finite() {
            return Err(FactorError::InvalidParameter(
                "lower_bound must be finite".to_string(),
            ));
        }

        Ok(Self {
            config,
            natural_rate: None,
            history: RollingWindow::new(window)?,
        })
    }

    /// Fold one observation into the smoothed natural rate and return it.
    ///
    /// The first estimate is taken directly; later ones are blended as
    /// `(1−α)·prev + α·new`.
    pub fn update(&mut self, obs: &Observation, code: CountryCode) -> f64 {
        let estimate = obs.yield_spread_10y(code) - obs.inflation_differential(code) / 2.0;
        let alpha = self.config.ema_alpha;
        let smoothed = match self.natural_rate {
            None => estimate,
            Some(prev) => (1.0 - alpha) * prev + alpha * estimate,
        };
        self.natural_rate = Some(smoothed);
        self.history.push(smoothed);
        smoothed
    }

    /// Current smoothed natural rate, if any observation has been folded in.
    pub const fn natural_rate(&self) -> Option<f64> {
        self.natural_rate
    }

    /// Bounded history of smoothed natural-rate values.
    pub const fn history(&self) -> &RollingWindow {
        &self.history
    }

    /// Probability that the lower bound binds; 0 before the first update.
    pub fn lower_bound_probability(&self) -> f64 {
        match self.natural_rate {
            None => 0.0,
            Some(nr) => 1.0 / (1.0 + (2.0 * (nr - self.config.lower_bound)).exp()),
        }
    }

    /// Regime implied by the current lower-bound probability.
    ///
    /// `TargetEquilibrium` before the first update.
    pub fn regime(&self) -> Regime {
        if self.lower_bound_probability() < self.config.regime_threshold() {
            Regime::TargetEquilibrium
        } else {
            Regime::LowerBoundRisk
        }
    }

    /// Policy-rule configuration in use.
    pub const fn config(&self) -> &PolicyRuleConfig {
        &self.config
    }

    /// Forget all state, returning to the just-constructed estimator.
    pub fn reset(&mut self) {
        self.natural_rate = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn estimator() -> NaturalRateEstimator {
        NaturalRateEstimator::new(PolicyRuleConfig::default(), 60).unwrap()
    }

    #[test]
    fn test_invalid_psi_rejected() {
        let config = PolicyRuleConfig {
            psi: 1.0,
            ..Default::default()
        };
        assert!(NaturalRateEstimator::new(config, 60).is_err());
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let config = PolicyRuleConfig {
            ema_alpha: 0.0,
            ..Default::default()
        };
        assert!(NaturalRateEstimator::new(config, 60).is_err());
    }

    #[test]
    fn test_default_threshold_is_one_third() {
        let config = PolicyRuleConfig::default();
        assert_relative_eq!(config.regime_threshold(), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_first_estimate_taken_directly() {
        let mut est = estimator();
        let obs = Observation::new()
            .with("US-JP_10Y", 2.0)
            .with("US-JP_CPI_YOY", 1.0);
        let nr = est.update(&obs, CountryCode::Jp);
        assert_relative_eq!(nr, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_smoothing() {
        let mut est = estimator();
        let first = Observation::new().with("US-JP_10Y", 1.0);
        let second = Observation::new().with("US-JP_10Y", 3.0);
        est.update(&first, CountryCode::Jp);
        let nr = est.update(&second, CountryCode::Jp);
        assert_relative_eq!(nr, 0.95 * 1.0 + 0.05 * 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_probability_is_half_at_the_bound() {
        let mut est = estimator();
        // s10 = 0, ci = 0 puts the natural rate exactly at the bound
        est.update(&Observation::new(), CountryCode::Jp);
        assert_relative_eq!(est.lower_bound_probability(), 0.5, epsilon = 1e-12);
        // 0.5 >= 1/3
        assert_eq!(est.regime(), Regime::LowerBoundRisk);
    }

    #[test]
    fn test_high_natural_rate_is_equilibrium() {
        let mut est = estimator();
        let obs = Observation::new().with("US-JP_10Y", 5.0);
        est.update(&obs, CountryCode::Jp);
        assert!(est.lower_bound_probability() < 1e-3);
        assert_eq!(est.regime(), Regime::TargetEquilibrium);
    }

    #[test]
    fn test_initial_regime_is_equilibrium() {
        let est = estimator();
        assert_eq!(est.natural_rate(), None);
        assert_eq!(est.lower_bound_probability(), 0.0);
        assert_eq!(est.regime(), Regime::TargetEquilibrium);
    }

    #[test]
    fn test_probability_stays_in_unit_interval() {
        let mut est = estimator();
        for s10 in [-50.0, -1.0, 0.0, 1.0, 50.0] {
            let obs = Observation::new().with("US-JP_10Y", s10);
            est.update(&obs, CountryCode::Jp);
            let p = est.lower_bound_probability();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut est = estimator();
        est.update(&Observation::new().with("US-JP_10Y", 2.0), CountryCode::Jp);
        est.reset();
        assert_eq!(est.natural_rate(), None);
        assert!(est.history().is_empty());
        assert_eq!(est.regime(), Regime::TargetEquilibrium);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut est = NaturalRateEstimator::new(PolicyRuleConfig::default(), 3).unwrap();
        for i in 0..10 {
            est.update(&Observation::new().with("US-JP_10Y", i as f64), CountryCode::Jp);
        }
        assert_eq!(est.history().len(), 3);
    }
}
