//! Signal decision logic.
//!
//! Converts the derived invariants and the monetary regime into a discrete
//! trading signal. Thresholds are regime-conditioned, and a strongly negative
//! VIX ↔ inflation correlation relaxes them in the lower-bound regime — the
//! situation in which macro shocks carry the most information.

use serde::{Deserialize, Serialize};
use std::fmt;
use stratus_factors::Regime;

/// Relaxation applied to both thresholds under lower-bound stress.
const LOWER_BOUND_RELAXATION: f64 = 0.8;

/// Discrete trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// No actionable reorientation.
    Neutral,
    /// Bullish reorientation.
    Buy,
    /// Bullish reorientation under structural turbulence.
    StrongBuy,
    /// Bearish reorientation.
    Sell,
    /// Bearish reorientation under structural turbulence.
    StrongSell,
}

impl Signal {
    /// Upper-case name as emitted in result streams.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Buy => "BUY",
            Self::StrongBuy => "STRONG_BUY",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Regime-conditioned decision thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Precession threshold in target equilibrium (default: 0.15).
    pub precession_equilibrium: f64,

    /// Precession threshold under lower-bound risk (default: 0.12).
    pub precession_lower_bound: f64,

    /// Mood threshold in target equilibrium (default: 0.25).
    pub mood_equilibrium: f64,

    /// Mood threshold under lower-bound risk (default: 0.15).
    pub mood_lower_bound: f64,

    /// VIX ↔ inflation correlation below which lower-bound thresholds relax
    /// (default: −0.2).
    pub vix_inflation_trigger: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            precession_equilibrium: 0.15,
            precession_lower_bound: 0.12,
            mood_equilibrium: 0.25,
            mood_lower_bound: 0.15,
            vix_inflation_trigger: -0.2,
        }
    }
}

impl SignalThresholds {
    pub(crate) fn validate(&self) -> bool {
        self.precession_equilibrium.is_finite()
            && self.precession_lower_bound.is_finite()
            && self.mood_equilibrium.is_finite()
            && self.mood_lower_bound.is_finite()
            && self.vix_inflation_trigger.is_finite()
    }
}

/// Decide the signal for one step.
///
/// A zero precession means the derived invariants are not yet available and
/// always yields `Neutral`.
pub fn decide(
    precession: f64,
    market_mood: f64,
    instability: f64,
    regime: Regime,
    vix_inflation_corr: f64,
    thresholds: &SignalThresholds,
    instability_threshold: f64,
) -> Signal {
    if precession == 0.0 {
        return Signal::Neutral;
    }

    let (mut precession_threshold, mut mood_threshold) = match regime {
        Regime::LowerBoundRisk => (
            thresholds.precession_lower_bound,
            thresholds.mood_lower_bound,
        ),
        Regime::TargetEquilibrium => (
            thresholds.precession_equilibrium,
            thresholds.mood_equilibrium,
        ),
    };

    if regime == Regime::LowerBoundRisk && vix_inflation_corr < thresholds.vix_inflation_trigger {
        precession_threshold *= LOWER_BOUND_RELAXATION;
        mood_threshold *= LOWER_BOUND_RELAXATION;
    }

    if precession.abs() <= precession_threshold {
        return Signal::Neutral;
    }

    let strong = instability > instability_threshold;
    if market_mood > mood_threshold {
        if strong { Signal::StrongBuy } else { Signal::Buy }
    } else if market_mood < -mood_threshold {
        if strong { Signal::StrongSell } else { Signal::Sell }
    } else {
        Signal::Neutral
    }
}
