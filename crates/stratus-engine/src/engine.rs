//! Per-instrument engine facade.
//!
//! An [`Engine`] owns everything needed to turn a stream of macro
//! observations into signals for one instrument: the point cloud, the
//! natural-rate estimator, the correlation tracker, bounded histories, the
//! metrics log and a deterministically seeded RNG. Engines share no mutable
//! state, so distinct instruments can be driven from independent threads.

use crate::EngineError;
use crate::cloud::{PointCloud, regime_covariance};
use crate::invariants::{
    DERIVED_MIN_HISTORY, gradient_mean, instability, market_mood, mean_displacement,
    pairwise_distance_entropy, principal_axis_angle, rotational_energy,
};
use crate::signal::{Signal, SignalThresholds, decide};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use stratus_factors::{
    CorrelationTracker, InstrumentCatalog, InstrumentDescriptor, NaturalRateEstimator,
    Observation, PolicyRuleConfig, Regime, amplify, base_forces,
};
use tracing::{debug, trace};

/// Minimum cloud size: PCA and pairwise statistics need at least 3 points.
const MIN_POINTS: usize = 3;

/// Minimum rolling-window capacity.
const MIN_WINDOW: usize = 2;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cloud size N (default: 300).
    pub num_points: usize,

    /// Rolling-window capacity W (default: 60).
    pub window: usize,

    /// RNG seed for the initial cloud and per-step sampling (default: 42).
    pub seed: u64,

    /// Rotation magnitude applied to each force (default: 0.20).
    pub scale: f64,

    /// Policy rule behind the regime classifier.
    pub policy: PolicyRuleConfig,

    /// Regime-conditioned decision thresholds.
    pub thresholds: SignalThresholds,

    /// Instability above which signals upgrade to their strong variants
    /// (default: 1.5).
    pub instability_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_points: 300,
            window: 60,
            seed: 42,
            scale: 0.20,
            policy: PolicyRuleConfig::default(),
            thresholds: SignalThresholds::default(),
            instability_threshold: 1.5,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.num_points < MIN_POINTS {
            return Err(EngineError::InvalidPointCount {
                required: MIN_POINTS,
                actual: self.num_points,
            });
        }
        if self.window < MIN_WINDOW {
            return Err(EngineError::InvalidWindow {
                required: MIN_WINDOW,
                actual: self.window,
            });
        }
        if !self.scale.is_finite() {
            return Err(EngineError::InvalidParameter(
                "scale must be finite".to_string(),
            ));
        }
        if !self.instability_threshold.is_finite() {
            return Err(EngineError::InvalidParameter(
                "instability_threshold must be finite".to_string(),
            ));
        }
        if !self.thresholds.validate() {
            return Err(EngineError::InvalidParameter(
                "signal thresholds must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Metrics emitted for one step.
///
/// Base invariants and regime fields are always populated; the derived
/// `precession`, `instability` and `market_mood` are 0 until enough history
/// has accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Mean per-point displacement.
    pub avg_delta: f64,
    /// Pairwise-distance entropy of the cloud (nats).
    pub entropy: f64,
    /// Principal-axis angle against the monetary axis (radians).
    pub axis_angle: f64,
    /// Rotational kinetic energy.
    pub rot_energy: f64,
    /// Monetary regime at this step.
    pub regime: Regime,
    /// Probability that the interest-rate lower bound binds.
    pub lb_prob: f64,
    /// Last good VIX ↔ inflation correlation.
    pub vix_inflation_corr: f64,
    /// Last good VIX ↔ rate correlation.
    pub vix_rate_corr: f64,
    /// Mean gradient of the trailing axis angles.
    pub precession: f64,
    /// Recent rotational energy over recent displacement.
    pub instability: f64,
    /// Directional bias of the flow on the weighted macro axes.
    pub market_mood: f64,
}

/// Outcome of one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Discrete trading signal.
    pub signal: Signal,
    /// Full metrics for the step.
    pub metrics: StepMetrics,
}

/// Per-instrument signal engine.
#[derive(Debug)]
pub struct Engine {
    descriptor: InstrumentDescriptor,
    config: EngineConfig,
    rng: StdRng,
    cloud: PointCloud,
    estimator: NaturalRateEstimator,
    correlations: CorrelationTracker,
    observations: VecDeque<Observation>,
    log: Vec<StepMetrics>,
}

impl Engine {
    /// Create an engine for `pair` with the default configuration.
    ///
    /// Unknown pairs fall back to the JP/non-inverted defaults.
    pub fn new(pair: &str) -> Result<Self, EngineError> {
        Self::with_config(pair, EngineConfig::default())
    }

    /// Create an engine for `pair` with an explicit configuration.
    ///
    /// # Errors
    /// Fails when `num_points < 3`, `window < 2`, or any scalar parameter is
    /// out of range.
    pub fn with_config(pair: &str, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let descriptor = InstrumentCatalog::new().descriptor(pair);
        let estimator = NaturalRateEstimator::new(config.policy.clone(), config.window)?;
        let correlations = CorrelationTracker::new(config.window)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let cloud = PointCloud::seeded(config.num_points, &mut rng);

        Ok(Self {
            descriptor,
            config,
            rng,
            cloud,
            estimator,
            correlations,
            observations: VecDeque::new(),
            log: Vec::new(),
        })
    }

    /// Process one observation and emit the step result.
    ///
    /// Runs, in order: natural-rate/regime update, correlation update, cloud
    /// redistribution, force mapping, rotation, invariants and the signal
    /// decision. Never fails; metrics degrade to zero where history is
    /// missing.
    pub fn step(&mut self, obs: &Observation) -> StepResult {
        let code = self.descriptor.country_code;

        // Regime is evaluated after the natural-rate update of this step
        self.estimator.update(obs, code);
        let regime = self.estimator.regime();
        let lb_prob = self.estimator.lower_bound_probability();

        let (vix_inflation_corr, vix_rate_corr) = self.correlations.update(obs, code);

        if self.observations.len() == self.config.window {
            self.observations.pop_front();
        }
        self.observations.push_back(obs.clone());

        // Redistribution centers on the unamplified forces
        let base = base_forces(obs, &self.descriptor);
        let covariance = regime_covariance(regime, lb_prob);
        self.cloud
            .redistribute(base.as_array(), &covariance, &mut self.rng);

        let forces = amplify(base, regime, obs.vix(), vix_inflation_corr);
        trace!(
            pair = %self.descriptor.pair,
            fx = forces.x,
            fy = forces.y,
            fz = forces.z,
            regime = %regime,
            "applying forces"
        );
        self.cloud.rotate(&forces, self.config.scale);
        self.cloud.sanitize();

        let avg_delta = mean_displacement(self.cloud.current(), self.cloud.previous());
        let entropy = pairwise_distance_entropy(self.cloud.current());
        let axis_angle = principal_axis_angle(self.cloud.current(), &mut self.rng);
        let rot_energy = rotational_energy(self.cloud.current(), self.cloud.previous());

        let (precession, instability_value, mood) = if self.log.len() >= DERIVED_MIN_HISTORY {
            let angles = self.trailing(axis_angle, |m| m.axis_angle);
            let energies = self.trailing(rot_energy, |m| m.rot_energy);
            let deltas = self.trailing(avg_delta, |m| m.avg_delta);
            let mood = market_mood(self.cloud.current(), self.cloud.previous(), &mut self.rng);
            (
                gradient_mean(&angles),
                instability(&energies, &deltas),
                mood,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let metrics = StepMetrics {
            avg_delta,
            entropy,
            axis_angle,
            rot_energy,
            regime,
            lb_prob,
            vix_inflation_corr,
            vix_rate_corr,
            precession,
            instability: instability_value,
            market_mood: mood,
        };

        let signal = decide(
            precession,
            mood,
            instability_value,
            regime,
            vix_inflation_corr,
            &self.config.thresholds,
            self.config.instability_threshold,
        );

        self.log.push(metrics);
        if signal != Signal::Neutral {
            debug!(
                pair = %self.descriptor.pair,
                %signal,
                precession = precession,
                market_mood = mood,
                instability = instability_value,
                "actionable signal"
            );
        }

        StepResult { signal, metrics }
    }

    /// Restore the engine to its just-constructed state.
    ///
    /// Re-seeds the RNG and re-derives the seed cloud, so a reset engine
    /// replays an observation stream bitwise-identically.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.cloud = PointCloud::seeded(self.config.num_points, &mut self.rng);
        self.estimator.reset();
        self.correlations.reset();
        self.observations.clear();
        self.log.clear();
        debug!(pair = %self.descriptor.pair, "engine reset");
    }

    /// Trailing values of one metric: the last rows of the log plus the
    /// current value, at most [`DERIVED_MIN_HISTORY`] entries.
    fn trailing(&self, current: f64, field: impl Fn(&StepMetrics) -> f64) -> Vec<f64> {
        let skip = self.log.len().saturating_sub(DERIVED_MIN_HISTORY - 1);
        let mut values: Vec<f64> = self.log[skip..].iter().map(field).collect();
        values.push(current);
        values
    }

    /// The instrument this engine trades.
    pub const fn descriptor(&self) -> &InstrumentDescriptor {
        &self.descriptor
    }

    /// The configuration in use.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The time-indexed metrics log, one row per step.
    pub fn metrics(&self) -> &[StepMetrics] {
        &self.log
    }

    /// The cloud state.
    pub const fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// The natural-rate estimator.
    pub const fn estimator(&self) -> &NaturalRateEstimator {
        &self.estimator
    }

    /// The correlation tracker.
    pub const fn correlations(&self) -> &CorrelationTracker {
        &self.correlations
    }

    /// Bounded history of consumed observations, oldest first.
    pub fn observation_history(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points_rejected() {
        let config = EngineConfig {
            num_points: 2,
            ..Default::default()
        };
        assert!(matches!(
            Engine::with_config("USDJPY", config),
            Err(EngineError::InvalidPointCount { .. })
        ));
    }

    #[test]
    fn test_too_small_window_rejected() {
        let config = EngineConfig {
            window: 1,
            ..Default::default()
        };
        assert!(matches!(
            Engine::with_config("USDJPY", config),
            Err(EngineError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_non_finite_scale_rejected() {
        let config = EngineConfig {
            scale: f64::NAN,
            ..Default::default()
        };
        assert!(Engine::with_config("USDJPY", config).is_err());
    }

    #[test]
    fn test_unknown_pair_falls_back() {
        let engine = Engine::new("XAUUSD").unwrap();
        assert_eq!(engine.descriptor().pair, "XAUUSD");
        assert!(!engine.descriptor().inverted);
    }

    #[test]
    fn test_observation_history_is_bounded() {
        let config = EngineConfig {
            num_points: 10,
            window: 3,
            ..Default::default()
        };
        let mut engine = Engine::with_config("USDJPY", config).unwrap();
        for i in 0..8 {
            let obs = Observation::new().with("VIX", 20.0 + i as f64);
            engine.step(&obs);
        }
        assert_eq!(engine.observation_history().count(), 3);
    }

    #[test]
    fn test_metrics_log_grows_per_step() {
        let config = EngineConfig {
            num_points: 10,
            ..Default::default()
        };
        let mut engine = Engine::with_config("USDJPY", config).unwrap();
        for _ in 0..4 {
            engine.step(&Observation::new());
        }
        assert_eq!(engine.metrics().len(), 4);
    }
}
