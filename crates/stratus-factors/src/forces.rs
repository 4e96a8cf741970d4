//! Mapping macro observations to rotational forces.
//!
//! Each axis of the cloud carries one macro dimension: x = monetary (yield
//! spreads), y = inflation, z = risk sentiment. Raw indicators are squashed
//! through `tanh` so every force lands in [−1, 1], and the instrument's
//! inversion flag flips the sign for pairs quoted in USD. Two pair-specific
//! rules are part of the contract: JPY acts as a safe haven when not
//! inverted, and the AUD-inverted case pins the default risk sign
//! explicitly.

use crate::instrument::{CountryCode, InstrumentDescriptor};
use crate::natural_rate::Regime;
use crate::observation::{DEFAULT_VIX, Observation};
use serde::{Deserialize, Serialize};

/// Divisor applied to the blended yield spread before `tanh`.
const MONETARY_DIVISOR: f64 = 2.0;
/// Divisor applied to the inflation differential before `tanh`.
const INFLATION_DIVISOR: f64 = 3.0;
/// Divisor applied to the VIX gap before `tanh`.
const RISK_DIVISOR: f64 = 15.0;
/// Correlation below which the lower-bound amplification kicks in.
const AMPLIFICATION_TRIGGER: f64 = -0.1;

/// Bounded axis-angle forces for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forces {
    /// Monetary force (x axis).
    pub x: f64,
    /// Inflation force (y axis).
    pub y: f64,
    /// Risk-sentiment force (z axis).
    pub z: f64,
}

impl Forces {
    /// Forces as a mean vector for cloud redistribution.
    pub const fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Sign applied to the risk-axis force for this instrument.
///
/// Defaults to the pair's force multiplier, with two overrides:
/// non-inverted JPY is a traditional safe haven and flips once more, and
/// inverted AUD keeps the default sign (stated explicitly so a future change
/// to the default cannot silently move AUDUSD).
pub const fn risk_multiplier(descriptor: &InstrumentDescriptor) -> f64 {
    let multiplier = descriptor.force_multiplier();
    match (descriptor.country_code, descriptor.inverted) {
        (CountryCode::Jp, false) => -multiplier,
        (CountryCode::Au, true) => multiplier,
        _ => multiplier,
    }
}

/// Map an observation to the three bounded axis forces, without any
/// regime-dependent amplification.
pub fn base_forces(obs: &Observation, descriptor: &InstrumentDescriptor) -> Forces {
    let code = descriptor.country_code;
    let multiplier = descriptor.force_multiplier();

    let spread_2y = obs.yield_spread_2y(code);
    let spread_10y = obs.yield_spread_10y(code);
    let inflation = obs.inflation_differential(code);
    let vix = obs.vix();

    let x = ((0.5 * spread_2y + 0.5 * spread_10y) / MONETARY_DIVISOR).tanh() * multiplier;
    let y = (inflation / INFLATION_DIVISOR).tanh() * multiplier;
    let z = -((vix - DEFAULT_VIX) / RISK_DIVISOR).tanh() * risk_multiplier(descriptor);

    Forces { x, y, z }
}

/// Apply the lower-bound amplification to the monetary and inflation axes.
///
/// In `LowerBoundRisk`, with elevated uncertainty (`vix > 20`) and a VIX ↔
/// inflation correlation below −0.1, the x and y forces grow by
/// `1 + 0.5·|corr|`. The risk axis is never amplified.
pub fn amplify(forces: Forces, regime: Regime, vix: f64, vix_inflation_corr: f64) -> Forces {
    if regime == Regime::LowerBoundRisk
        && vix > DEFAULT_VIX
        && vix_inflation_corr < AMPLIFICATION_TRIGGER
    {
        let impact = 1.0 + 0.5 * vix_inflation_corr.abs();
        return Forces {
            x: forces.x * impact,
            y: forces.y * impact,
            z: forces.z,
        };
    }
    forces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::InstrumentCatalog;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn descriptor(pair: &str) -> InstrumentDescriptor {
        InstrumentCatalog::new().descriptor(pair)
    }

    #[test]
    fn test_neutral_observation_gives_zero_forces() {
        let obs = Observation::new().with("VIX", 20.0);
        let forces = base_forces(&obs, &descriptor("USDJPY"));
        assert_eq!(forces.x, 0.0);
        assert_eq!(forces.y, 0.0);
        assert_eq!(forces.z, 0.0);
    }

    #[test]
    fn test_pair_inversion_flips_monetary_force() {
        let jp = Observation::new()
            .with("US-JP_2Y", 1.0)
            .with("US-JP_10Y", 1.0)
            .with("US-JP_CPI_YOY", 0.0)
            .with("VIX", 20.0);
        let forces = base_forces(&jp, &descriptor("USDJPY"));
        assert_relative_eq!(forces.x, 0.5_f64.tanh(), epsilon = 1e-12);
        assert_eq!(forces.y, 0.0);
        assert_eq!(forces.z, 0.0);

        let eu = Observation::new()
            .with("US-EU_2Y", 1.0)
            .with("US-EU_10Y", 1.0)
            .with("US-EU_CPI_YOY", 0.0)
            .with("VIX", 20.0);
        let forces = base_forces(&eu, &descriptor("EURUSD"));
        assert_relative_eq!(forces.x, -(0.5_f64.tanh()), epsilon = 1e-12);
        assert_eq!(forces.y, 0.0);
        assert_eq!(forces.z, 0.0);
    }

    #[test]
    fn test_inflation_force() {
        let obs = Observation::new().with("US-CA_CPI_YOY", 3.0).with("VIX", 20.0);
        let forces = base_forces(&obs, &descriptor("USDCAD"));
        assert_relative_eq!(forces.y, 1.0_f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn test_safe_haven_override() {
        // High VIX: risk-off. JPY (safe haven, not inverted) flips the sign.
        let obs = Observation::new().with("VIX", 40.0);
        let expected = (20.0_f64 / 15.0).tanh();

        let jp = base_forces(&obs, &descriptor("USDJPY"));
        assert_relative_eq!(jp.z, expected, epsilon = 1e-12);

        let ca = base_forces(&obs, &descriptor("USDCAD"));
        assert_relative_eq!(ca.z, -expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case("USDJPY", -1.0)]
    #[case("USDCAD", 1.0)]
    #[case("AUDUSD", -1.0)]
    #[case("EURUSD", -1.0)]
    #[case("GBPUSD", -1.0)]
    fn test_risk_multiplier_table(#[case] pair: &str, #[case] expected: f64) {
        assert_eq!(risk_multiplier(&descriptor(pair)), expected);
    }

    #[test]
    fn test_au_override_matches_default() {
        // The explicit AUD-inverted arm must coincide with the default rule
        let au = descriptor("AUDUSD");
        assert_eq!(risk_multiplier(&au), au.force_multiplier());
    }

    #[test]
    fn test_inversion_negates_all_forces_modulo_overrides() {
        let obs = Observation::new()
            .with("US-EU_2Y", 0.8)
            .with("US-EU_10Y", 1.2)
            .with("US-EU_CPI_YOY", 2.0)
            .with("VIX", 28.0);

        let normal = base_forces(&obs, &InstrumentDescriptor::new("EURUSD", CountryCode::Eu, false));
        let inverted = base_forces(&obs, &InstrumentDescriptor::new("EURUSD", CountryCode::Eu, true));

        assert_relative_eq!(inverted.x, -normal.x, epsilon = 1e-12);
        assert_relative_eq!(inverted.y, -normal.y, epsilon = 1e-12);
        assert_relative_eq!(inverted.z, -normal.z, epsilon = 1e-12);
    }

    #[test]
    fn test_amplification_in_lower_bound_regime() {
        let obs = Observation::new()
            .with("US-JP_2Y", 1.0)
            .with("US-JP_10Y", 1.0)
            .with("VIX", 30.0);
        let desc = descriptor("USDJPY");
        let base = base_forces(&obs, &desc);

        let amplified = amplify(base, Regime::LowerBoundRisk, 30.0, -0.5);
        assert_relative_eq!(amplified.x, base.x * 1.25, epsilon = 1e-12);
        assert_relative_eq!(amplified.y, base.y * 1.25, epsilon = 1e-12);
        assert_relative_eq!(amplified.z, base.z, epsilon = 1e-12);
    }

    #[test]
    fn test_no_amplification_in_equilibrium() {
        let obs = Observation::new().with("US-JP_2Y", 1.0).with("VIX", 30.0);
        let base = base_forces(&obs, &descriptor("USDJPY"));
        assert_eq!(amplify(base, Regime::TargetEquilibrium, 30.0, -0.5), base);
    }

    #[test]
    fn test_no_amplification_without_stress() {
        let obs = Observation::new().with("US-JP_2Y", 1.0).with("VIX", 20.0);
        let base = base_forces(&obs, &descriptor("USDJPY"));
        // VIX at its anchor: no amplification even in the lower-bound regime
        assert_eq!(amplify(base, Regime::LowerBoundRisk, 20.0, -0.5), base);
        // Weakly negative correlation does not trigger either
        assert_eq!(amplify(base, Regime::LowerBoundRisk, 30.0, -0.05), base);
    }
}
