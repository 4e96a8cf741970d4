//! Minimal end-to-end demo: one engine, one synthetic macro stream.
//!
//! Run with `cargo run -p stratus-engine --example signal_demo`.

use stratus_engine::Engine;
use stratus_factors::Observation;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = Engine::new("USDJPY")?;

    println!("step  signal       regime              precession    mood");
    for step in 0..40 {
        let t = step as f64;
        let obs = Observation::new()
            .with("US-JP_2Y", 0.8 * (0.2 * t).sin())
            .with("US-JP_10Y", 0.5 * (0.1 * t).cos())
            .with("US-JP_CPI_YOY", 1.5 + (0.12 * t).sin())
            .with("VIX", 20.0 + 7.0 * (0.3 * t).sin().abs());

        let result = engine.step(&obs);
        println!(
            "{:>4}  {:<12} {:<18} {:>10.4} {:>7.4}",
            step,
            result.signal.as_str(),
            result.metrics.regime.as_str(),
            result.metrics.precession,
            result.metrics.market_mood
        );
    }

    Ok(())
}
