//! Stratus CLI binary.
//!
//! Drives a signal engine over a deterministic synthetic observation stream
//! and prints the per-step signals and metrics. There is no file ingestion
//! here; the stream exists to exercise and inspect the engine.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::process;
use stratus::{CountryCode, Engine, EngineConfig, InstrumentCatalog, Observation, StepResult};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Stratus: macro-driven FX signal engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an engine over a synthetic observation stream
    Run {
        /// Instrument pair (e.g. USDJPY)
        #[arg(default_value = "USDJPY")]
        pair: String,

        /// Number of steps to simulate
        #[arg(long, default_value = "60")]
        steps: usize,

        /// RNG seed for the cloud and per-step sampling
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Cloud size
        #[arg(long, default_value = "300")]
        points: usize,

        /// Rolling window capacity
        #[arg(long, default_value = "60")]
        window: usize,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the instrument catalog
    Pairs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pair,
            steps,
            seed,
            points,
            window,
            format,
        } => run_engine(&pair, steps, seed, points, window, &format),
        Commands::Pairs => {
            list_pairs();
            Ok(())
        }
    }
}

fn run_engine(
    pair: &str,
    steps: usize,
    seed: u64,
    points: usize,
    window: usize,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        num_points: points,
        window,
        seed,
        ..Default::default()
    };
    let mut engine = Engine::with_config(pair, config)?;
    let code = engine.descriptor().country_code;

    let bar = ProgressBar::new(steps as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} steps")?);

    let mut results = Vec::with_capacity(steps);
    for step in 0..steps {
        let obs = synthetic_observation(code, step);
        results.push(engine.step(&obs));
        bar.inc(1);
    }
    bar.finish_and_clear();

    match format {
        "json" => {
            for (step, result) in results.iter().enumerate() {
                let line = json!({
                    "step": step,
                    "pair": pair,
                    "signal": result.signal.as_str(),
                    "metrics": result.metrics,
                });
                println!("{}", serde_json::to_string(&line)?);
            }
        }
        _ => print_table(&results),
    }

    Ok(())
}

/// Deterministic synthetic macro stream for the given country code.
fn synthetic_observation(code: CountryCode, step: usize) -> Observation {
    let t = step as f64;
    Observation::new()
        .with(
            format!("US-{code}_2Y"),
            0.9 * (0.21 * t).sin() + 0.3 * (0.04 * t).cos(),
        )
        .with(format!("US-{code}_10Y"), 0.6 * (0.13 * t).cos() - 0.2)
        .with(
            format!("US-{code}_CPI_YOY"),
            1.4 + 1.1 * (0.09 * t).sin(),
        )
        .with(
            "VIX",
            21.0 + 9.0 * (0.17 * t).sin().powi(2) - 3.0 * (0.05 * t).cos(),
        )
}

fn print_table(results: &[StepResult]) {
    println!(
        "{:>4}  {:<12} {:<18} {:>10} {:>10} {:>11} {:>8}",
        "step", "signal", "regime", "precession", "mood", "instability", "lb_prob"
    );
    for (step, result) in results.iter().enumerate() {
        let m = &result.metrics;
        println!(
            "{:>4}  {:<12} {:<18} {:>10.4} {:>10.4} {:>11.4} {:>8.4}",
            step,
            result.signal.as_str(),
            m.regime.as_str(),
            m.precession,
            m.market_mood,
            m.instability,
            m.lb_prob
        );
    }
}

fn list_pairs() {
    let catalog = InstrumentCatalog::new();
    println!("{:<8} {:<6} inverted", "pair", "code");
    for descriptor in catalog.descriptors() {
        println!(
            "{:<8} {:<6} {}",
            descriptor.pair, descriptor.country_code, descriptor.inverted
        );
    }
}
