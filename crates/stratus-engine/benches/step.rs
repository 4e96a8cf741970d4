//! Criterion benchmark of a full engine step.

use criterion::{Criterion, criterion_group, criterion_main};
use stratus_engine::{Engine, EngineConfig};
use stratus_factors::Observation;

fn bench_step(c: &mut Criterion) {
    let obs = Observation::new()
        .with("US-JP_2Y", 0.5)
        .with("US-JP_10Y", 0.3)
        .with("US-JP_CPI_YOY", 1.2)
        .with("VIX", 24.0);

    let mut engine = Engine::new("USDJPY").expect("default engine");
    c.bench_function("engine_step_n300", |b| b.iter(|| engine.step(&obs)));

    let config = EngineConfig {
        num_points: 1000,
        ..Default::default()
    };
    let mut large = Engine::with_config("USDJPY", config).expect("large engine");
    c.bench_function("engine_step_n1000", |b| b.iter(|| large.step(&obs)));
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
