use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gauntlet_core::config::MatchConfig;
use gauntlet_core::input::InputState;
use gauntlet_core::simulation::Simulation;

fn busy_input(tick: u64) -> InputState {
    let phase = tick as f32 * 0.05;
    InputState {
        move_x: phase.cos(),
        move_y: phase.sin(),
        attack: tick % 40 < 25,
        ..InputState::default()
    }
}

/// A running match warmed up until the arena is populated.
fn warmed(config: MatchConfig, remaining: f32) -> Simulation {
    let mut sim = Simulation::new(config, 42);
    sim.start();
    for tick in 0..1_200 {
        sim.step(remaining, &busy_input(tick));
    }
    sim.drain_events();
    sim.drain_score_events();
    sim
}

fn bench_shooter_tick(c: &mut Criterion) {
    // Late phase keeps the population cap high
    let mut sim = warmed(MatchConfig::shooter(), 30.0);
    let mut tick = 0;

    c.bench_function("shooter_tick_late", |b| {
        b.iter(|| {
            tick += 1;
            sim.step(black_box(30.0), &busy_input(tick));
            sim.drain_events();
            sim.drain_score_events();
        })
    });
}

fn bench_arena_tick(c: &mut Criterion) {
    let mut sim = warmed(MatchConfig::arena(), 90.0);
    let mut tick = 0;

    c.bench_function("arena_tick_early", |b| {
        b.iter(|| {
            tick += 1;
            sim.step(black_box(90.0), &busy_input(tick));
            sim.drain_events();
            sim.drain_score_events();
        })
    });
}

fn bench_full_match(c: &mut Criterion) {
    c.bench_function("shooter_full_match", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(MatchConfig::shooter(), black_box(7));
            sim.start();
            for tick in 0..=7_200u64 {
                let remaining = 120.0 - tick as f32 / 60.0;
                sim.step(remaining, &busy_input(tick));
            }
            black_box(sim.telemetry())
        })
    });
}

fn bench_telemetry(c: &mut Criterion) {
    let sim = warmed(MatchConfig::shooter(), 30.0);

    c.bench_function("telemetry_snapshot", |b| b.iter(|| black_box(sim.telemetry())));
}

criterion_group!(
    benches,
    bench_shooter_tick,
    bench_arena_tick,
    bench_full_match,
    bench_telemetry
);
criterion_main!(benches);
