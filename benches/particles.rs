//! Benchmarks for the CPU-side experiment loop.
//!
//! Run with: `cargo bench`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use canvas_lab::experiments::particles::PARTICLE_COUNT;
use canvas_lab::{Experiment, InputField, InteractiveParticles, LabConfig, Mounted, Particle, SimulationController};

fn bench_particle_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_step");

    group.bench_function("in_range", |b| {
        let mut p = Particle::new(0, Vec2::new(150.0, 150.0), Vec2::ZERO, 8.0, 0.0);
        b.iter(|| p.step(black_box(Vec2::new(100.0, 100.0))))
    });

    group.bench_function("out_of_range", |b| {
        let mut p = Particle::new(0, Vec2::new(390.0, 290.0), Vec2::new(1.0, 1.0), 8.0, 0.0);
        b.iter(|| p.step(black_box(Vec2::new(-200.0, -200.0))))
    });

    group.finish();
}

fn bench_particles_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("particles_advance");

    for ticks in [1u32, 60] {
        group.bench_with_input(BenchmarkId::from_parameter(ticks), &ticks, |b, &ticks| {
            let mut input = InputField::new();
            input.set_pointer(300.0, 300.0);
            let mut rng = rand::thread_rng();
            let particles = (0..PARTICLE_COUNT).map(|i| Particle::random(i, &mut rng)).collect();
            let mut exp = Mounted::new(InteractiveParticles::with_particles(particles), &input, Duration::ZERO);
            exp.start();
            let step = Duration::from_millis(16) * ticks;
            b.iter(|| {
                let now = exp.now() + step;
                exp.advance(now, &input);
            })
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for index in 0..6 {
        let mut lab = SimulationController::new(LabConfig::default()).expect("default config");
        lab.select(index).expect("valid index");
        lab.play();
        lab.advance(Duration::from_millis(500));
        let name = lab.active_kind().name();
        group.bench_function(name, |b| b.iter(|| black_box(lab.snapshot())));
    }

    group.bench_function("particle_instances", |b| {
        let mut lab = SimulationController::new(LabConfig::default().with_initial_experiment(3)).expect("config");
        lab.play();
        lab.advance(Duration::from_millis(500));
        b.iter(|| match lab.snapshot() {
            canvas_lab::VisualState::InteractiveParticles(view) => black_box(view.instances()),
            _ => Vec::new(),
        })
    });

    group.finish();
}

criterion_group!(benches, bench_particle_step, bench_particles_tick, bench_snapshot);
criterion_main!(benches);
