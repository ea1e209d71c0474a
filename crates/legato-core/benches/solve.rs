//! Solver throughput for the typical move shapes.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use legato_core::{BoundaryState, KinematicLimits, ProfileSolver, State};

fn limits() -> KinematicLimits {
    KinematicLimits::new(1.0, -1.0, 1.0, -1.0, 1.0)
}

fn bench_rest_to_rest(c: &mut Criterion) {
    let limits = limits();
    let cruise = BoundaryState::rest_to_rest(0.0, 10.0);
    let short = BoundaryState::rest_to_rest(0.0, 0.01);

    c.bench_function("rest_to_rest_cruise", |b| {
        b.iter(|| ProfileSolver::new(black_box(&cruise), &limits).solve())
    });
    c.bench_function("rest_to_rest_short", |b| {
        b.iter(|| ProfileSolver::new(black_box(&short), &limits).solve())
    });
}

fn bench_moving_target(c: &mut Criterion) {
    let limits = limits();
    let state = BoundaryState::new(State::new(0.0, 0.5, -0.2), State::new(2.0, 0.2, -0.1));

    c.bench_function("moving_target", |b| {
        b.iter(|| ProfileSolver::new(black_box(&state), &limits).solve())
    });
}

fn bench_brake(c: &mut Criterion) {
    let limits = KinematicLimits::new(800.0, -800.0, 40000.0, -40000.0, 200000.0);
    let state = BoundaryState::new(State::new(1300.0, 1200.0, 0.0), State::new(1400.0, 0.0, 0.0));

    c.bench_function("brake_then_solve", |b| {
        b.iter(|| ProfileSolver::new(black_box(&state), &limits).solve())
    });
}

criterion_group!(
    benches,
    bench_rest_to_rest,
    bench_moving_target,
    bench_brake
);
criterion_main!(benches);
