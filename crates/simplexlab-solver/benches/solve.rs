use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simplexlab_solver::Algorithm;
use simplexlab_types::{Constraint, Model, Sense, SignRestriction, SolverConfig};

fn wyndor() -> Model {
    Model::new(
        Sense::Max,
        vec![3.0, 5.0],
        vec![
            Constraint::less_eq(vec![1.0, 0.0], 4.0),
            Constraint::less_eq(vec![0.0, 2.0], 12.0),
            Constraint::less_eq(vec![3.0, 2.0], 18.0),
        ],
        vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
    )
    .unwrap()
}

fn integer_instance() -> Model {
    Model::new(
        Sense::Max,
        vec![5.0, 4.0],
        vec![
            Constraint::less_eq(vec![6.0, 4.0], 24.0),
            Constraint::less_eq(vec![1.0, 2.0], 6.0),
        ],
        vec![SignRestriction::Integer, SignRestriction::Integer],
    )
    .unwrap()
}

fn bench_drivers(c: &mut Criterion) {
    let cfg = SolverConfig::default();
    let lp = wyndor();
    let ip = integer_instance();

    c.bench_function("primal_simplex_wyndor", |b| {
        b.iter(|| Algorithm::Primal.solve(black_box(&lp), &cfg).unwrap())
    });
    c.bench_function("revised_simplex_wyndor", |b| {
        b.iter(|| Algorithm::Revised.solve(black_box(&lp), &cfg).unwrap())
    });
    c.bench_function("branch_and_bound_small", |b| {
        b.iter(|| Algorithm::BranchAndBound.solve(black_box(&ip), &cfg).unwrap())
    });
}

criterion_group!(benches, bench_drivers);
criterion_main!(benches);
