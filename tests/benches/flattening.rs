#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use strokelet_geom::{ArcLengthOptions, CubicBezierSegment, QuadraticBezierSegment, Segment};
use strokelet_tests::*;

const CURVE_COUNT: usize = 500;
const SEED: u64 = 42;

fn bench_flatten<A: Flatten<f64>>(curves: &[CubicBezierSegment<f64>], tolerance: f64) {
    for curve in curves {
        A::flatten(curve, tolerance, &mut |seg, _| {
            criterion::black_box(seg);
        });
    }
}

fn bench_flatten_quad<A: Flatten<f64>>(curves: &[QuadraticBezierSegment<f64>], tolerance: f64) {
    for curve in curves {
        A::flatten_quad(curve, tolerance, &mut |seg, _| {
            criterion::black_box(seg);
        });
    }
}

fn cubic_flatten(c: &mut Criterion) {
    let curves = generate_bezier_curves(CURVE_COUNT, SEED);
    let mut g = c.benchmark_group("cubic");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("centerline", tol), tol, |b, tol| {
            b.iter(|| bench_flatten::<Centerline>(&curves, *tol))
        });
        g.bench_with_input(BenchmarkId::new("right side", tol), tol, |b, tol| {
            b.iter(|| bench_flatten::<RightSide>(&curves, *tol))
        });
        g.bench_with_input(BenchmarkId::new("left side", tol), tol, |b, tol| {
            b.iter(|| bench_flatten::<LeftSide>(&curves, *tol))
        });
    }
}

fn quad_flatten(c: &mut Criterion) {
    let curves = generate_quadratic_curves(CURVE_COUNT, SEED);
    let mut g = c.benchmark_group("quadratic");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("centerline", tol), tol, |b, tol| {
            b.iter(|| bench_flatten_quad::<Centerline>(&curves, *tol))
        });
    }
}

fn arcs(c: &mut Criterion) {
    let arcs = generate_svg_arcs(CURVE_COUNT, SEED);
    let mut g = c.benchmark_group("arc");
    g.bench_function("to cubics", |b| {
        b.iter(|| {
            for arc in &arcs {
                arc.for_each_cubic_bezier(&mut |curve| {
                    criterion::black_box(curve);
                });
            }
        })
    });
    for tol in &[0.01, 0.1, 1.0] {
        g.bench_with_input(BenchmarkId::new("flatten", tol), tol, |b, tol| {
            b.iter(|| {
                for arc in &arcs {
                    arc.to_arc().for_each_flattened(*tol, &mut |seg| {
                        criterion::black_box(seg);
                    });
                }
            })
        });
    }
}

fn lengths(c: &mut Criterion) {
    let curves = generate_bezier_curves(CURVE_COUNT, SEED);
    let mut g = c.benchmark_group("length");
    g.bench_function("cubic", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for curve in &curves {
                sum += curve.length();
            }
            criterion::black_box(sum)
        })
    });
    g.bench_function("arc length parametrization", |b| {
        let options = ArcLengthOptions::DEFAULT;
        b.iter(|| {
            for curve in &curves {
                if let Ok(parametrization) = curve.arc_length_parametrization(&options) {
                    criterion::black_box(parametrization.t_at_length(parametrization.length() * 0.5));
                }
            }
        })
    });
}

criterion_group!(flatten, cubic_flatten, quad_flatten, arcs);
criterion_group!(measure, lengths);

criterion_main!(flatten, measure);
