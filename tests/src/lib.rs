//! Shared fixtures for the integration tests and benchmarks: seeded curve
//! generators and flattening strategies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use strokelet_geom::arc::{ArcFlags, SvgArc};
use strokelet_geom::utils::{rotate_90_cw, with_length};
use strokelet_geom::{point, vector, Angle, CubicBezierSegment, LineSegment, Point, QuadraticBezierSegment, Scalar};

pub static TOLERANCES: [f64; 8] = [0.01, 0.025, 0.05, 0.1, 0.2, 0.25, 0.5, 1.0];

/// Half of the stroke width used by the offset flattening fixtures.
pub const HALF_STROKE_WIDTH: f64 = 4.0;

pub trait Flatten<S: Scalar> {
    /// Signed distance between the curve and the polyline, along the right
    /// side normal.
    fn offset() -> S {
        S::ZERO
    }

    fn flatten<Cb: FnMut(&LineSegment<S>, Range<S>)>(curve: &CubicBezierSegment<S>, tolerance: S, cb: &mut Cb);
    fn flatten_quad<Cb: FnMut(&LineSegment<S>, Range<S>)>(
        curve: &QuadraticBezierSegment<S>,
        tolerance: S,
        cb: &mut Cb,
    ) {
        Self::flatten(&curve.to_cubic(), tolerance, cb);
    }
}

/// Flattens the curve itself.
pub struct Centerline;
impl<S: Scalar> Flatten<S> for Centerline {
    fn flatten<Cb: FnMut(&LineSegment<S>, Range<S>)>(curve: &CubicBezierSegment<S>, tolerance: S, cb: &mut Cb) {
        curve.for_each_flattened_with_t(tolerance, cb);
    }
}

/// Flattens the right side of a stroke of width `2 * HALF_STROKE_WIDTH`.
pub struct RightSide;
impl<S: Scalar> Flatten<S> for RightSide {
    fn offset() -> S {
        S::value(HALF_STROKE_WIDTH)
    }

    fn flatten<Cb: FnMut(&LineSegment<S>, Range<S>)>(curve: &CubicBezierSegment<S>, tolerance: S, cb: &mut Cb) {
        curve.for_each_offset_flattened(Self::offset(), tolerance, cb);
    }
}

/// Flattens the left side of a stroke of width `2 * HALF_STROKE_WIDTH`.
pub struct LeftSide;
impl<S: Scalar> Flatten<S> for LeftSide {
    fn offset() -> S {
        -S::value(HALF_STROKE_WIDTH)
    }

    fn flatten<Cb: FnMut(&LineSegment<S>, Range<S>)>(curve: &CubicBezierSegment<S>, tolerance: S, cb: &mut Cb) {
        curve.for_each_offset_flattened(Self::offset(), tolerance, cb);
    }
}

fn random_point(rng: &mut StdRng, extent: f64) -> Point<f64> {
    point(rng.gen_range(-extent..extent), rng.gen_range(-extent..extent))
}

/// Random cubic bézier curves within a 400x400 square, always the same for a
/// given seed.
pub fn generate_bezier_curves(count: usize, seed: u64) -> Vec<CubicBezierSegment<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| CubicBezierSegment {
            from: random_point(&mut rng, 200.0),
            ctrl1: random_point(&mut rng, 200.0),
            ctrl2: random_point(&mut rng, 200.0),
            to: random_point(&mut rng, 200.0),
        })
        .collect()
}

pub fn generate_quadratic_curves(count: usize, seed: u64) -> Vec<QuadraticBezierSegment<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| QuadraticBezierSegment {
            from: random_point(&mut rng, 200.0),
            ctrl: random_point(&mut rng, 200.0),
            to: random_point(&mut rng, 200.0),
        })
        .collect()
}

/// Random SVG arcs with non-zero radii. Some of them have radii too small to
/// reach their end points.
pub fn generate_svg_arcs(count: usize, seed: u64) -> Vec<SvgArc<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| SvgArc {
            from: random_point(&mut rng, 200.0),
            to: random_point(&mut rng, 200.0),
            radii: vector(rng.gen_range(10.0..300.0), rng.gen_range(10.0..300.0)),
            x_rotation: Angle::radians(rng.gen_range(-3.0..3.0)),
            flags: ArcFlags {
                large_arc: rng.gen(),
                sweep: rng.gen(),
            },
        })
        .collect()
}

pub fn count_edges_cubic<F: Flatten<f64>>(curves: &[CubicBezierSegment<f64>], tolerance: f64) -> u32 {
    let mut count = 0;
    for curve in curves {
        F::flatten(curve, tolerance, &mut |_, _| {
            count += 1;
        });
    }

    count
}

pub fn count_edges_quad<F: Flatten<f64>>(curves: &[QuadraticBezierSegment<f64>], tolerance: f64) -> u32 {
    let mut count = 0;
    for curve in curves {
        F::flatten_quad(curve, tolerance, &mut |_, _| {
            count += 1;
        });
    }

    count
}

/// Largest distance between the (offset) curve and the segments approximating
/// it, each segment being compared with the part of the curve it covers.
pub fn max_flattening_error<F: Flatten<f64>>(curve: &CubicBezierSegment<f64>, tolerance: f64) -> f64 {
    const STEPS: u32 = 50;

    let offset = F::offset();
    let mut max_error: f64 = 0.0;
    F::flatten(curve, tolerance, &mut |segment, range| {
        for i in 0..=STEPS {
            let t = range.start + (range.end - range.start) * i as f64 / STEPS as f64;
            let mut p = curve.sample(t);
            if offset != 0.0 {
                let tangent = curve.derivative(t);
                if tangent.length() < 1e-6 {
                    continue;
                }
                p += with_length(rotate_90_cw(tangent), offset);
            }
            max_error = max_error.max(segment.distance_to_point(p));
        }
    });

    max_error
}

/// Whether the curve bends gently enough for its offset by `offset` to be free
/// of cusps and loops.
pub fn has_smooth_offset(curve: &CubicBezierSegment<f64>, offset: f64) -> bool {
    const STEPS: u32 = 100;

    (0..=STEPS).all(|i| {
        let radius = curve.curvature_radius(i as f64 / STEPS as f64);
        radius.is_nan() || radius.abs() >= 4.0 * offset.abs()
    })
}

#[cfg(test)]
mod flattening {
    use super::*;
    use strokelet_geom::FlattenOptions;

    #[test]
    fn edge_count_decreases_with_tolerance() {
        let curves = generate_bezier_curves(200, 1);
        let quads = generate_quadratic_curves(200, 2);

        for &(fine, coarse) in &[(0.01, 0.1), (0.1, 1.0)] {
            assert!(count_edges_cubic::<Centerline>(&curves, fine) > count_edges_cubic::<Centerline>(&curves, coarse));
            assert!(count_edges_cubic::<RightSide>(&curves, fine) > count_edges_cubic::<RightSide>(&curves, coarse));
            assert!(count_edges_quad::<Centerline>(&quads, fine) > count_edges_quad::<Centerline>(&quads, coarse));
        }
    }

    #[test]
    fn centerline_within_tolerance() {
        let curves = generate_bezier_curves(200, 3);
        for &tolerance in &TOLERANCES {
            for curve in &curves {
                let error = max_flattening_error::<Centerline>(curve, tolerance);
                assert!(
                    error <= tolerance * 1.05,
                    "{:?} tolerance {} error {}",
                    curve,
                    tolerance,
                    error
                );
            }
        }
    }

    #[test]
    fn stroke_sides_within_tolerance() {
        let curves: Vec<_> = generate_bezier_curves(200, 13)
            .into_iter()
            .filter(|curve| has_smooth_offset(curve, HALF_STROKE_WIDTH))
            .collect();
        assert!(curves.len() > 50);

        for &tolerance in &[0.01, 0.05, 0.2, 1.0] {
            for curve in &curves {
                let right = max_flattening_error::<RightSide>(curve, tolerance);
                let left = max_flattening_error::<LeftSide>(curve, tolerance);
                assert!(
                    right <= tolerance * 1.05 && left <= tolerance * 1.05,
                    "{:?} tolerance {} right {} left {}",
                    curve,
                    tolerance,
                    right,
                    left
                );
            }
        }
    }

    #[test]
    fn ranges_cover_the_curve() {
        let curves = generate_bezier_curves(100, 4);
        for curve in &curves {
            for &tolerance in &[0.01, 0.5] {
                let mut previous_end = 0.0;
                let mut last_point = None;
                RightSide::flatten(curve, tolerance, &mut |segment, range| {
                    assert_eq!(range.start, previous_end);
                    assert!(range.end >= range.start);
                    if let Some(p) = last_point {
                        assert_eq!(segment.from, p);
                    }
                    previous_end = range.end;
                    last_point = Some(segment.to);
                });
                assert_eq!(previous_end, 1.0);
            }
        }
    }

    #[test]
    fn offset_vertices_lie_on_the_offset_curve() {
        let curves = generate_bezier_curves(100, 5);
        for curve in &curves {
            for &offset in &[HALF_STROKE_WIDTH, -HALF_STROKE_WIDTH] {
                curve.for_each_offset_flattened(offset, 0.05, &mut |segment, range| {
                    let tangent = curve.derivative(range.end);
                    if tangent.length() < 1e-3 {
                        return;
                    }
                    let expected = curve.sample(range.end) + with_length(rotate_90_cw(tangent), offset);
                    assert!(
                        (segment.to - expected).length() < 1e-6,
                        "{:?} at t={} {:?} != {:?}",
                        curve,
                        range.end,
                        segment.to,
                        expected
                    );
                });
            }
        }
    }

    #[test]
    fn stroke_sides_have_opposite_end_points() {
        for curve in &generate_bezier_curves(50, 6) {
            let options = FlattenOptions::tolerance(0.1).with_offset(HALF_STROKE_WIDTH);
            let right = curve.flattened_path(&options);
            let left = curve.flattened_path(&options.with_offset(-HALF_STROKE_WIDTH));

            let right = right.points();
            let left = left.points();
            let start = right[0].lerp(left[0], 0.5);
            let end = right[right.len() - 1].lerp(left[left.len() - 1], 0.5);
            assert!((start - curve.from).length() < 1e-9);
            assert!((end - curve.to).length() < 1e-9);
        }
    }

    #[test]
    fn flattened_svg_arcs_end_at_their_end_points() {
        for arc in &generate_svg_arcs(100, 7) {
            for &tolerance in &[0.01, 0.1, 1.0] {
                let path = arc.flattened_path(&FlattenOptions::tolerance(tolerance));
                let points = path.points();
                assert_eq!(points[0], arc.from);
                assert_eq!(points[points.len() - 1], arc.to);
                assert!(points.len() >= 2);
            }
        }
    }

    #[test]
    fn svg_arc_halves_meet_on_the_ellipse() {
        for svg_arc in &generate_svg_arcs(100, 8) {
            let arc = svg_arc.to_arc();
            let middle = arc.get_angle(0.5);
            let (a, b) = match svg_arc.split_at_angle(middle) {
                Some(halves) => halves,
                None => panic!("{:?} should split at {:?}", svg_arc, middle),
            };

            assert_eq!(a.to, b.from);
            assert!((a.to - arc.sample(0.5)).length() < 1e-6);

            // Each half describes the same ellipse.
            let first = a.to_arc();
            assert!((first.center - arc.center).length() < 1e-6 * arc.radii.x.max(arc.radii.y));
            assert!(!a.flags.large_arc && !b.flags.large_arc);
        }
    }
}

#[cfg(test)]
mod numerics {
    use super::*;
    use strokelet_geom::intersection;
    use strokelet_geom::roots::solve_quadratic;

    #[test]
    fn quadratic_roots_are_roots() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..1000 {
            let a: f64 = rng.gen_range(-10.0..10.0);
            let b: f64 = rng.gen_range(-10.0..10.0);
            let c: f64 = rng.gen_range(-10.0..10.0);

            let (x1, x2) = solve_quadratic(a, b, c);
            let discriminant = b * b - 4.0 * a * c;
            assert_eq!(x1.is_nan(), discriminant < 0.0);
            for x in [x1, x2] {
                if x.is_nan() {
                    continue;
                }
                let residual = a * x * x + b * x + c;
                let scale = (a * x * x).abs() + (b * x).abs() + c.abs();
                assert!(residual.abs() <= 1e-9 * scale, "{} {} {} -> {}", a, b, c, x);
            }
            if !x2.is_nan() {
                assert!(x1 <= x2);
            }
        }
    }

    #[test]
    fn segment_intersections_are_on_both_segments() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut found = 0;
        for _ in 0..1000 {
            let a = LineSegment {
                from: random_point(&mut rng, 100.0),
                to: random_point(&mut rng, 100.0),
            };
            let b = LineSegment {
                from: random_point(&mut rng, 100.0),
                to: random_point(&mut rng, 100.0),
            };

            if let Some(p) = intersection::line_segments(a.from, a.to, b.from, b.to) {
                assert!(a.distance_to_point(p) < 1e-6);
                assert!(b.distance_to_point(p) < 1e-6);
                assert_eq!(a.intersection(&b), Some(p));
                found += 1;
            }
        }

        assert!(found > 100);
    }

    #[test]
    fn circle_intersections_are_on_both_circles() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..1000 {
            let c0 = random_point(&mut rng, 50.0);
            let c1 = random_point(&mut rng, 50.0);
            let r0 = rng.gen_range(1.0..60.0);
            let r1 = rng.gen_range(1.0..60.0);

            if let Some((p, q)) = intersection::circles(c0, r0, c1, r1) {
                for x in [p, q] {
                    assert!(((x - c0).length() - r0).abs() < 1e-6);
                    assert!(((x - c1).length() - r1).abs() < 1e-6);
                }
            }
        }
    }
}
