//! Flattening of cubic bézier curves and of their offset curves.
//!
//! Implements "Fast, precise flattening of cubic Bézier path and offset
//! curves" (T. F. Hain, A. L. Ahmad, S. V. R. Racherla, D. D. Langan, 2005).
//!
//! The curve is cut at windows around its inflection points, which are
//! approximated with a single line when possible. The remaining parts are
//! subdivided at parameters derived from the local curvature so that each
//! step stays within the tolerance. Each step is validated and shortened when
//! the estimate is too optimistic: the convex hull bound of
//! `CubicBezierSegment::is_linear` for the curve itself, and the distance
//! between the offset chord and points sampled on the offset curve otherwise.

use crate::scalar::Scalar;
use crate::utils::{rotate_90_cw, with_length};
use crate::{CubicBezierSegment, LineSegment, Point};

use arrayvec::ArrayVec;
use core::ops::Range;

/// Maximum number of subdivisions of a smooth part of a curve.
pub(crate) const MAX_FLATTENING_STEPS: u32 = 10_000;

/// Maximum number of times a step can be halved before being accepted.
const MAX_STEP_HALVINGS: u32 = 32;

/// Number of intervals the offset curve of a step is sampled at.
const OFFSET_SAMPLE_INTERVALS: u32 = 16;

/// Flattens `curve` offset by `offset` along its right side normal.
///
/// The callback receives consecutive segments along with the range of
/// parameters of the original curve they cover. Degenerate curves produce no
/// segment.
pub(crate) fn flatten_cubic<S, F>(curve: &CubicBezierSegment<S>, offset: S, tolerance: S, callback: &mut F)
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    debug_assert!(tolerance > S::ZERO);

    if curve.is_degenerate() {
        return;
    }

    let mut emitter = Emitter {
        curve,
        offset,
        last_point: offset_start(curve, offset),
        last_t: S::ZERO,
        callback,
    };

    let mut start = S::ZERO;
    for window in inflection_windows(curve, tolerance) {
        if start < window.start {
            flatten_smooth(&mut emitter, start..window.start, tolerance);
        }
        flatten_inflection(&mut emitter, window.clone(), tolerance);
        start = window.end;
    }

    if start < S::ONE {
        flatten_smooth(&mut emitter, start..S::ONE, tolerance);
    }
}

struct Emitter<'l, S, F> {
    curve: &'l CubicBezierSegment<S>,
    offset: S,
    last_point: Point<S>,
    last_t: S,
    callback: &'l mut F,
}

impl<'l, S, F> Emitter<'l, S, F>
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    fn line_to(&mut self, to: Point<S>, t: S) {
        let segment = LineSegment {
            from: self.last_point,
            to,
        };
        (self.callback)(&segment, self.last_t..t);
        self.last_point = to;
        self.last_t = t;
    }

    /// Emits the end of a sub-curve ending at `t` in the original curve.
    fn end_of(&mut self, sub_curve: &CubicBezierSegment<S>, t: S) {
        // The end of the original curve is reproduced exactly.
        let p = if t >= S::ONE {
            offset_end(self.curve, self.offset)
        } else {
            offset_end(sub_curve, self.offset)
        };
        self.line_to(p, t);
    }
}

fn offset_start<S: Scalar>(curve: &CubicBezierSegment<S>, offset: S) -> Point<S> {
    if offset == S::ZERO {
        return curve.from;
    }

    curve.from + curve.start_normal(offset)
}

fn offset_end<S: Scalar>(curve: &CubicBezierSegment<S>, offset: S) -> Point<S> {
    if offset == S::ZERO {
        return curve.to;
    }

    curve.to + curve.end_normal(offset)
}

/// Sub-curve between two parameters of `curve`, exact at the curve's own end
/// points.
fn sub_curve<S: Scalar>(curve: &CubicBezierSegment<S>, range: Range<S>) -> CubicBezierSegment<S> {
    let (a, b) = (range.start, range.end);
    if a <= S::ZERO && b >= S::ONE {
        return *curve;
    }
    if b >= S::ONE {
        return curve.after_split(a);
    }
    if a <= S::ZERO {
        return curve.before_split(b);
    }

    curve.after_split(a).before_split((b - a) / (S::ONE - a))
}

/// Parameter range around an inflection point at `t` where the curve deviates
/// from a line by less than the tolerance.
fn inflection_range<S: Scalar>(curve: &CubicBezierSegment<S>, t: S, tolerance: S) -> Range<S> {
    if t.is_nan() {
        return S::infinity()..S::infinity();
    }

    let c = if t != S::ZERO { curve.after_split(t) } else { *curve };

    let zero = crate::vector(S::ZERO, S::ZERO);
    let mut nr = c.ctrl1 - c.from;
    if nr == zero {
        nr = c.ctrl2 - c.from;
    }
    if nr == zero {
        return S::ZERO..S::ONE;
    }

    let ns = c.to - c.from;
    let s3 = ns.cross(nr).abs() / nr.length();
    if s3 == S::ZERO {
        return S::ZERO..S::ONE;
    }

    let tf = (tolerance / s3).cbrt();
    let half_width = tf * (S::ONE - t);

    (t - half_width)..(t + half_width)
}

/// Ordered, non-overlapping windows around the inflection points, clipped to
/// `[0, 1]`.
fn inflection_windows<S: Scalar>(curve: &CubicBezierSegment<S>, tolerance: S) -> ArrayVec<Range<S>, 2> {
    let mut windows: ArrayVec<Range<S>, 2> = ArrayVec::new();

    let (t1, t2) = curve.inflections();
    for t in [t1, t2] {
        if t.is_nan() {
            continue;
        }

        let range = inflection_range(curve, t, tolerance);
        let mut start = range.start.max(S::ZERO);
        let end = range.end.min(S::ONE);
        if let Some(previous) = windows.last() {
            if start < previous.end {
                start = previous.end;
            }
        }

        if start < end {
            windows.push(start..end);
        }
    }

    windows
}

fn flatten_inflection<S, F>(emitter: &mut Emitter<S, F>, range: Range<S>, tolerance: S)
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    let curve = sub_curve(emitter.curve, range.clone());
    if is_flat(&curve, emitter.offset, tolerance) {
        emitter.end_of(&curve, range.end);
    } else {
        flatten_sub_curve(emitter, curve, range, tolerance);
    }
}

fn flatten_smooth<S, F>(emitter: &mut Emitter<S, F>, range: Range<S>, tolerance: S)
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    let curve = sub_curve(emitter.curve, range.clone());
    flatten_sub_curve(emitter, curve, range, tolerance);
}

/// Subdivides a part of the curve without inflection points.
fn flatten_sub_curve<S, F>(emitter: &mut Emitter<S, F>, mut curve: CubicBezierSegment<S>, range: Range<S>, tolerance: S)
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    let offset = emitter.offset;
    let mut t_start = range.start;
    let mut steps = 0;

    loop {
        let t = step_estimate(&curve, offset, tolerance);
        let t = validate_step(&curve, t, offset, tolerance);
        if t >= S::ONE {
            break;
        }

        curve = curve.after_split(t);
        t_start = t_start + (range.end - t_start) * t;
        emitter.line_to(offset_start(&curve, offset), t_start);

        steps += 1;
        if steps >= MAX_FLATTENING_STEPS {
            log::debug!(
                "flatten_cubic: stopped after {} steps in {:?}",
                MAX_FLATTENING_STEPS,
                range
            );
            break;
        }
    }

    emitter.end_of(&curve, range.end);
}

/// Parameter of the next subdivision.
fn step_estimate<S: Scalar>(curve: &CubicBezierSegment<S>, offset: S, tolerance: S) -> S {
    let v1 = curve.ctrl1 - curve.from;
    let v2 = curve.ctrl2 - curve.from;

    // Distance of the second control point to the start tangent, scaled by its
    // length.
    let s2_numerator = v2.cross(v1);
    let r1 = v1.length();
    if s2_numerator * r1 == S::ZERO {
        return S::ONE;
    }

    let s2 = s2_numerator / r1;
    let effective_tolerance = tolerance / (S::ONE + S::TWO * offset * s2 / (S::THREE * r1 * r1)).abs();
    let t = S::TWO * (effective_tolerance / (S::THREE * s2.abs())).sqrt();

    t.min(S::ONE)
}

/// Halves the step until the part of the curve it covers is flat enough.
fn validate_step<S: Scalar>(curve: &CubicBezierSegment<S>, mut t: S, offset: S, tolerance: S) -> S {
    for _ in 0..MAX_STEP_HALVINGS {
        let step = if t < S::ONE { curve.before_split(t) } else { *curve };
        if is_flat(&step, offset, tolerance) {
            return t;
        }
        t = t * S::HALF;
    }

    log::trace!("flatten_cubic: accepting step {:?} above the tolerance", t);

    t
}

/// Whether the chord between the offset end points of `curve` stays within
/// `tolerance` of its offset curve.
///
/// Without offset the convex hull bound is exact enough. The offset curve is
/// not a bézier curve, so it is sampled instead.
fn is_flat<S: Scalar>(curve: &CubicBezierSegment<S>, offset: S, tolerance: S) -> bool {
    if offset == S::ZERO {
        return curve.is_linear(tolerance);
    }

    let chord = LineSegment {
        from: offset_start(curve, offset),
        to: offset_end(curve, offset),
    };
    let square_tolerance = tolerance * tolerance;
    let intervals = S::value(OFFSET_SAMPLE_INTERVALS as f64);
    for i in 1..OFFSET_SAMPLE_INTERVALS {
        let s = S::value(i as f64) / intervals;
        let p = curve.sample(s) + with_length(rotate_90_cw(curve.derivative(s)), offset);
        if chord.square_distance_to_point(p) > square_tolerance {
            return false;
        }
    }

    true
}

#[cfg(test)]
use crate::point;

#[test]
fn windows_are_ordered_and_disjoint() {
    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(-50.0, 100.0),
        ctrl2: point(-50.0, 50.0),
        to: point(100.0, 0.0),
    };

    assert_eq!(inflection_windows(&curve, 0.01).len(), 2);
    for &tolerance in &[10.0, 1.0, 0.01] {
        let windows = inflection_windows(&curve, tolerance);
        let mut previous_end = 0.0;
        for window in &windows {
            assert!(window.start >= previous_end);
            assert!(window.start < window.end);
            assert!(window.end <= 1.0);
            previous_end = window.end;
        }
    }

    // A curve without inflection points has no window.
    let arch = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(0.0, 1.0),
        ctrl2: point(1.0, 1.0),
        to: point(1.0, 0.0),
    };
    assert!(inflection_windows(&arch, 0.1).is_empty());
}

#[test]
fn inflection_range_contains_the_inflection() {
    let s_curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(100.0, 0.0),
        ctrl2: point(0.0, 100.0),
        to: point(100.0, 100.0),
    };

    let range = inflection_range(&s_curve, 0.5, 0.1);
    assert!(range.start < 0.5 && range.end > 0.5);
    // The window shrinks with the tolerance.
    let narrow = inflection_range(&s_curve, 0.5, 0.001);
    assert!(narrow.end - narrow.start < range.end - range.start);

    let missing = inflection_range(&s_curve, f64::NAN, 0.1);
    assert!(missing.start.is_infinite());
}

#[test]
fn sub_curves_keep_end_points() {
    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(10.0, 20.0),
        ctrl2: point(30.0, -20.0),
        to: point(40.0, 0.0),
    };

    assert_eq!(sub_curve(&curve, 0.0..1.0), curve);
    assert_eq!(sub_curve(&curve, 0.3..1.0).to, curve.to);
    assert_eq!(sub_curve(&curve, 0.0..0.3).from, curve.from);

    let middle = sub_curve(&curve, 0.25..0.75);
    assert!((middle.from - curve.sample(0.25)).length() < 1e-9);
    assert!((middle.to - curve.sample(0.75)).length() < 1e-9);
}

#[test]
fn straight_curve_is_a_single_segment() {
    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(10.0, 0.0),
        ctrl2: point(20.0, 0.0),
        to: point(30.0, 0.0),
    };

    let mut segments = std::vec::Vec::new();
    flatten_cubic(&curve, 0.0, 0.1, &mut |segment, range| {
        segments.push((*segment, range));
    });

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].0, curve.baseline());
    assert_eq!(segments[0].1, 0.0..1.0);
}

#[test]
fn offset_chords_are_checked_against_the_offset_curve() {
    // Close to an arc of radius 15 bulging up, the right side being the inner
    // side.
    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(1.0, 0.1),
        ctrl2: point(2.0, 0.1),
        to: point(3.0, 0.0),
    };

    assert!(curve.is_linear(0.12));
    assert!(is_flat(&curve, 0.0, 0.12));
    // The outer offset has twice the radius and bulges twice as much.
    assert!(!is_flat(&curve, -15.0, 0.12));
    assert!(is_flat(&curve, 7.5, 0.12));
}

#[test]
fn offset_polyline_within_tolerance() {
    let curves = [
        CubicBezierSegment {
            from: point(0.0f64, 0.0),
            ctrl1: point(50.0, 80.0),
            ctrl2: point(150.0, 80.0),
            to: point(200.0, 0.0),
        },
        CubicBezierSegment {
            from: point(0.0f64, 0.0),
            ctrl1: point(100.0, 0.0),
            ctrl2: point(0.0, 100.0),
            to: point(100.0, 100.0),
        },
    ];

    for curve in &curves {
        for &offset in &[-4.0, 4.0] {
            for &tolerance in &[0.05, 0.2] {
                let mut max_error: f64 = 0.0;
                flatten_cubic(curve, offset, tolerance, &mut |segment, range| {
                    for i in 0..=20 {
                        let t = range.start + (range.end - range.start) * i as f64 / 20.0;
                        let p = curve.sample(t) + with_length(rotate_90_cw(curve.derivative(t)), offset);
                        max_error = max_error.max(segment.distance_to_point(p));
                    }
                });

                assert!(
                    max_error <= tolerance * 1.05,
                    "offset {} tolerance {} error {}",
                    offset,
                    tolerance,
                    max_error
                );
            }
        }
    }
}
