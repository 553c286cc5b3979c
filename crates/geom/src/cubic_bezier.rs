use crate::error::GeometryError;
use crate::flatten_cubic;
use crate::options::FlattenOptions;
use crate::path::{Path, PathBuilder};
use crate::quadrature::gauss_legendre5;
use crate::roots::solve_quadratic_in_unit_interval;
use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::utils::{rotate_90_cw, with_length};
use crate::{vector, LineSegment, Point, QuadraticBezierSegment, Vector};
use arrayvec::ArrayVec;

use core::ops::Range;

#[cfg(test)]
use std::vec::Vec;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    #[inline]
    fn derivative_coefficients(&self, t: S) -> (S, S, S, S) {
        let t2 = t * t;
        (
            -S::THREE * t2 + S::SIX * t - S::THREE,
            S::NINE * t2 - S::value(12.0) * t + S::THREE,
            -S::NINE * t2 + S::SIX * t,
            S::THREE * t2,
        )
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let (c0, c1, c2, c3) = self.derivative_coefficients(t);
        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    /// Sample the curve's second derivative at t (expecting t between 0 and 1).
    pub fn second_derivative(&self, t: S) -> Vector<S> {
        let c0 = S::SIX - S::SIX * t;
        let c1 = S::value(18.0) * t - S::value(12.0);
        let c2 = S::SIX - S::value(18.0) * t;
        let c3 = S::SIX * t;

        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    /// Signed radius of curvature at t.
    ///
    /// Positive when the curve turns counter-clockwise in a y-up frame. NaN
    /// where the curve is locally straight, including at cusps.
    pub fn curvature_radius(&self, t: S) -> S {
        let d1 = self.derivative(t);
        let d2 = self.second_derivative(t);
        let a = d1.cross(d2);
        if a.abs() < S::EPSILON {
            return S::nan();
        }

        let speed = d1.length();
        speed * speed * speed / a
    }

    /// Normal on the right side of the curve at an endpoint, scaled to `distance`.
    ///
    /// Only `t = 0` and `t = 1` are supported. When control points coincide
    /// with the endpoint, the direction falls back to the next distinct control
    /// point; a curve reduced to a single point has a zero normal.
    pub fn normal(&self, t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        if t == S::ZERO {
            Ok(self.start_normal(distance))
        } else if t == S::ONE {
            Ok(self.end_normal(distance))
        } else {
            Err(GeometryError::NormalAtInteriorParameter)
        }
    }

    pub(crate) fn start_normal(&self, distance: S) -> Vector<S> {
        let mut tangent = self.ctrl1 - self.from;
        if tangent == vector(S::ZERO, S::ZERO) {
            tangent = self.ctrl2 - self.from;
        }
        if tangent == vector(S::ZERO, S::ZERO) {
            tangent = self.to - self.from;
        }

        with_length(rotate_90_cw(tangent), distance)
    }

    pub(crate) fn end_normal(&self, distance: S) -> Vector<S> {
        let mut tangent = self.to - self.ctrl2;
        if tangent == vector(S::ZERO, S::ZERO) {
            tangent = self.to - self.ctrl1;
        }
        if tangent == vector(S::ZERO, S::ZERO) {
            tangent = self.to - self.from;
        }

        with_length(rotate_90_cw(tangent), distance)
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        let (t0, t1) = (t_range.start, t_range.end);
        let from = self.sample(t0);
        let to = self.sample(t1);

        let d = QuadraticBezierSegment {
            from: (self.ctrl1 - self.from).to_point(),
            ctrl: (self.ctrl2 - self.ctrl1).to_point(),
            to: (self.to - self.ctrl2).to_point(),
        };

        let dt = t1 - t0;
        let ctrl1 = from + d.sample(t0).to_vector() * dt;
        let ctrl2 = to - d.sample(t1).to_vector() * dt;

        CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from + (self.ctrl1 - self.from) * t;
        let ctrl2a = self.ctrl1 + (self.ctrl2 - self.ctrl1) * t;
        let ctrl1aa = ctrl1a + (ctrl2a - ctrl1a) * t;
        let ctrl3a = self.ctrl2 + (self.to - self.ctrl2) * t;
        let ctrl2aa = ctrl2a + (ctrl3a - ctrl2a) * t;
        let ctrl1aaa = ctrl1aa + (ctrl2aa - ctrl1aa) * t;

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> CubicBezierSegment<S> {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> CubicBezierSegment<S> {
        self.split(t).1
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if the curve can be approximated with a single line segment, given
    /// a tolerance threshold.
    ///
    /// When the control points project inside of the baseline, the distance
    /// between the curve and the baseline is bounded using the distances of the
    /// control points to the line, which is tighter than the convex hull.
    /// Otherwise the control points must be within the tolerance of the
    /// baseline segment itself.
    pub fn is_linear(&self, tolerance: S) -> bool {
        let baseline = self.to - self.from;
        let v1 = self.ctrl1 - self.from;
        let v2 = self.ctrl2 - self.from;
        let threshold = tolerance * tolerance;

        let baseline_len2 = baseline.square_length();
        if baseline_len2 == S::ZERO {
            return v1.square_length() <= threshold && v2.square_length() <= threshold;
        }

        let u1 = v1.dot(baseline) / baseline_len2;
        let u2 = v2.dot(baseline) / baseline_len2;
        let in_range = |u: S| u >= S::ZERO && u <= S::ONE;
        if !in_range(u1) || !in_range(u2) {
            let baseline = self.baseline();
            return baseline.square_distance_to_point(self.ctrl1) <= threshold
                && baseline.square_distance_to_point(self.ctrl2) <= threshold;
        }

        let c1 = baseline.cross(v1);
        let c2 = baseline.cross(v2);
        let d1 = (c1 * c1) / baseline_len2;
        let d2 = (c2 * c2) / baseline_len2;

        let factor = if (c1 * c2) > S::ZERO {
            S::THREE / S::FOUR
        } else {
            S::FOUR / S::NINE
        };

        let f2 = factor * factor;

        d1 * f2 <= threshold && d2 * f2 <= threshold
    }

    /// Returns true when the curve starts and ends at the same point with one
    /// of its control points also there.
    ///
    /// Such curves are skipped by the flattening algorithm.
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to && (self.ctrl1 == self.from || self.ctrl2 == self.from)
    }

    /// Parameters of the inflection points of the curve in `[0, 1)`, in
    /// ascending order. Missing inflection points are NaN and come last.
    ///
    /// The inflection points are the roots of the cross product of the first
    /// and second derivatives.
    pub fn inflections(&self) -> (S, S) {
        let (p0, p1, p2, p3) = (self.from, self.ctrl1, self.ctrl2, self.to);

        let ax = -p0.x + S::THREE * p1.x - S::THREE * p2.x + p3.x;
        let ay = -p0.y + S::THREE * p1.y - S::THREE * p2.y + p3.y;
        let bx = p0.x - S::TWO * p1.x + p2.x;
        let by = p0.y - S::TWO * p1.y + p2.y;
        let cx = p1.x - p0.x;
        let cy = p1.y - p0.y;

        let a = ay * bx - ax * by;
        let b = ay * cx - ax * cy;
        let c = by * cx - bx * cy;

        solve_quadratic_in_unit_interval(a, b, c)
    }

    /// Split the curve at its inflection points strictly between 0 and 1.
    ///
    /// Returns between one and three curves, the curve itself when there is no
    /// inflection point.
    pub fn split_at_inflections(&self) -> ArrayVec<Self, 3> {
        let mut result = ArrayVec::new();
        let (t1, t2) = self.inflections();
        let is_split_point = |t: S| t > S::ZERO && t < S::ONE;

        let mut remaining = *self;
        let mut consumed = S::ZERO;
        for t in [t1, t2] {
            if !is_split_point(t) {
                continue;
            }
            // The remaining curve starts at the previous split point.
            let local_t = (t - consumed) / (S::ONE - consumed);
            let (before, after) = remaining.split(local_t);
            result.push(before);
            remaining = after;
            consumed = t;
        }
        result.push(remaining);

        result
    }

    /// Length of the curve.
    ///
    /// The speed is integrated with a five point Gauss-Legendre rule between
    /// inflection points, which is typically within 1% of the real length.
    pub fn length(&self) -> S {
        let mut length = S::ZERO;
        for piece in self.split_at_inflections() {
            let speed = |t: S| piece.derivative(t).length();
            length += gauss_legendre5(&speed, S::ZERO, S::ONE);
        }

        length
    }

    /// Approximates the curve offset by `offset` along its normal with a
    /// sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the
    /// curve and its approximation. The callback receives each segment and the
    /// range of curve parameters it covers. The first segment starts at the
    /// offset start point and the last segment ends at the offset end point,
    /// the end of its range being exactly `1.0`.
    pub fn for_each_offset_flattened<F>(&self, offset: S, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        flatten_cubic::flatten_cubic(self, offset, tolerance, callback);
    }

    /// Approximates the curve with sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    pub fn for_each_flattened<F: FnMut(&LineSegment<S>)>(&self, tolerance: S, callback: &mut F) {
        self.for_each_offset_flattened(S::ZERO, tolerance, &mut |segment, _| callback(segment));
    }

    /// Approximates the curve with sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    ///
    /// The end of the t parameter range at the final segment is guaranteed to be equal to `1.0`.
    pub fn for_each_flattened_with_t<F: FnMut(&LineSegment<S>, Range<S>)>(&self, tolerance: S, callback: &mut F) {
        self.for_each_offset_flattened(S::ZERO, tolerance, callback);
    }

    /// Builds the polyline approximating the curve, offset by `options.offset`.
    ///
    /// The path starts with a move to the offset start point, followed by one
    /// line per segment of the approximation.
    pub fn flattened_path(&self, options: &FlattenOptions) -> Path<S> {
        let offset = S::value(options.offset);
        let mut path = Path::new();
        path.move_to(self.from + self.start_normal(offset));
        self.for_each_offset_flattened(offset, S::value(options.tolerance), &mut |segment, _| {
            path.line_to(segment.to);
        });

        path
    }

    #[inline]
    pub fn to_f32(&self) -> CubicBezierSegment<f32> {
        CubicBezierSegment {
            from: self.from.to_f32(),
            ctrl1: self.ctrl1.to_f32(),
            ctrl2: self.ctrl2.to_f32(),
            to: self.to.to_f32(),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> CubicBezierSegment<f64> {
        CubicBezierSegment {
            from: self.from.to_f64(),
            ctrl1: self.ctrl1.to_f64(),
            ctrl2: self.ctrl2.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

impl<S: Scalar> Segment for CubicBezierSegment<S> {
    impl_segment!(S);

    fn normal(&self, t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        self.normal(t, distance)
    }
}

#[cfg(test)]
fn max_deviation(curve: &CubicBezierSegment<f64>, points: &[Point<f64>]) -> f64 {
    let mut max = 0.0f64;
    for i in 0..=1000 {
        let p = curve.sample(i as f64 / 1000.0);
        let mut closest = f64::MAX;
        for w in points.windows(2) {
            let segment = LineSegment { from: w[0], to: w[1] };
            closest = closest.min(segment.distance_to_point(p));
        }
        max = max.max(closest);
    }

    max
}

#[cfg(test)]
fn flattened_points(curve: &CubicBezierSegment<f64>, tolerance: f64) -> Vec<Point<f64>> {
    let mut points = std::vec![curve.from];
    curve.for_each_flattened(tolerance, &mut |s| {
        points.push(s.to);
    });

    points
}

#[test]
fn derivatives() {
    let c1 = CubicBezierSegment {
        from: Point::new(1.0, 1.0),
        ctrl1: Point::new(1.0, 2.0),
        ctrl2: Point::new(2.0, 1.0),
        to: Point::new(2.0, 2.0),
    };

    assert_eq!(c1.derivative(0.0).x, 0.0);
    assert_eq!(c1.derivative(1.0).x, 0.0);
    assert_eq!(c1.derivative(0.5).y, 0.0);

    // Compare the second derivative with finite differences of the first one.
    let h = 1e-6;
    for &t in &[0.1, 0.5, 0.8] {
        let expected = (c1.derivative(t + h) - c1.derivative(t - h)) / (2.0 * h);
        let actual = c1.second_derivative(t);
        assert!((expected - actual).length() < 1e-4);
    }
}

#[test]
fn curvature_radius() {
    // Quarter of the unit circle.
    let k = 0.5522847498;
    let arc = CubicBezierSegment {
        from: Point::new(1.0f64, 0.0),
        ctrl1: Point::new(1.0, k),
        ctrl2: Point::new(k, 1.0),
        to: Point::new(0.0, 1.0),
    };
    for &t in &[0.0, 0.25, 0.5, 1.0] {
        assert!((arc.curvature_radius(t) - 1.0).abs() < 0.05);
    }
    // Negative when turning the other way.
    assert!((arc.flip().curvature_radius(0.5) + 1.0).abs() < 0.05);

    let straight = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(10.0, 0.0),
        ctrl2: Point::new(20.0, 0.0),
        to: Point::new(30.0, 0.0),
    };
    assert!(straight.curvature_radius(0.5).is_nan());
}

#[test]
fn normals() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(1.0, 0.0),
        ctrl2: Point::new(1.0, 1.0),
        to: Point::new(0.0, 1.0),
    };

    assert_eq!(curve.normal(0.0, 2.0), Ok(vector(0.0, -2.0)));
    assert_eq!(curve.normal(1.0, 2.0), Ok(vector(0.0, 2.0)));
    assert_eq!(curve.normal(0.5, 2.0), Err(GeometryError::NormalAtInteriorParameter));

    // The start tangent falls back to the second control point.
    let curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(0.0, 0.0),
        ctrl2: Point::new(0.0, 3.0),
        to: Point::new(5.0, 3.0),
    };
    assert_eq!(curve.normal(0.0, 1.0), Ok(vector(1.0, 0.0)));

    let point = CubicBezierSegment {
        from: Point::new(1.0f64, 1.0),
        ctrl1: Point::new(1.0, 1.0),
        ctrl2: Point::new(1.0, 1.0),
        to: Point::new(1.0, 1.0),
    };
    assert_eq!(point.normal(1.0, 1.0), Ok(vector(0.0, 0.0)));
}

#[test]
fn inflections() {
    let s_curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(1.0, 0.0),
        ctrl2: Point::new(0.0, 1.0),
        to: Point::new(1.0, 1.0),
    };
    let (t1, t2) = s_curve.inflections();
    assert!((t1 - 0.5).abs() < 1e-12);
    assert!(t2.is_nan());

    let pieces = s_curve.split_at_inflections();
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].from, s_curve.from);
    assert!((pieces[0].to - s_curve.sample(0.5)).length() < 1e-12);
    assert_eq!(pieces[0].to, pieces[1].from);
    assert_eq!(pieces[1].to, s_curve.to);

    let arch = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(0.0, 1.0),
        ctrl2: Point::new(1.0, 1.0),
        to: Point::new(1.0, 0.0),
    };
    let (t1, t2) = arch.inflections();
    assert!(t1.is_nan() && t2.is_nan());
    assert_eq!(arch.split_at_inflections().len(), 1);
    assert_eq!(arch.split_at_inflections()[0], arch);
}

#[test]
fn two_inflections() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(-50.0, 100.0),
        ctrl2: Point::new(-50.0, 50.0),
        to: Point::new(100.0, 0.0),
    };

    let pieces = curve.split_at_inflections();
    let (t1, t2) = curve.inflections();
    assert!((t1 - 0.1885805).abs() < 1e-6);
    assert!((t2 - 0.5891973).abs() < 1e-6);
    assert_eq!(pieces.len(), 3);
    assert!((pieces[0].to - curve.sample(t1)).length() < 1e-9);
    assert!((pieces[1].to - curve.sample(t2)).length() < 1e-9);
    assert_eq!(pieces[2].to, curve.to);
}

#[test]
fn length() {
    let straight = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(10.0, 0.0),
        ctrl2: Point::new(20.0, 0.0),
        to: Point::new(30.0, 0.0),
    };
    assert!((straight.length() - 30.0).abs() < 1e-9);

    let k = 0.5522847498;
    let quarter = CubicBezierSegment {
        from: Point::new(100.0f64, 0.0),
        ctrl1: Point::new(100.0, 100.0 * k),
        ctrl2: Point::new(100.0 * k, 100.0),
        to: Point::new(0.0, 100.0),
    };
    let expected = 50.0 * core::f64::consts::PI;
    assert!((quarter.length() - expected).abs() < expected * 0.01);
}

#[test]
fn is_linear() {
    let mut angle = 0.0;
    let center = Point::new(1000.0, -700.0);
    for _ in 0..100 {
        for i in 0..10 {
            for j in 0..10 {
                let (sin, cos) = f64::sin_cos(angle);
                let endpoint = Vector::new(cos * 100.0, sin * 100.0);
                let curve = CubicBezierSegment {
                    from: center - endpoint,
                    ctrl1: center + endpoint.lerp(-endpoint, i as f64 / 9.0),
                    ctrl2: center + endpoint.lerp(-endpoint, j as f64 / 9.0),
                    to: center + endpoint,
                };
                assert!(curve.is_linear(1e-10));
            }
        }
        angle += 0.001;
    }
}

#[test]
fn is_linear_control_points_past_the_end() {
    // Collinear, but the curve goes well past its end point before coming back.
    let curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(50.0, 0.0),
        ctrl2: Point::new(200.0, 0.0),
        to: Point::new(100.0, 0.0),
    };
    assert!(!curve.is_linear(1.0));
    assert!(curve.is_linear(100.0));
}

#[test]
fn test_flatten_end() {
    let segment = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(100.0, 0.0),
        ctrl2: Point::new(100.0, 100.0),
        to: Point::new(100.0, 200.0),
    };

    let mut last = segment.from;
    segment.for_each_flattened(0.0001, &mut |s| {
        last = s.to;
    });

    assert_eq!(last, segment.to);
}

#[test]
fn split_halves_follow_the_curve() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(40.0, 120.0),
        ctrl2: point(-30.0, 60.0),
        to: point(100.0, 10.0),
    };

    for &t in &[0.1, 0.25, 0.5, 0.8] {
        let (a, b) = curve.split(t);
        assert_eq!(a.from, curve.from);
        assert_eq!(b.to, curve.to);
        assert_eq!(a.to, b.from);

        for i in 0..=10 {
            let s = i as f64 / 10.0;
            assert!((a.sample(s) - curve.sample(t * s)).length() < 1e-9);
            assert!((b.sample(s) - curve.sample(t + (1.0 - t) * s)).length() < 1e-9);
        }

        assert_eq!(curve.before_split(t), a);
        assert_eq!(curve.after_split(t), b);
    }
}

#[test]
fn flatten_degenerate_with_distinct_control_point() {
    use crate::point;

    let segment = CubicBezierSegment {
        from: point(1.0f64, 1.0),
        ctrl1: point(1.0, 1.0),
        ctrl2: point(5.0, 3.0),
        to: point(1.0, 1.0),
    };
    assert!(segment.is_degenerate());

    let mut count = 0;
    segment.for_each_flattened(0.01, &mut |_| {
        count += 1;
    });
    segment.for_each_offset_flattened(2.0, 0.01, &mut |_, _| {
        count += 1;
    });

    assert_eq!(count, 0);
}

#[test]
fn test_flatten_point() {
    let segment = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(0.0, 0.0),
        ctrl2: Point::new(0.0, 0.0),
        to: Point::new(0.0, 0.0),
    };

    let mut count = 0;
    segment.for_each_flattened(0.0001, &mut |_| {
        count += 1;
    });

    assert_eq!(count, 0);
    assert!(segment.is_degenerate());
}

#[test]
fn flatten_closed_loop() {
    use crate::point;

    // Vertical curve going up and down again, the end points are the same but
    // the curve is not degenerate.
    let curve = CubicBezierSegment {
        from: point(-1061.0, -3327.0),
        ctrl1: point(-1061.0, -3177.0),
        ctrl2: point(-1061.0, -3477.0),
        to: point(-1061.0, -3327.0),
    };
    assert!(!curve.is_degenerate());

    for &tolerance in &[1.0, 0.1, 0.01] {
        let points = flattened_points(&curve, tolerance);
        assert!(points.len() > 2);
        assert_eq!(*points.last().unwrap(), curve.to);
        assert!(max_deviation(&curve, &points) <= tolerance * 1.001);
    }
}

#[test]
fn flatten_with_t() {
    let segment = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(0.0, 0.0),
        ctrl2: Point::new(50.0, 70.0),
        to: Point::new(100.0, 100.0),
    };

    for tolerance in &[0.1, 0.01, 0.001, 0.0001] {
        let tolerance = *tolerance;

        let mut a = Vec::new();
        segment.for_each_flattened(tolerance, &mut |s| {
            a.push(*s);
        });

        let mut b = Vec::new();
        let mut ts = Vec::new();
        segment.for_each_flattened_with_t(tolerance, &mut |s, t| {
            b.push(*s);
            ts.push(t);
        });

        assert_eq!(a, b);
        assert_eq!(ts[0].start, 0.0);
        assert_eq!(ts.last().unwrap().end, 1.0);

        for i in 0..b.len() {
            if i > 0 {
                assert_eq!(ts[i - 1].end, ts[i].start);
                assert_eq!(b[i - 1].to, b[i].from);
            }

            let sampled = segment.sample(ts[i].start);
            let point = b[i].from;
            let dist = (sampled - point).length();
            assert!(dist <= tolerance);

            let sampled = segment.sample(ts[i].end);
            let point = b[i].to;
            let dist = (sampled - point).length();
            assert!(dist <= tolerance);
        }
    }
}

#[test]
fn flatten_within_tolerance() {
    let curves = [
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(1.0, 0.0),
            ctrl2: Point::new(1.0, 1.0),
            to: Point::new(0.0, 1.0),
        },
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(100.0, 100.0),
            ctrl2: Point::new(0.0, 100.0),
            to: Point::new(100.0, 0.0),
        },
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(30.0, 100.0),
            ctrl2: Point::new(70.0, -100.0),
            to: Point::new(100.0, 0.0),
        },
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(-50.0, 100.0),
            ctrl2: Point::new(-50.0, 50.0),
            to: Point::new(100.0, 0.0),
        },
        CubicBezierSegment {
            from: Point::new(141.0, 135.0),
            ctrl1: Point::new(141.0, 130.0),
            ctrl2: Point::new(140.0, 130.0),
            to: Point::new(131.0, 130.0),
        },
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(100.0, 0.0),
            ctrl2: Point::new(0.0, 0.0),
            to: Point::new(100.0, 0.0),
        },
    ];

    for curve in &curves {
        for &tolerance in &[0.5, 0.1, 0.01] {
            let points = flattened_points(curve, tolerance);
            assert_eq!(*points.last().unwrap(), curve.to);
            let deviation = max_deviation(curve, &points);
            assert!(
                deviation <= tolerance * 1.001 + 1e-9,
                "{:?} tolerance {} deviation {}",
                curve,
                tolerance,
                deviation
            );
        }
    }
}

#[test]
fn flatten_random_curves() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let mut p = || Point::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));

    for _ in 0..50 {
        let curve = CubicBezierSegment {
            from: p(),
            ctrl1: p(),
            ctrl2: p(),
            to: p(),
        };
        for &tolerance in &[0.5, 0.05] {
            let points = flattened_points(&curve, tolerance);
            assert_eq!(*points.last().unwrap(), curve.to);
            assert!(max_deviation(&curve, &points) <= tolerance * 1.001 + 1e-9);
        }
    }
}

#[test]
fn fewer_segments_with_larger_tolerance() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(100.0, 0.0),
        ctrl2: Point::new(100.0, 100.0),
        to: Point::new(100.0, 200.0),
    };

    let coarse = flattened_points(&curve, 1.0).len();
    let fine = flattened_points(&curve, 0.01).len();
    assert!(coarse < fine);
}

#[test]
fn offset_flattening_quarter_circle() {
    let k = 0.5522847498;
    let quarter = CubicBezierSegment {
        from: Point::new(100.0f64, 0.0),
        ctrl1: Point::new(100.0, 100.0 * k),
        ctrl2: Point::new(100.0 * k, 100.0),
        to: Point::new(0.0, 100.0),
    };

    // The right side of a counter-clockwise arc is the outside.
    let path = quarter.flattened_path(&FlattenOptions::tolerance(0.05).with_offset(10.0));
    let points = path.points();
    assert!(points.len() > 2);
    assert!((points[0] - Point::new(110.0, 0.0)).length() < 1e-9);
    assert!((*points.last().unwrap() - Point::new(0.0, 110.0)).length() < 1e-9);
    for p in &points {
        assert!((p.to_vector().length() - 110.0).abs() < 0.1);
    }

    let inner = quarter.flattened_path(&FlattenOptions::tolerance(0.05).with_offset(-10.0));
    for p in &inner.points() {
        assert!((p.to_vector().length() - 90.0).abs() < 0.1);
    }
}

#[test]
fn arc_length_parametrization() {
    use crate::options::ArcLengthOptions;

    let curve = CubicBezierSegment {
        from: Point::new(0.0f64, 0.0),
        ctrl1: Point::new(10.0, 0.0),
        ctrl2: Point::new(20.0, 0.0),
        to: Point::new(30.0, 0.0),
    };
    let parametrization = curve.arc_length_parametrization(&ArcLengthOptions::default()).unwrap();
    assert!((parametrization.length() - 30.0).abs() < 1e-6);
    assert!((parametrization.t_at_length(15.0) - 0.5).abs() < 0.01);
}
