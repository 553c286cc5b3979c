use crate::error::GeometryError;
use crate::options::FlattenOptions;
use crate::path::Path;
use crate::quadrature::gauss_legendre5;
use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::{CubicBezierSegment, LineSegment, Point, Vector};

use core::ops::Range;

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
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
    fn derivative_coefficients(&self, t: S) -> (S, S, S) {
        (S::TWO * t - S::TWO, -S::FOUR * t + S::TWO, S::TWO * t)
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let (c0, c1, c2) = self.derivative_coefficients(t);
        self.from.to_vector() * c0 + self.ctrl.to_vector() * c1 + self.to.to_vector() * c2
    }

    /// The second derivative of a quadratic curve is constant.
    pub fn second_derivative(&self, _t: S) -> Vector<S> {
        (self.from - self.ctrl * S::TWO + self.to.to_vector()) * S::TWO
    }

    /// Signed radius of curvature at t, NaN where the curve is straight.
    pub fn curvature_radius(&self, t: S) -> S {
        let d1 = self.derivative(t);
        let a = d1.cross(self.second_derivative(t));
        if a.abs() < S::EPSILON {
            return S::nan();
        }

        let speed = d1.length();
        speed * speed * speed / a
    }

    /// Normal on the right side of the curve at an endpoint, scaled to `distance`.
    ///
    /// Same as the normal of the equivalent cubic bézier curve.
    pub fn normal(&self, t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        self.to_cubic().normal(t, distance)
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        QuadraticBezierSegment {
            from: self.to,
            ctrl: self.ctrl,
            to: self.from,
        }
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        let t0 = t_range.start;
        let t1 = t_range.end;

        let from = self.sample(t0);
        let to = self.sample(t1);
        let ctrl = from + (self.ctrl - self.from).lerp(self.to - self.ctrl, t0) * (t1 - t0);

        QuadraticBezierSegment { from, ctrl, to }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (QuadraticBezierSegment<S>, QuadraticBezierSegment<S>) {
        let split_point = self.sample(t);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: self.from.lerp(self.ctrl, t),
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: self.ctrl.lerp(self.to, t),
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> QuadraticBezierSegment<S> {
        QuadraticBezierSegment {
            from: self.from,
            ctrl: self.from.lerp(self.ctrl, t),
            to: self.sample(t),
        }
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> QuadraticBezierSegment<S> {
        QuadraticBezierSegment {
            from: self.sample(t),
            ctrl: self.ctrl.lerp(self.to, t),
            to: self.to,
        }
    }

    /// Elevate this curve to a third order bézier.
    ///
    /// The cubic curve is the same curve, with the same parametrization.
    pub fn to_cubic(&self) -> CubicBezierSegment<S> {
        let two_thirds = S::TWO / S::THREE;
        CubicBezierSegment {
            from: self.from,
            ctrl1: self.from.lerp(self.ctrl, two_thirds),
            ctrl2: self.to.lerp(self.ctrl, two_thirds),
            to: self.to,
        }
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Computes the length of this segment.
    ///
    /// Uses the closed form of the integral of the speed. Straight curves and
    /// collinear curves that turn back on themselves, where the closed form
    /// breaks down, are integrated numerically on each side of the turn.
    pub fn length(&self) -> S {
        // B'(t) = b + 2·a·t
        let a = self.from - self.ctrl * S::TWO + self.to.to_vector();
        let b = (self.ctrl - self.from) * S::TWO;

        let aa = S::FOUR * a.dot(a);
        let bb = S::FOUR * a.dot(b);
        let cc = b.dot(b);

        if aa <= S::EPSILON * cc {
            // Constant speed.
            return (self.to - self.from).length();
        }

        let s_abc = S::TWO * (aa + bb + cc).sqrt();
        let a_2 = aa.sqrt();
        let a_32 = S::TWO * aa * a_2;
        let c_2 = S::TWO * cc.sqrt();
        let b_a = bb / a_2;

        let length = (a_32 * s_abc
            + a_2 * bb * (s_abc - c_2)
            + (S::FOUR * cc * aa - bb * bb) * ((S::TWO * a_2 + b_a + s_abc) / (b_a + c_2)).ln())
            / (S::FOUR * a_32);

        if length.is_finite() {
            return length;
        }

        // The speed vanishes at the turning point, where |B'| has a kink.
        let turn = (-a.dot(b) / (S::TWO * a.dot(a))).max(S::ZERO).min(S::ONE);
        let speed = |t: S| (b + a * (S::TWO * t)).length();

        gauss_legendre5(&speed, S::ZERO, turn) + gauss_legendre5(&speed, turn, S::ONE)
    }

    /// Approximates the curve offset by `offset` along its normal with a
    /// sequence of line segments.
    ///
    /// See `CubicBezierSegment::for_each_offset_flattened`.
    pub fn for_each_offset_flattened<F>(&self, offset: S, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        self.to_cubic().for_each_offset_flattened(offset, tolerance, callback);
    }

    /// Approximates the curve with sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    pub fn for_each_flattened<F: FnMut(&LineSegment<S>)>(&self, tolerance: S, callback: &mut F) {
        self.to_cubic().for_each_flattened(tolerance, callback);
    }

    /// Builds the polyline approximating the curve, offset by `options.offset`.
    pub fn flattened_path(&self, options: &FlattenOptions) -> Path<S> {
        self.to_cubic().flattened_path(options)
    }

    pub fn to_f32(&self) -> QuadraticBezierSegment<f32> {
        QuadraticBezierSegment {
            from: self.from.to_f32(),
            ctrl: self.ctrl.to_f32(),
            to: self.to.to_f32(),
        }
    }

    pub fn to_f64(&self) -> QuadraticBezierSegment<f64> {
        QuadraticBezierSegment {
            from: self.from.to_f64(),
            ctrl: self.ctrl.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

impl<S: Scalar> Segment for QuadraticBezierSegment<S> {
    impl_segment!(S);

    fn normal(&self, t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        self.normal(t, distance)
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn length_straight_line() {
    // Sanity check: aligned points so both these curves are straight lines
    // that go form (0.0, 0.0) to (2.0, 0.0).

    let len = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(1.0, 0.0),
        to: point(2.0, 0.0),
    }
    .length();
    assert_eq!(len, 2.0);

    let len = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(1.0, 0.0),
        to: point(2.0, 0.0),
    }
    .length();
    assert!((len - 2.0).abs() < 1e-6);
}

#[test]
fn length_closed_form() {
    let len = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(1.0, 1.0),
        to: point(2.0, 0.0),
    }
    .length();
    assert!((len - 2.2955871493690823).abs() < 1e-9);

    let len = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(100.0, 0.0),
        to: point(100.0, 100.0),
    }
    .length();
    assert!((len - 162.322524012).abs() < 1e-6);
}

#[test]
fn length_turning_back() {
    // Goes from 0 to 4/3 then back to 1.
    let len = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(2.0, 0.0),
        to: point(1.0, 0.0),
    }
    .length();
    assert!((len - 5.0 / 3.0).abs() < 1e-9);

    let len = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(5.0, 0.0),
        to: point(0.0, 0.0),
    }
    .length();
    assert!((len - 5.0).abs() < 1e-9);
}

#[test]
fn derivative() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(3.0, 0.0),
    };

    assert_eq!(curve.derivative(0.0), (curve.ctrl - curve.from) * 2.0);
    assert_eq!(curve.derivative(1.0), (curve.to - curve.ctrl) * 2.0);

    let h = 1e-6;
    let expected = (curve.sample(0.3 + h) - curve.sample(0.3 - h)) / (2.0 * h);
    assert!((curve.derivative(0.3) - expected).length() < 1e-6);
}

#[test]
fn to_cubic_is_the_same_curve() {
    let quadratic = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(3.0, 6.0),
        to: point(6.0, 0.0),
    };
    let cubic = quadratic.to_cubic();
    assert_eq!(cubic.ctrl1, point(2.0, 4.0));
    assert_eq!(cubic.ctrl2, point(4.0, 4.0));

    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((quadratic.sample(t) - cubic.sample(t)).length() < 1e-12);
    }

    assert_eq!(quadratic.normal(0.0, 1.0), cubic.normal(0.0, 1.0));
    assert_eq!(quadratic.normal(0.5, 1.0), Err(GeometryError::NormalAtInteriorParameter));
}

#[test]
fn split() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(3.0, 6.0),
        to: point(6.0, 0.0),
    };
    let (a, b) = curve.split(0.25);
    assert_eq!(a.from, curve.from);
    assert_eq!(a.to, b.from);
    assert_eq!(b.to, curve.to);
    assert!((a.sample(0.5) - curve.sample(0.125)).length() < 1e-12);
    assert!((b.sample(0.5) - curve.sample(0.625)).length() < 1e-12);

    let range = curve.split_range(0.25..0.5);
    assert!((range.from - curve.sample(0.25)).length() < 1e-12);
    assert!((range.to - curve.sample(0.5)).length() < 1e-12);
    assert_eq!(curve.flip().flip(), curve);
}

#[test]
fn curvature_radius() {
    // y = x² near the apex has a radius of curvature of 1/2.
    let curve = QuadraticBezierSegment {
        from: point(-1.0f64, 1.0),
        ctrl: point(0.0, -1.0),
        to: point(1.0, 1.0),
    };
    assert!((curve.curvature_radius(0.5) - 0.5).abs() < 1e-9);

    let straight = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(1.0, 0.0),
        to: point(2.0, 0.0),
    };
    assert!(straight.curvature_radius(0.5).is_nan());
}

#[test]
fn flattening() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(100.0, 0.0),
        to: point(100.0, 100.0),
    };

    let mut length = 0.0;
    let mut last = curve.from;
    curve.for_each_flattened(0.01, &mut |segment| {
        assert_eq!(segment.from, last);
        length += segment.length();
        last = segment.to;
    });
    assert_eq!(last, curve.to);
    assert!(length <= curve.length());
    assert!((length - curve.length()).abs() < 0.1);
}
