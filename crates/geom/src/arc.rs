//! Elliptic arc related maths and tools.
//!
//! Arcs come in two flavors: [`Arc`] is described by its center, radii and
//! angle range while [`SvgArc`] uses the SVG endpoint parametrization. See
//! <https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes>.

use crate::error::GeometryError;
use crate::options::FlattenOptions;
use crate::path::{Path, PathBuilder};
use crate::quadrature::gauss_legendre5;
use crate::scalar::{Float, Scalar};
use crate::segment::Segment;
use crate::utils::{angle_between, angle_norm, min_max, rotate_90_cw, with_length};
use crate::{point, vector, Angle, CubicBezierSegment, LineSegment, Point, Vector};

use core::ops::Range;

/// An elliptic arc curve segment using the SVG's end-point notation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc<S> {
    pub from: Point<S>,
    pub to: Point<S>,
    pub radii: Vector<S>,
    pub x_rotation: Angle<S>,
    pub flags: ArcFlags,
}

/// An elliptic arc curve segment.
///
/// Angles are measured on the ellipse before it is rotated by `x_rotation`.
/// A positive `sweep_angle` runs counter-clockwise in a y-up coordinate
/// system.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc<S> {
    pub center: Point<S>,
    pub radii: Vector<S>,
    pub start_angle: Angle<S>,
    pub sweep_angle: Angle<S>,
    pub x_rotation: Angle<S>,
}

/// Flag parameters for arcs as described by the SVG specification.
///
/// For most situations using the SVG arc notation, there are four different arcs
/// (two different ellipses, each with two different arc sweeps) that satisfy the
/// arc parameters. The `large_arc` and `sweep` flags indicate which one of the
/// four arcs are drawn.
///
/// See more examples in the [SVG specification](https://svgwg.org/specs/paths/)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    /// Of the four candidate arc sweeps, two will represent an arc sweep of greater
    /// than or equal to 180 degrees (the "large-arc"), and two will represent an arc
    /// sweep of less than or equal to 180 degrees (the "small arc"). If `large_arc`
    /// is `true`, then one of the two larger arc sweeps will be chosen; otherwise, if
    /// `large_arc` is `false`, one of the smaller arc sweeps will be chosen.
    pub large_arc: bool,
    /// If `sweep` is `true`, then the arc will be drawn in a "positive-angle" direction
    /// (the angle increases as the arc is drawn).
    pub sweep: bool,
}

impl<S: Scalar> Arc<S> {
    /// Converts an arc from the SVG end-point notation.
    #[inline]
    pub fn from_svg_arc(arc: &SvgArc<S>) -> Arc<S> {
        arc.to_arc()
    }

    /// Converts this arc into the SVG end-point notation.
    pub fn to_svg_arc(&self) -> SvgArc<S> {
        let sweep = self.sweep_angle.radians;
        SvgArc {
            from: self.from(),
            to: self.to(),
            radii: self.radii,
            x_rotation: self.x_rotation,
            flags: ArcFlags {
                large_arc: sweep.abs() > S::PI(),
                sweep: sweep > S::ZERO,
            },
        }
    }

    /// Sample the curve's angle at t (expecting t between 0 and 1).
    #[inline]
    pub fn get_angle(&self, t: S) -> Angle<S> {
        self.start_angle + Angle::radians(self.sweep_angle.radians * t)
    }

    #[inline]
    pub fn end_angle(&self) -> Angle<S> {
        self.start_angle + self.sweep_angle
    }

    /// Point of the ellipse at a given angle.
    pub fn sample_at_angle(&self, angle: Angle<S>) -> Point<S> {
        let (sin_theta, cos_theta) = Float::sin_cos(angle.radians);
        let (sin_phi, cos_phi) = Float::sin_cos(self.x_rotation.radians);
        let (rx, ry) = (self.radii.x, self.radii.y);

        point(
            self.center.x + rx * cos_theta * cos_phi - ry * sin_theta * sin_phi,
            self.center.y + rx * cos_theta * sin_phi + ry * sin_theta * cos_phi,
        )
    }

    /// Derivative of the ellipse with respect to the angle, oriented in the
    /// direction the arc is drawn.
    pub fn derivative_at_angle(&self, angle: Angle<S>) -> Vector<S> {
        let d = self.angular_derivative(angle);
        if self.sweep_angle.radians < S::ZERO {
            -d
        } else {
            d
        }
    }

    /// Second derivative of the ellipse with respect to the angle.
    pub fn second_derivative_at_angle(&self, angle: Angle<S>) -> Vector<S> {
        let (sin_theta, cos_theta) = Float::sin_cos(angle.radians);
        let (sin_phi, cos_phi) = Float::sin_cos(self.x_rotation.radians);
        let (rx, ry) = (self.radii.x, self.radii.y);

        vector(
            -rx * cos_theta * cos_phi + ry * sin_theta * sin_phi,
            -rx * cos_theta * sin_phi - ry * sin_theta * cos_phi,
        )
    }

    /// Signed radius of curvature at a given angle, NaN if the ellipse is
    /// flattened into a line.
    pub fn curvature_radius_at_angle(&self, angle: Angle<S>) -> S {
        let dp = self.derivative_at_angle(angle);
        let ddp = self.second_derivative_at_angle(angle);
        let a = dp.cross(ddp);
        if a.abs() < S::EPSILON {
            return S::nan();
        }

        let speed = dp.length();
        speed * speed * speed / a
    }

    /// Normal on the right side of the arc at a given angle, scaled to
    /// `distance`.
    #[inline]
    pub fn normal_at_angle(&self, angle: Angle<S>, distance: S) -> Vector<S> {
        with_length(rotate_90_cw(self.derivative_at_angle(angle)), distance)
    }

    fn angular_derivative(&self, angle: Angle<S>) -> Vector<S> {
        let (sin_theta, cos_theta) = Float::sin_cos(angle.radians);
        let (sin_phi, cos_phi) = Float::sin_cos(self.x_rotation.radians);
        let (rx, ry) = (self.radii.x, self.radii.y);

        vector(
            -rx * sin_theta * cos_phi - ry * cos_theta * sin_phi,
            -rx * sin_theta * sin_phi + ry * cos_theta * cos_phi,
        )
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.sample_at_angle(self.get_angle(t))
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    #[inline]
    pub fn derivative(&self, t: S) -> Vector<S> {
        self.angular_derivative(self.get_angle(t)) * self.sweep_angle.radians
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.sample(S::ZERO)
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.sample(S::ONE)
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        let angle_1 = Angle::radians(self.sweep_angle.radians * t_range.start);
        let angle_2 = Angle::radians(self.sweep_angle.radians * t_range.end);

        Arc {
            start_angle: self.start_angle + angle_1,
            sweep_angle: angle_2 - angle_1,
            ..*self
        }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (Arc<S>, Arc<S>) {
        (self.before_split(t), self.after_split(t))
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> Arc<S> {
        Arc {
            sweep_angle: Angle::radians(self.sweep_angle.radians * t),
            ..*self
        }
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> Arc<S> {
        let split_angle = Angle::radians(self.sweep_angle.radians * t);
        Arc {
            start_angle: self.start_angle + split_angle,
            sweep_angle: self.sweep_angle - split_angle,
            ..*self
        }
    }

    /// Swap the direction of the segment.
    pub fn flip(&self) -> Self {
        let mut arc = *self;
        arc.start_angle = arc.start_angle + self.sweep_angle;
        arc.sweep_angle = -self.sweep_angle;

        arc
    }

    /// Approximates the length of the arc with a 5 points Gauss-Legendre
    /// quadrature. The error is around 1% or less.
    pub fn length(&self) -> S {
        let (rx, ry) = (self.radii.x, self.radii.y);
        let (a, b) = min_max(self.start_angle.radians, self.end_angle().radians);
        // The rotation does not change the speed.
        let speed = |theta: S| {
            let (sin_theta, cos_theta) = Float::sin_cos(theta);
            vector(-rx * sin_theta, ry * cos_theta).length()
        };

        gauss_legendre5(&speed, a, b)
    }

    /// Signed radius of curvature at t, see `curvature_radius_at_angle`.
    #[inline]
    pub fn curvature_radius(&self, t: S) -> S {
        self.curvature_radius_at_angle(self.get_angle(t))
    }

    /// Normal on the right side of the arc at t, scaled to `distance`.
    #[inline]
    pub fn normal(&self, t: S, distance: S) -> Vector<S> {
        self.normal_at_angle(self.get_angle(t), distance)
    }

    /// Approximates the arc with a sequence of cubic bézier curves.
    ///
    /// The arc is cut into the smallest number of pieces of equal sweep that
    /// do not exceed a quarter turn. An arc with a zero sweep produces no
    /// curve.
    pub fn for_each_cubic_bezier<F>(&self, callback: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        self.cubic_pieces(self.from(), self.to(), &mut |curve, _| callback(curve));
    }

    /// Cubic approximation between the given end points, along with the range
    /// of t each piece covers.
    fn cubic_pieces<F>(&self, from: Point<S>, to: Point<S>, callback: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>, Range<S>),
    {
        let sweep = self.sweep_angle.radians;
        if sweep == S::ZERO || !sweep.is_finite() {
            return;
        }

        let count = (sweep.abs() / S::FRAC_PI_2()).ceil();
        let n = count.to_usize().unwrap_or(1).max(1);
        let n_s = S::value(n as f64);

        // Maisonobe, "Drawing an elliptical arc using polylines, quadratic or
        // cubic Bézier curves" (2003).
        let step = sweep.abs() / n_s;
        let tan_half = Float::tan(step * S::HALF);
        let kappa = Float::sin(step) * ((S::FOUR + S::THREE * tan_half * tan_half).sqrt() - S::ONE) / S::THREE;

        let mut start = from;
        let mut start_derivative = self.derivative_at_angle(self.start_angle);
        let mut t_start = S::ZERO;
        for i in 1..=n {
            let t_end = S::value(i as f64) / n_s;
            let angle = self.get_angle(t_end);
            let end = if i == n { to } else { self.sample_at_angle(angle) };
            let end_derivative = self.derivative_at_angle(angle);

            let curve = CubicBezierSegment {
                from: start,
                ctrl1: start + start_derivative * kappa,
                ctrl2: end - end_derivative * kappa,
                to: end,
            };
            callback(&curve, t_start..t_end);

            start = end;
            start_derivative = end_derivative;
            t_start = t_end;
        }
    }

    /// Approximates the arc offset by `offset` along its normal with a
    /// sequence of line segments, within `tolerance`.
    ///
    /// The arc is first converted into cubic bézier curves which are then
    /// flattened.
    pub fn for_each_offset_flattened<F>(&self, offset: S, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        self.cubic_pieces(self.from(), self.to(), &mut |curve, range| {
            flatten_piece(curve, range, offset, tolerance, callback);
        });
    }

    /// Approximates the arc with a sequence of line segments.
    pub fn for_each_flattened<F: FnMut(&LineSegment<S>)>(&self, tolerance: S, callback: &mut F) {
        self.for_each_offset_flattened(S::ZERO, tolerance, &mut |segment, _| callback(segment));
    }

    #[inline]
    pub fn to_f32(&self) -> Arc<f32> {
        Arc {
            center: self.center.to_f32(),
            radii: self.radii.to_f32(),
            start_angle: Angle::radians(self.start_angle.radians.to_f32().unwrap_or(f32::NAN)),
            sweep_angle: Angle::radians(self.sweep_angle.radians.to_f32().unwrap_or(f32::NAN)),
            x_rotation: Angle::radians(self.x_rotation.radians.to_f32().unwrap_or(f32::NAN)),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> Arc<f64> {
        Arc {
            center: self.center.to_f64(),
            radii: self.radii.to_f64(),
            start_angle: Angle::radians(self.start_angle.radians.to_f64().unwrap_or(f64::NAN)),
            sweep_angle: Angle::radians(self.sweep_angle.radians.to_f64().unwrap_or(f64::NAN)),
            x_rotation: Angle::radians(self.x_rotation.radians.to_f64().unwrap_or(f64::NAN)),
        }
    }
}

/// Flattens a cubic piece of an arc, reporting ranges of the whole arc.
fn flatten_piece<S, F>(curve: &CubicBezierSegment<S>, piece: Range<S>, offset: S, tolerance: S, callback: &mut F)
where
    S: Scalar,
    F: FnMut(&LineSegment<S>, Range<S>),
{
    let remap = |t: S| {
        if t >= S::ONE {
            piece.end
        } else {
            piece.start + (piece.end - piece.start) * t
        }
    };

    curve.for_each_offset_flattened(offset, tolerance, &mut |segment, range| {
        callback(segment, remap(range.start)..remap(range.end));
    });
}

impl<S: Scalar> Segment for Arc<S> {
    impl_segment!(S);

    fn normal(&self, t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        Ok(self.normal(t, distance))
    }
}

impl<S: Scalar> SvgArc<S> {
    /// Converts to the center parametrization.
    ///
    /// Radii are made positive and scaled up uniformly when they are too small
    /// for the ellipse to reach both end points. Identical end points produce
    /// an arc with a zero sweep.
    ///
    /// The result is meaningless for arcs with a zero radius, see
    /// `is_straight_line`.
    ///
    /// Known limitation: for rotated ellipses the angles are those of the
    /// unrotated ellipse and are only accurate up to floating point rounding
    /// of the end point transformation.
    pub fn to_arc(&self) -> Arc<S> {
        let mut rx = self.radii.x.abs();
        let mut ry = self.radii.y.abs();

        if self.from == self.to {
            return Arc {
                center: self.from,
                radii: vector(rx, ry),
                start_angle: Angle::zero(),
                sweep_angle: Angle::zero(),
                x_rotation: self.x_rotation,
            };
        }

        let (x1, y1) = (self.from.x, self.from.y);
        let (x2, y2) = (self.to.x, self.to.y);
        let (sin_phi, cos_phi) = Float::sin_cos(self.x_rotation.radians);

        // End point half distance, in the frame of the ellipse.
        let hx = (x1 - x2) * S::HALF;
        let hy = (y1 - y2) * S::HALF;
        let x1p = cos_phi * hx + sin_phi * hy;
        let y1p = -sin_phi * hx + cos_phi * hy;

        let lambda = x1p * x1p / (rx * rx) + y1p * y1p / (ry * ry);
        if lambda > S::ONE {
            let scale = lambda.sqrt();
            log::debug!("arc radii ({:?}, {:?}) scaled by {:?} to reach the end point", rx, ry, scale);
            rx = rx * scale;
            ry = ry * scale;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let denominator = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let sq = ((rx2 * ry2 - denominator) / denominator).max(S::ZERO);
        let mut coef = sq.sqrt();
        if self.flags.large_arc == self.flags.sweep {
            coef = -coef;
        }

        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let center = point(
            cos_phi * cxp - sin_phi * cyp + (x1 + x2) * S::HALF,
            sin_phi * cxp + cos_phi * cyp + (y1 + y2) * S::HALF,
        );

        let u = vector((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = vector(-(x1p + cxp) / rx, -(y1p + cyp) / ry);

        let u_length = u.length();
        let mut theta = (u.x / u_length).max(-S::ONE).min(S::ONE).acos();
        if u.y < S::ZERO {
            theta = -theta;
        }
        let theta = angle_norm(theta);

        let cos_delta = u.dot(v) / (u_length * v.length());
        let mut delta = cos_delta.max(-S::ONE).min(S::ONE).acos();
        if u.cross(v) < S::ZERO {
            delta = -delta;
        }
        let two_pi = S::TWO * S::PI();
        if !self.flags.sweep && delta > S::ZERO {
            delta -= two_pi;
        } else if self.flags.sweep && delta < S::ZERO {
            delta += two_pi;
        }

        Arc {
            center,
            radii: vector(rx, ry),
            start_angle: Angle::radians(theta),
            sweep_angle: Angle::radians(delta),
            x_rotation: self.x_rotation,
        }
    }

    /// An arc with a zero radius is drawn as a straight line between its end
    /// points.
    #[inline]
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= S::EPSILON || self.radii.y.abs() <= S::EPSILON
    }

    /// Splits the arc at a given angle of its ellipse.
    ///
    /// Returns `None` unless the angle lies strictly inside the arc's angle
    /// range. Both halves keep the radii (possibly scaled up) and the sweep
    /// flag of the arc.
    pub fn split_at_angle(&self, angle: Angle<S>) -> Option<(SvgArc<S>, SvgArc<S>)> {
        if self.is_straight_line() {
            return None;
        }

        let arc = self.to_arc();
        let theta1 = arc.start_angle.radians;
        let theta2 = arc.end_angle().radians;
        if !angle_between(angle.radians, theta1, theta2) {
            return None;
        }

        // Bring the angle into the arc's range.
        let (lower, _) = min_max(theta1, theta2);
        let theta = lower + angle_norm(angle.radians - lower);
        let mid = arc.sample_at_angle(Angle::radians(theta));

        let mut large_arc_0 = false;
        let mut large_arc_1 = false;
        if (theta - theta1).abs() > S::PI() {
            large_arc_0 = true;
        } else if (theta - theta2).abs() > S::PI() {
            large_arc_1 = true;
        }

        Some((
            SvgArc {
                from: self.from,
                to: mid,
                radii: arc.radii,
                x_rotation: self.x_rotation,
                flags: ArcFlags {
                    large_arc: large_arc_0,
                    sweep: self.flags.sweep,
                },
            },
            SvgArc {
                from: mid,
                to: self.to,
                radii: arc.radii,
                x_rotation: self.x_rotation,
                flags: ArcFlags {
                    large_arc: large_arc_1,
                    sweep: self.flags.sweep,
                },
            },
        ))
    }

    /// Approximates the arc with a sequence of cubic bézier curves.
    ///
    /// The first curve starts at `from` and the last one ends at `to` exactly.
    /// Straight lines produce a single curve with its control points on the
    /// end points.
    pub fn for_each_cubic_bezier<F>(&self, callback: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        if self.from == self.to {
            return;
        }

        if self.is_straight_line() {
            callback(&CubicBezierSegment {
                from: self.from,
                ctrl1: self.from,
                ctrl2: self.to,
                to: self.to,
            });
            return;
        }

        self.to_arc()
            .cubic_pieces(self.from, self.to, &mut |curve, _| callback(curve));
    }

    /// Builds a path made of a move to the start of the arc followed by its
    /// cubic bézier approximation.
    pub fn to_cubic_path(&self) -> Path<S> {
        let mut path = Path::new();
        path.move_to(self.from);
        self.for_each_cubic_bezier(&mut |curve| {
            path.cubic_bezier_to(curve.ctrl1, curve.ctrl2, curve.to);
        });

        path
    }

    /// Builds the polyline approximating the arc, offset by `options.offset`.
    pub fn flattened_path(&self, options: &FlattenOptions) -> Path<S> {
        let offset = S::value(options.offset);
        let tolerance = S::value(options.tolerance);

        let mut path = Path::new();
        let mut started = false;
        self.for_each_cubic_bezier(&mut |curve| {
            if !started {
                path.move_to(curve.from + curve.start_normal(offset));
                started = true;
            }
            curve.for_each_offset_flattened(offset, tolerance, &mut |segment, _| {
                path.line_to(segment.to);
            });
        });

        if !started {
            path.move_to(self.from);
        }

        path
    }
}

#[cfg(test)]
fn assert_approx_eq(a: f64, b: f64, epsilon: f64) {
    if (a - b).abs() > epsilon {
        std::panic!("{} != {} (epsilon {})", a, b, epsilon);
    }
}

#[cfg(test)]
fn assert_point_approx_eq(a: Point<f64>, b: Point<f64>, epsilon: f64) {
    if (a - b).length() > epsilon {
        std::panic!("{:?} != {:?} (epsilon {})", a, b, epsilon);
    }
}

#[cfg(test)]
fn unit_quarter_circle() -> SvgArc<f64> {
    SvgArc {
        from: point(1.0, 0.0),
        to: point(0.0, 1.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    }
}

#[test]
fn svg_arc_to_center() {
    use core::f64::consts::{FRAC_PI_2, PI};

    let arc = unit_quarter_circle().to_arc();
    assert_point_approx_eq(arc.center, point(0.0, 0.0), 1e-12);
    assert_approx_eq(arc.start_angle.radians, 0.0, 1e-12);
    assert_approx_eq(arc.sweep_angle.radians, FRAC_PI_2, 1e-12);

    let clockwise = SvgArc {
        flags: ArcFlags {
            large_arc: false,
            sweep: false,
        },
        ..unit_quarter_circle()
    }
    .to_arc();
    assert_point_approx_eq(clockwise.center, point(1.0, 1.0), 1e-12);
    assert_approx_eq(clockwise.start_angle.radians, 1.5 * PI, 1e-12);
    assert_approx_eq(clockwise.sweep_angle.radians, -FRAC_PI_2, 1e-12);
}

#[test]
fn svg_arc_flags_round_trip() {
    use core::f64::consts::PI;

    for &large_arc in &[false, true] {
        for &sweep in &[false, true] {
            let svg_arc = SvgArc {
                from: point(1.0, 2.0),
                to: point(-1.0, 0.5),
                radii: vector(3.0, 2.0),
                x_rotation: Angle::radians(0.3),
                flags: ArcFlags { large_arc, sweep },
            };

            let arc = svg_arc.to_arc();
            assert_point_approx_eq(arc.from(), svg_arc.from, 1e-9);
            assert_point_approx_eq(arc.to(), svg_arc.to, 1e-9);
            assert_eq!(arc.sweep_angle.radians > 0.0, sweep);
            assert_eq!(arc.sweep_angle.radians.abs() > PI, large_arc);
            assert!(arc.start_angle.radians >= 0.0 && arc.start_angle.radians < 2.0 * PI);

            let back = arc.to_svg_arc();
            assert_eq!(back.flags, svg_arc.flags);
            assert_point_approx_eq(back.from, svg_arc.from, 1e-9);
            assert_point_approx_eq(back.to, svg_arc.to, 1e-9);
        }
    }
}

#[test]
fn svg_arc_radii_scaled_up() {
    use core::f64::consts::PI;

    let svg_arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
        radii: vector(-1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let arc = svg_arc.to_arc();
    assert_approx_eq(arc.radii.x, 5.0, 1e-9);
    assert_approx_eq(arc.radii.y, 5.0, 1e-9);
    assert_point_approx_eq(arc.center, point(5.0, 0.0), 1e-9);
    assert_approx_eq(arc.sweep_angle.radians.abs(), PI, 1e-6);

    // Scaling is idempotent.
    let again = SvgArc {
        radii: arc.radii,
        ..svg_arc
    }
    .to_arc();
    assert_approx_eq(again.radii.x, arc.radii.x, 1e-9);
    assert_approx_eq(again.radii.y, arc.radii.y, 1e-9);
}

#[test]
fn svg_arc_identical_end_points() {
    let svg_arc = SvgArc {
        to: point(1.0, 0.0),
        ..unit_quarter_circle()
    };

    let arc = svg_arc.to_arc();
    assert_eq!(arc.center, point(1.0, 0.0));
    assert_eq!(arc.sweep_angle.radians, 0.0);

    let mut count = 0;
    svg_arc.for_each_cubic_bezier(&mut |_| count += 1);
    assert_eq!(count, 0);
    arc.for_each_cubic_bezier(&mut |_| count += 1);
    assert_eq!(count, 0);

    let path = svg_arc.flattened_path(&FlattenOptions::DEFAULT);
    assert_eq!(path.points(), std::vec![point(1.0, 0.0)]);
}

#[test]
fn angle_queries() {
    use core::f64::consts::FRAC_PI_2;

    let arc = unit_quarter_circle().to_arc();
    let zero = Angle::radians(0.0);

    assert_point_approx_eq(arc.sample_at_angle(zero), point(1.0, 0.0), 1e-12);
    assert_point_approx_eq(arc.derivative_at_angle(zero).to_point(), point(0.0, 1.0), 1e-12);
    assert_point_approx_eq(arc.second_derivative_at_angle(zero).to_point(), point(-1.0, 0.0), 1e-12);
    assert_approx_eq(arc.curvature_radius_at_angle(zero), 1.0, 1e-12);
    // The right side of a counter-clockwise arc is the outside.
    assert_point_approx_eq(arc.normal_at_angle(zero, 2.0).to_point(), point(2.0, 0.0), 1e-12);

    let flipped = arc.flip();
    let end = Angle::radians(FRAC_PI_2);
    assert_point_approx_eq(flipped.from(), point(0.0, 1.0), 1e-12);
    assert_point_approx_eq(flipped.derivative_at_angle(end).to_point(), point(1.0, 0.0), 1e-12);
    assert_approx_eq(flipped.curvature_radius_at_angle(end), -1.0, 1e-12);
    assert_point_approx_eq(flipped.normal_at_angle(end, 1.0).to_point(), point(0.0, -1.0), 1e-12);

    // A flat ellipse has no curvature along its long axis.
    let flat = Arc {
        radii: vector(1.0, 0.0),
        ..arc
    };
    assert!(flat.curvature_radius_at_angle(Angle::radians(FRAC_PI_2)).is_nan());
}

#[test]
fn rotated_ellipse_samples() {
    use core::f64::consts::FRAC_PI_2;

    let arc = Arc {
        center: point(1.0, 1.0),
        radii: vector(2.0, 1.0),
        start_angle: Angle::zero(),
        sweep_angle: Angle::radians(FRAC_PI_2),
        x_rotation: Angle::radians(FRAC_PI_2),
    };

    assert_point_approx_eq(arc.from(), point(1.0, 3.0), 1e-12);
    assert_point_approx_eq(arc.to(), point(0.0, 1.0), 1e-12);
    assert_approx_eq(arc.curvature_radius(0.0), 0.5, 1e-12);
    assert_approx_eq(arc.curvature_radius(1.0), 4.0, 1e-12);
}

#[test]
fn parametric_derivative() {
    let arc = Arc {
        center: point(3.0, -2.0),
        radii: vector(5.0, 2.0),
        start_angle: Angle::radians(0.5),
        sweep_angle: Angle::radians(-2.0),
        x_rotation: Angle::radians(0.7),
    };

    let h = 1e-6;
    for &t in &[0.1, 0.5, 0.9] {
        let expected = (arc.sample(t + h) - arc.sample(t - h)) / (2.0 * h);
        assert_point_approx_eq(arc.derivative(t).to_point(), expected.to_point(), 1e-5);
        // The parametric derivative follows the direction of the arc.
        assert!(arc.derivative(t).dot(arc.derivative_at_angle(arc.get_angle(t))) > 0.0);
    }
}

#[test]
fn split_arc() {
    let arc = Arc {
        center: point(0.0, 0.0),
        radii: vector(2.0, 1.0),
        start_angle: Angle::radians(0.3),
        sweep_angle: Angle::radians(2.0),
        x_rotation: Angle::radians(0.1),
    };

    let (a, b) = arc.split(0.25);
    assert_point_approx_eq(a.from(), arc.from(), 1e-12);
    assert_point_approx_eq(a.to(), arc.sample(0.25), 1e-12);
    assert_point_approx_eq(b.from(), arc.sample(0.25), 1e-12);
    assert_point_approx_eq(b.to(), arc.to(), 1e-12);

    let middle = arc.split_range(0.25..0.75);
    assert_point_approx_eq(middle.from(), arc.sample(0.25), 1e-12);
    assert_point_approx_eq(middle.to(), arc.sample(0.75), 1e-12);

    let flipped = arc.flip();
    assert_point_approx_eq(flipped.sample(0.3), arc.sample(0.7), 1e-12);
}

#[test]
fn arc_length() {
    use core::f64::consts::{FRAC_PI_2, PI};

    let quarter = Arc {
        center: point(0.0, 0.0),
        radii: vector(100.0, 100.0),
        start_angle: Angle::zero(),
        sweep_angle: Angle::radians(FRAC_PI_2),
        x_rotation: Angle::zero(),
    };
    assert_approx_eq(quarter.length(), 50.0 * PI, 0.1);
    assert_approx_eq(quarter.flip().length(), quarter.length(), 1e-9);

    // Rotating the ellipse does not change the length.
    let rotated = Arc {
        radii: vector(100.0, 40.0),
        x_rotation: Angle::radians(1.0),
        sweep_angle: Angle::radians(0.5),
        ..quarter
    };
    let unrotated = Arc {
        x_rotation: Angle::zero(),
        ..rotated
    };
    assert_approx_eq(rotated.length(), unrotated.length(), 1e-9);

    let mut polyline = 0.0;
    rotated.for_each_flattened(0.001, &mut |segment| polyline += segment.length());
    assert_approx_eq(rotated.length(), polyline, rotated.length() * 0.01);
}

#[test]
fn quarter_circle_cubic() {
    let mut curves = std::vec::Vec::new();
    unit_quarter_circle().for_each_cubic_bezier(&mut |curve| curves.push(*curve));

    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].from, point(1.0, 0.0));
    assert_eq!(curves[0].to, point(0.0, 1.0));
    for i in 0..=100 {
        let p = curves[0].sample(i as f64 / 100.0);
        assert_approx_eq(p.to_vector().length(), 1.0, 0.002);
    }
}

#[test]
fn cubic_piece_count() {
    use core::f64::consts::PI;

    for &(sweep, expected) in &[(0.5, 1), (PI, 2), (1.4 * PI, 3), (1.6 * PI, 4), (-1.6 * PI, 4)] {
        let arc = Arc {
            center: point(0.0, 0.0),
            radii: vector(1.0, 2.0),
            start_angle: Angle::radians(0.2),
            sweep_angle: Angle::radians(sweep),
            x_rotation: Angle::zero(),
        };

        let mut curves = std::vec::Vec::new();
        arc.for_each_cubic_bezier(&mut |curve| curves.push(*curve));
        assert_eq!(curves.len(), expected);
        assert_point_approx_eq(curves[0].from, arc.from(), 1e-12);
        assert_point_approx_eq(curves[expected - 1].to, arc.to(), 1e-12);
        for pair in curves.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }
}

#[test]
fn svg_arc_cubic_path() {
    use crate::path::PathEvent;

    let svg_arc = SvgArc {
        from: point(10.0, 10.0),
        to: point(50.0, 30.0),
        radii: vector(30.0, 20.0),
        x_rotation: Angle::radians(0.5),
        flags: ArcFlags {
            large_arc: true,
            sweep: false,
        },
    };

    let path = svg_arc.to_cubic_path();
    assert_eq!(path.events()[0], PathEvent::MoveTo(svg_arc.from));
    assert!(path.len() >= 3);
    assert_eq!(path.last_point(), Some(svg_arc.to));
}

#[test]
fn flattened_arc_ends_at_the_end_point() {
    let svg_arc = SvgArc {
        from: point(10.0, 10.0),
        to: point(50.0, 30.0),
        radii: vector(30.0, 20.0),
        x_rotation: Angle::radians(0.5),
        flags: ArcFlags {
            large_arc: true,
            sweep: true,
        },
    };

    for &tolerance in &[1.0, 0.1, 0.01] {
        let path = svg_arc.flattened_path(&FlattenOptions::tolerance(tolerance));
        let points = path.points();
        assert!(points.len() > 2);
        assert_eq!(points[0], svg_arc.from);
        assert_eq!(path.last_point(), Some(svg_arc.to));
    }
}

#[test]
fn offset_flattened_arc() {
    let svg_arc = SvgArc {
        from: point(100.0, 0.0),
        to: point(0.0, 100.0),
        radii: vector(100.0, 100.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let outside = svg_arc.flattened_path(&FlattenOptions::tolerance(0.1).with_offset(10.0));
    let points = outside.points();
    assert_point_approx_eq(points[0], point(110.0, 0.0), 1e-9);
    assert_point_approx_eq(points[points.len() - 1], point(0.0, 110.0), 1e-9);
    for p in &points {
        assert_approx_eq(p.to_vector().length(), 110.0, 0.5);
    }

    let inside = svg_arc.flattened_path(&FlattenOptions::tolerance(0.1).with_offset(-10.0));
    for p in &inside.points() {
        assert_approx_eq(p.to_vector().length(), 90.0, 0.5);
    }
}

#[test]
fn offset_flattened_ranges() {
    let arc = Arc {
        center: point(0.0, 0.0),
        radii: vector(50.0, 30.0),
        start_angle: Angle::radians(0.1),
        sweep_angle: Angle::radians(4.0),
        x_rotation: Angle::radians(0.2),
    };

    let mut previous_end = 0.0;
    let mut count = 0;
    arc.for_each_offset_flattened(5.0, 0.05, &mut |_, range| {
        assert_eq!(range.start, previous_end);
        assert!(range.end > range.start);
        previous_end = range.end;
        count += 1;
    });

    assert!(count > 4);
    assert_eq!(previous_end, 1.0);
}

#[test]
fn split_svg_arc() {
    use core::f64::consts::{FRAC_PI_2, PI};

    let upper_half = SvgArc {
        from: point(1.0, 0.0),
        to: point(-1.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let (a, b) = upper_half.split_at_angle(Angle::radians(FRAC_PI_2)).unwrap();
    assert_point_approx_eq(a.to, point(0.0, 1.0), 1e-9);
    assert_eq!(a.from, upper_half.from);
    assert_eq!(b.from, a.to);
    assert_eq!(b.to, upper_half.to);
    assert!(!a.flags.large_arc && !b.flags.large_arc);
    assert!(a.flags.sweep && b.flags.sweep);

    // Angles are compared modulo a full turn.
    assert!(upper_half.split_at_angle(Angle::radians(FRAC_PI_2 - 2.0 * PI)).is_some());

    // Outside of the arc or on its end points.
    assert!(upper_half.split_at_angle(Angle::radians(1.5 * PI)).is_none());
    assert!(upper_half.split_at_angle(Angle::radians(0.0)).is_none());
    assert!(upper_half.split_at_angle(Angle::radians(PI)).is_none());

    // Three quarters of a circle: the first half keeps the large arc.
    let large = SvgArc {
        from: point(1.0, 0.0),
        to: point(0.0, -1.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: true,
            sweep: true,
        },
    };
    let (a, b) = large.split_at_angle(Angle::radians(1.4 * PI)).unwrap();
    assert!(a.flags.large_arc);
    assert!(!b.flags.large_arc);
    let (a, b) = large.split_at_angle(Angle::radians(0.1 * PI)).unwrap();
    assert!(!a.flags.large_arc);
    assert!(b.flags.large_arc);
}

#[test]
fn zero_radius_is_a_line() {
    let svg_arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(10.0, 5.0),
        radii: vector(0.0, 5.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    };

    assert!(svg_arc.is_straight_line());
    assert!(svg_arc.split_at_angle(Angle::radians(1.0)).is_none());

    let mut curves = std::vec::Vec::new();
    svg_arc.for_each_cubic_bezier(&mut |curve| curves.push(*curve));
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].baseline(), LineSegment { from: svg_arc.from, to: svg_arc.to });

    let path = svg_arc.flattened_path(&FlattenOptions::DEFAULT);
    assert_eq!(path.points(), std::vec![svg_arc.from, svg_arc.to]);
}

#[test]
fn arc_segment_trait() {
    use crate::options::ArcLengthOptions;

    let arc = Arc {
        center: point(0.0, 0.0),
        radii: vector(10.0, 10.0),
        start_angle: Angle::zero(),
        sweep_angle: Angle::radians(3.0),
        x_rotation: Angle::zero(),
    };

    assert_eq!(Segment::normal(&arc, 0.5, 1.0), Ok(arc.normal(0.5, 1.0)));
    let parametrization = arc.arc_length_parametrization(&ArcLengthOptions::DEFAULT).unwrap();
    assert_approx_eq(parametrization.length(), 30.0, 0.01);
    assert_approx_eq(parametrization.t_at_length(15.0), 0.5, 0.01);
}
