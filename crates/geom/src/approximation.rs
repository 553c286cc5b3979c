//! Polynomial approximations of arc length functions.
//!
//! Measuring the length of a curve up to a parameter requires integrating its
//! speed, and finding the parameter at a given length additionally requires a
//! bisection search. When many such queries are made against the same curve
//! (dashing, placing glyphs or markers along a path), it is cheaper to sample
//! these functions a few times and evaluate a polynomial fit afterwards.
//!
//! Two fits are provided:
//!
//! - [`CubicApproximation`] fits a cubic through four samples, after
//!   M. Walter and A. Fournier, "Approximate Arc Length Parametrization" (1996).
//! - [`ChebyshevApproximation`] fits a cosine series through `N` samples taken
//!   at the Chebyshev nodes, which keeps the worst case error low.
//!
//! Both are immutable once built and can be shared between threads.

use crate::error::GeometryError;
use crate::options::ArcLengthOptions;
use crate::quadrature::{bisection, GaussLegendre};
use crate::scalar::Scalar;
use crate::utils::min_max;

use alloc::vec::Vec;

/// A cubic polynomial through the origin fitted to four samples of a function.
///
/// Evaluates `y(x) = r0 + (r1 - r0)·(a·u³ + b·u² + c·u)` where `u` is `x`
/// normalized to the `[0, 1]` interval of the approximation's domain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicApproximation<S> {
    a: S,
    b: S,
    c: S,
    domain: (S, S),
    range: (S, S),
}

impl<S: Scalar> CubicApproximation<S> {
    /// Fits `y(u) = a·u³ + b·u² + c·u` through `(0, 0)`, `(1/3, y1)`,
    /// `(2/3, y2)` and `(1, y3)`.
    fn fit(y1: S, y2: S, y3: S, domain: (S, S), range: (S, S)) -> Self {
        // [a; b; c] = 0.5 * [ 27, -27,  9;
        //                    -45,  36, -9;
        //                     18,  -9,  2] * [y1; y2; y3]
        let a = S::value(13.5) * y1 - S::value(13.5) * y2 + S::value(4.5) * y3;
        let b = S::value(-22.5) * y1 + S::value(18.0) * y2 - S::value(4.5) * y3;
        let c = S::NINE * y1 - S::value(4.5) * y2 + y3;

        CubicApproximation {
            a,
            b,
            c,
            domain,
            range,
        }
    }

    /// Approximates the integral of `speed` from `xmin` to `x`, for `x` in
    /// `[xmin, xmax]`.
    ///
    /// Returns the approximation and the absolute value of the integral over
    /// the whole interval (the total length when `speed` is the speed of a
    /// curve).
    pub fn arc_length<F>(rule: GaussLegendre, speed: &F, xmin: S, xmax: S) -> (Self, S)
    where
        F: Fn(S) -> S + ?Sized,
    {
        let range = xmax - xmin;
        let y1 = rule.integrate(speed, xmin, xmin + range / S::THREE);
        let y2 = rule.integrate(speed, xmin, xmin + range * S::TWO / S::THREE);
        let y3 = rule.integrate(speed, xmin, xmax);

        let approx = Self::fit(y1, y2, y3, (xmin, xmax), (S::ZERO, S::ONE));

        (approx, y3.abs())
    }

    /// Approximates the inverse of the integral of `speed`: maps a length in
    /// `[0, total]` back to the parameter in `[xmin, xmax]` where it is
    /// reached.
    ///
    /// The inverse is sampled with the bisection method at one and two thirds
    /// of the total length. Returns the approximation and the total length.
    pub fn inverse_arc_length<F>(rule: GaussLegendre, speed: &F, xmin: S, xmax: S) -> (Self, S)
    where
        F: Fn(S) -> S + ?Sized,
    {
        let length_at = |t: S| rule.integrate(speed, xmin, xmin + (xmax - xmin) * t).abs();

        let total = length_at(S::ONE);
        let t1 = bisection(&length_at, total / S::THREE, S::ZERO, S::ONE);
        let t2 = bisection(&length_at, total * S::TWO / S::THREE, S::ZERO, S::ONE);

        let approx = Self::fit(t1, t2, S::ONE, (S::ZERO, total), (xmin, xmax));

        (approx, total)
    }

    /// Evaluates the approximation.
    pub fn eval(&self, x: S) -> S {
        let width = self.domain.1 - self.domain.0;
        let u = if width == S::ZERO {
            S::ZERO
        } else {
            (x - self.domain.0) / width
        };

        let y = ((self.a * u + self.b) * u + self.c) * u;

        self.range.0 + (self.range.1 - self.range.0) * y
    }

    /// The interval of inputs the approximation was fitted on.
    #[inline]
    pub fn domain(&self) -> (S, S) {
        self.domain
    }
}

/// A Chebyshev series approximation of a function over an interval.
///
/// The function is sampled at the `N` Chebyshev nodes of the interval and
/// reconstructed from `N` cosine coefficients. Arguments outside of the
/// interval are clamped to it, and results are clamped to the optional output
/// bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ChebyshevApproximation<S> {
    coefficients: Vec<S>,
    domain: (S, S),
    bounds: Option<(S, S)>,
}

impl<S: Scalar> ChebyshevApproximation<S> {
    /// Approximates `f` over `[xmin, xmax]` using `n` nodes.
    ///
    /// When neither `ymin` nor `ymax` is NaN, evaluations are clamped to the
    /// range they delimit, in either order.
    ///
    /// Returns `GeometryError::InvalidSampleCount` if `n` is zero.
    pub fn new<F>(n: usize, f: &F, xmin: S, xmax: S, ymin: S, ymax: S) -> Result<Self, GeometryError>
    where
        F: Fn(S) -> S + ?Sized,
    {
        if n == 0 {
            return Err(GeometryError::InvalidSampleCount);
        }

        let count = S::from(n).ok_or(GeometryError::InvalidSampleCount)?;
        let node_angle = |k: usize| -> S {
            let k = S::from(k).unwrap_or(S::ZERO);
            S::PI() * (k + S::HALF) / count
        };

        let mut samples = Vec::with_capacity(n);
        for k in 0..n {
            let u = node_angle(k).cos();
            samples.push(f(xmin + (xmax - xmin) * (u + S::ONE) / S::TWO));
        }

        let mut coefficients = Vec::with_capacity(n);
        for j in 0..n {
            let order = S::from(j).unwrap_or(S::ZERO);
            let mut sum = S::ZERO;
            for (k, sample) in samples.iter().enumerate() {
                sum += *sample * (order * node_angle(k)).cos();
            }
            coefficients.push(S::TWO / count * sum);
        }

        let bounds = if ymin.is_nan() || ymax.is_nan() {
            None
        } else {
            Some(min_max(ymin, ymax))
        };

        Ok(ChebyshevApproximation {
            coefficients,
            domain: (xmin, xmax),
            bounds,
        })
    }

    /// Approximates the inverse of the integral of `speed` over
    /// `[tmin, tmax]`: maps a length in `[0, total]` to the parameter where it
    /// is reached.
    ///
    /// Each of the `n` samples is computed exactly (up to the quadrature and
    /// bisection tolerances). Returns the approximation and the total length.
    pub fn inverse_arc_length<F>(
        n: usize,
        rule: GaussLegendre,
        speed: &F,
        tmin: S,
        tmax: S,
    ) -> Result<(Self, S), GeometryError>
    where
        F: Fn(S) -> S + ?Sized,
    {
        let length_at = |t: S| rule.integrate(speed, tmin, t).abs();
        let total = length_at(tmax);
        let parameter_at = |length: S| bisection(&length_at, length, tmin, tmax);

        let approx = Self::new(n, &parameter_at, S::ZERO, total, tmin, tmax)?;

        Ok((approx, total))
    }

    /// Evaluates the approximation.
    pub fn eval(&self, x: S) -> S {
        let (xmin, xmax) = self.domain;
        let u = ((x - xmin) / (xmax - xmin) * S::TWO - S::ONE)
            .max(-S::ONE)
            .min(S::ONE);
        let angle = u.acos();

        let mut sum = S::ZERO;
        let mut order = S::ZERO;
        for c in &self.coefficients {
            sum += *c * (order * angle).cos();
            order += S::ONE;
        }
        let y = sum - self.coefficients[0] / S::TWO;

        match self.bounds {
            Some((ymin, ymax)) => y.max(ymin).min(ymax),
            None => y,
        }
    }

    /// The interval of inputs the approximation was fitted on.
    #[inline]
    pub fn domain(&self) -> (S, S) {
        self.domain
    }

    /// Number of nodes and coefficients of the series.
    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len()
    }
}

/// Forward and inverse arc length functions of a segment, for traversing it
/// at constant speed.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcLengthParametrization<S> {
    /// Maps a curve parameter to the length of the curve up to it.
    pub forward: CubicApproximation<S>,
    /// Maps a length along the curve to the corresponding curve parameter.
    pub inverse: ChebyshevApproximation<S>,
    /// Total length of the curve.
    pub length: S,
}

impl<S: Scalar> ArcLengthParametrization<S> {
    /// Builds the parametrization of a curve with the given speed over
    /// `[tmin, tmax]`.
    pub fn new<F>(options: &ArcLengthOptions, speed: &F, tmin: S, tmax: S) -> Result<Self, GeometryError>
    where
        F: Fn(S) -> S + ?Sized,
    {
        let (inverse, length) =
            ChebyshevApproximation::inverse_arc_length(options.samples, options.quadrature, speed, tmin, tmax)?;
        let (forward, _) = CubicApproximation::arc_length(options.quadrature, speed, tmin, tmax);

        Ok(ArcLengthParametrization {
            forward,
            inverse,
            length,
        })
    }

    /// Total length of the curve.
    #[inline]
    pub fn length(&self) -> S {
        self.length
    }

    /// Length of the curve from its start to parameter `t`.
    #[inline]
    pub fn length_at(&self, t: S) -> S {
        self.forward.eval(t)
    }

    /// Curve parameter at which the given length is reached.
    #[inline]
    pub fn t_at_length(&self, length: S) -> S {
        self.inverse.eval(length)
    }
}

#[cfg(test)]
fn assert_approx_eq(a: f64, b: f64, epsilon: f64) {
    if (a - b).abs() > epsilon {
        std::panic!("{} != {} (epsilon {})", a, b, epsilon);
    }
}

#[cfg(test)]
fn sin_square_speed(t: f64) -> f64 {
    // Speed of (sin t, t²).
    let dx = t.cos();
    let dy = 2.0 * t;
    (dx * dx + dy * dy).sqrt()
}

#[test]
fn chebyshev_square() {
    let f = |x: f64| x * x;
    let g = ChebyshevApproximation::new(3, &f, 0.0, 11.0, 0.0, 100.0).unwrap();
    assert_approx_eq(g.eval(0.0), 0.0, 1e-6);
    assert_approx_eq(g.eval(5.0), 25.0, 1e-6);
    assert_approx_eq(g.eval(10.0), 100.0, 1e-6);
    // Clamped to the output bounds.
    assert_approx_eq(g.eval(11.0), 100.0, 1e-6);
    assert_eq!(g.degree(), 3);
}

#[test]
fn chebyshev_clamps_arguments_to_the_domain() {
    let f = |x: f64| 2.0 * x + 1.0;
    let g = ChebyshevApproximation::new(4, &f, 0.0, 1.0, f64::NAN, f64::NAN).unwrap();
    assert_approx_eq(g.eval(0.5), 2.0, 1e-9);
    assert_approx_eq(g.eval(-1.0), 1.0, 1e-9);
    assert_approx_eq(g.eval(2.0), 3.0, 1e-9);
}

#[test]
fn chebyshev_bounds_in_any_order() {
    let f = |x: f64| x;
    let g = ChebyshevApproximation::new(2, &f, 0.0, 10.0, 8.0, 2.0).unwrap();
    assert_approx_eq(g.eval(1.0), 2.0, 1e-9);
    assert_approx_eq(g.eval(5.0), 5.0, 1e-9);
    assert_approx_eq(g.eval(9.0), 8.0, 1e-9);
}

#[test]
fn chebyshev_zero_nodes() {
    let f = |x: f64| x;
    assert_eq!(
        ChebyshevApproximation::new(0, &f, 0.0, 1.0, 0.0, 1.0),
        Err(GeometryError::InvalidSampleCount)
    );
    assert_eq!(
        ChebyshevApproximation::inverse_arc_length(0, GaussLegendre::Order5, &f, 0.0, 1.0).map(|_| ()),
        Err(GeometryError::InvalidSampleCount)
    );
}

#[test]
fn chebyshev_inverse_arc_length() {
    use core::f64::consts::PI;

    let (f, length) =
        ChebyshevApproximation::inverse_arc_length(15, GaussLegendre::Order7, &sin_square_speed, 0.0, 2.0 * PI)
            .unwrap();
    assert_approx_eq(length, 40.051641, 1e-3);
    assert_approx_eq(f.eval(0.0), 0.0, 0.01);
    assert_approx_eq(f.eval(40.051641), 2.0 * PI, 0.01);
    assert_approx_eq(f.eval(10.3539), PI, 0.01);
}

#[test]
fn cubic_arc_length() {
    // Constant speed: the length is linear in the parameter.
    let speed = |_: f64| 3.0;
    let (f, length) = CubicApproximation::arc_length(GaussLegendre::Order5, &speed, 1.0, 3.0);
    assert_approx_eq(length, 6.0, 1e-9);
    assert_approx_eq(f.eval(1.0), 0.0, 1e-9);
    assert_approx_eq(f.eval(2.0), 3.0, 1e-9);
    assert_approx_eq(f.eval(3.0), 6.0, 1e-9);

    // The integral of 3t² is exactly a cubic.
    let speed = |t: f64| 3.0 * t * t;
    let (f, length) = CubicApproximation::arc_length(GaussLegendre::Order3, &speed, 0.0, 2.0);
    assert_approx_eq(length, 8.0, 1e-9);
    assert_approx_eq(f.eval(1.0), 1.0, 1e-9);
    assert_approx_eq(f.eval(1.5), 3.375, 1e-9);
}

#[test]
fn cubic_inverse_arc_length() {
    let speed = |_: f64| 3.0;
    let (f, length) = CubicApproximation::inverse_arc_length(GaussLegendre::Order5, &speed, 1.0, 3.0);
    assert_approx_eq(length, 6.0, 1e-9);
    assert_approx_eq(f.eval(0.0), 1.0, 1e-9);
    assert_approx_eq(f.eval(3.0), 2.0, 0.01);
    assert_approx_eq(f.eval(6.0), 3.0, 1e-9);
    assert_eq!(f.domain(), (0.0, 6.0));
}

#[test]
fn arc_length_parametrization() {
    use core::f64::consts::PI;

    let param = ArcLengthParametrization::new(&ArcLengthOptions::DEFAULT, &sin_square_speed, 0.0, 2.0 * PI).unwrap();
    assert_approx_eq(param.length(), 40.051641, 1e-3);
    assert_approx_eq(param.length_at(0.0), 0.0, 1e-9);
    assert_approx_eq(param.length_at(2.0 * PI), param.length(), 1e-9);
    // Round trip through both approximations.
    let t = param.t_at_length(param.length_at(PI));
    assert_approx_eq(t, PI, 0.05);
}

#[test]
fn approximations_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ArcLengthParametrization<f64>>();
    assert_send_sync::<ChebyshevApproximation<f32>>();
}
