//! Numerical integration and inversion of scalar functions.
//!
//! The Gauss-Legendre rules integrate the speed of a curve to measure its
//! length. The bisection method inverts monotonic functions such as the
//! length of a curve as a function of its parameter.

use crate::scalar::Scalar;

/// Maximum number of iterations of `bisection`.
pub const BISECTION_MAX_ITERATIONS: u32 = 100;

/// Relative tolerance of `bisection`, applied to both the argument and the
/// value ranges.
pub const BISECTION_TOLERANCE: f64 = 0.001;

// See https://pomax.github.io/bezierinfo/legendre-gauss.html for more values.
const ORDER3_NODES: [f64; 3] = [-0.7745966692414834, 0.0, 0.7745966692414834];
const ORDER3_WEIGHTS: [f64; 3] = [0.5555555555555556, 0.8888888888888888, 0.5555555555555556];

const ORDER5_NODES: [f64; 5] = [
    -0.9061798459386640,
    -0.5384693101056831,
    0.0,
    0.5384693101056831,
    0.9061798459386640,
];
const ORDER5_WEIGHTS: [f64; 5] = [
    0.2369268850561891,
    0.4786286704993665,
    0.5688888888888889,
    0.4786286704993665,
    0.2369268850561891,
];

const ORDER7_NODES: [f64; 7] = [
    -0.9491079123427585,
    -0.7415311855993945,
    -0.4058451513773972,
    0.0,
    0.4058451513773972,
    0.7415311855993945,
    0.9491079123427585,
];
const ORDER7_WEIGHTS: [f64; 7] = [
    0.1294849661688697,
    0.2797053914892766,
    0.3818300505051189,
    0.4179591836734694,
    0.3818300505051189,
    0.2797053914892766,
    0.1294849661688697,
];

/// A fixed order Gauss-Legendre quadrature rule.
///
/// Higher orders sample the integrand more often and are more precise on
/// functions that are not well approximated by low degree polynomials.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum GaussLegendre {
    Order3,
    Order5,
    Order7,
}

impl GaussLegendre {
    /// Integrates `f` over `[a, b]`.
    pub fn integrate<S, F>(self, f: &F, a: S, b: S) -> S
    where
        S: Scalar,
        F: Fn(S) -> S + ?Sized,
    {
        match self {
            GaussLegendre::Order3 => gauss_legendre3(f, a, b),
            GaussLegendre::Order5 => gauss_legendre5(f, a, b),
            GaussLegendre::Order7 => gauss_legendre7(f, a, b),
        }
    }
}

fn gauss_legendre<S, F>(f: &F, a: S, b: S, nodes: &[f64], weights: &[f64]) -> S
where
    S: Scalar,
    F: Fn(S) -> S + ?Sized,
{
    let half_range = (b - a) / S::TWO;
    let mid = (a + b) / S::TWO;

    let mut sum = S::ZERO;
    for (&x, &w) in nodes.iter().zip(weights) {
        sum += S::value(w) * f(S::value(x) * half_range + mid);
    }

    half_range * sum
}

/// Integrates `f` over `[a, b]` with the three point Gauss-Legendre rule.
pub fn gauss_legendre3<S, F>(f: &F, a: S, b: S) -> S
where
    S: Scalar,
    F: Fn(S) -> S + ?Sized,
{
    gauss_legendre(f, a, b, &ORDER3_NODES, &ORDER3_WEIGHTS)
}

/// Integrates `f` over `[a, b]` with the five point Gauss-Legendre rule.
pub fn gauss_legendre5<S, F>(f: &F, a: S, b: S) -> S
where
    S: Scalar,
    F: Fn(S) -> S + ?Sized,
{
    gauss_legendre(f, a, b, &ORDER5_NODES, &ORDER5_WEIGHTS)
}

/// Integrates `f` over `[a, b]` with the seven point Gauss-Legendre rule.
pub fn gauss_legendre7<S, F>(f: &F, a: S, b: S) -> S
where
    S: Scalar,
    F: Fn(S) -> S + ?Sized,
{
    gauss_legendre(f, a, b, &ORDER7_NODES, &ORDER7_WEIGHTS)
}

/// Finds `x` in `[xmin, xmax]` such that `f(x) = y`, assuming `f` is monotonic
/// over the interval.
///
/// The search stops once `f(x)` is within 0.1% of the value range of `f` or
/// the bracketing interval is within 0.1% of the argument range, and in any
/// case after `BISECTION_MAX_ITERATIONS` iterations. Both increasing and
/// decreasing functions are supported.
pub fn bisection<S, F>(f: &F, y: S, xmin: S, xmax: S) -> S
where
    S: Scalar,
    F: Fn(S) -> S + ?Sized,
{
    let tolerance = S::value(BISECTION_TOLERANCE);
    let f_min = f(xmin);
    let f_max = f(xmax);
    let tolerance_x = (xmax - xmin).abs() * tolerance;
    let tolerance_y = (f_max - f_min).abs() * tolerance;
    let increasing = f_max >= f_min;

    let mut lower = xmin;
    let mut upper = xmax;
    for _ in 0..BISECTION_MAX_ITERATIONS {
        let x = (lower + upper) / S::TWO;
        let dy = f(x) - y;
        if dy.abs() < tolerance_y || (upper - lower).abs() / S::TWO < tolerance_x {
            return x;
        }

        if (dy > S::ZERO) == increasing {
            upper = x;
        } else {
            lower = x;
        }
    }

    log::trace!(
        "bisection: no convergence after {} iterations looking for {:?} in [{:?}, {:?}]",
        BISECTION_MAX_ITERATIONS,
        y,
        xmin,
        xmax
    );

    (lower + upper) / S::TWO
}

#[cfg(test)]
fn assert_approx_eq(a: f64, b: f64, epsilon: f64) {
    if (a - b).abs() > epsilon {
        std::panic!("{} != {} (epsilon {})", a, b, epsilon);
    }
}

#[test]
fn gauss_legendre_log() {
    let ln = |x: f64| x.ln();
    assert_approx_eq(gauss_legendre3(&ln, 0.0, 1.0), -0.947672, 1e-5);
    assert_approx_eq(gauss_legendre5(&ln, 0.0, 1.0), -0.979001, 1e-5);
    assert_approx_eq(gauss_legendre7(&ln, 0.0, 1.0), -0.988738, 1e-5);

    assert_approx_eq(GaussLegendre::Order5.integrate(&ln, 0.0, 1.0), -0.979001, 1e-5);
}

#[test]
fn gauss_legendre_is_exact_for_polynomials() {
    // An n point rule integrates polynomials of degree 2n - 1 exactly.
    let p5 = |x: f64| 6.0 * x.powi(5) - x * x + 1.0;
    let expected = 64.0 - 8.0 / 3.0 + 2.0;
    assert_approx_eq(gauss_legendre3(&p5, 0.0, 2.0), expected, 1e-9);

    let p9 = |x: f64| 10.0 * x.powi(9);
    assert_approx_eq(gauss_legendre5(&p9, -1.0, 1.0), 0.0, 1e-9);
    assert_approx_eq(gauss_legendre5(&p9, 0.0, 1.0), 1.0, 1e-9);

    let p13 = |x: f64| 14.0 * x.powi(13);
    assert_approx_eq(gauss_legendre7(&p13, 0.0, 1.0), 1.0, 1e-9);
}

#[test]
fn gauss_legendre_f32() {
    let f = |x: f32| x * x;
    let v = gauss_legendre5(&f, 0.0f32, 3.0);
    assert!((v - 9.0).abs() < 1e-4);
}

#[test]
fn bisection_increasing() {
    let f = |x: f64| x * x;
    let x = bisection(&f, 2.0, 0.0, 2.0);
    assert_approx_eq(x, 2.0f64.sqrt(), 0.01);
}

#[test]
fn bisection_decreasing() {
    let f = |x: f64| 10.0 - 3.0 * x;
    let x = bisection(&f, 4.0, 0.0, 3.0);
    assert_approx_eq(x, 2.0, 0.01);
}

#[test]
fn bisection_flat_function_terminates() {
    let f = |_: f64| 1.0;
    let x = bisection(&f, 5.0, 0.0, 1.0);
    assert!(x >= 0.0 && x <= 1.0);

    let x = bisection(&f, 1.0, 2.0, 2.0);
    assert_eq!(x, 2.0);
}

#[test]
fn bisection_out_of_range_value_clamps() {
    let f = |x: f64| x;
    let x = bisection(&f, 5.0, 0.0, 1.0);
    assert_approx_eq(x, 1.0, 0.01);
}
