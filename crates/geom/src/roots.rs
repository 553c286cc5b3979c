//! Quadratic and cubic polynomial solvers.
//!
//! Missing roots are reported as NaN rather than through a variable length
//! list so that the results can be threaded through the curve maths without
//! allocation or branching on the number of solutions.

use crate::scalar::Scalar;
use crate::utils::min_max;

/// Solves `a·x² + b·x + c = 0` and returns the real roots in ascending order.
///
/// Non-existent roots are NaN and a single root is always returned first.
/// When every term vanishes, every `x` is a solution and `(0, NaN)` is
/// returned.
///
/// The generic case uses the Citardauq formula for the root where `b` and the
/// square root of the discriminant would otherwise cancel each other out.
pub fn solve_quadratic<S: Scalar>(a: S, b: S, c: S) -> (S, S) {
    if a == S::ZERO {
        if b == S::ZERO {
            if c == S::ZERO {
                return (S::ZERO, S::nan());
            }
            return (S::nan(), S::nan());
        }
        return (-c / b, S::nan());
    }

    if c == S::ZERO {
        let x = -b / a;
        if x == S::ZERO {
            return (S::ZERO, S::nan());
        }
        return min_max(S::ZERO, x);
    }

    let discriminant = b * b - S::FOUR * a * c;
    if discriminant < S::ZERO {
        return (S::nan(), S::nan());
    }
    if discriminant == S::ZERO {
        return (-b / (S::TWO * a), S::nan());
    }

    let mut q = discriminant.sqrt();
    if b < S::ZERO {
        q = -q;
    }
    let x1 = -(b + q) / (S::TWO * a);
    let x2 = c / (a * x1);

    min_max(x1, x2)
}

/// Same as `solve_quadratic` but only keeps the roots in `[0, 1)`.
///
/// This is the domain of curve parameters, which is what the inflection point
/// detection of cubic bézier curves needs.
pub fn solve_quadratic_in_unit_interval<S: Scalar>(a: S, b: S, c: S) -> (S, S) {
    let (x1, x2) = solve_quadratic(a, b, c);
    let x1 = in_unit_interval(x1);
    let x2 = in_unit_interval(x2);

    if x1.is_nan() {
        (x2, x1)
    } else {
        (x1, x2)
    }
}

#[inline]
fn in_unit_interval<S: Scalar>(x: S) -> S {
    if x < S::ZERO || x >= S::ONE {
        return S::nan();
    }

    x
}

/// Solves `c3·x³ + c2·x² + c1·x + c0 = 0` and returns the real roots in
/// ascending order, missing roots being NaN.
///
/// Degenerates to `solve_quadratic` when `c3` is zero. Otherwise the depressed
/// cubic `y³ + p·y + q` is solved, with Cardano's formula when there is a
/// single real root and the trigonometric method when there are three.
pub fn solve_cubic<S: Scalar>(c3: S, c2: S, c1: S, c0: S) -> (S, S, S) {
    if c3 == S::ZERO {
        let (x1, x2) = solve_quadratic(c2, c1, c0);
        return (x1, x2, S::nan());
    }

    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;

    // x = y - a/3
    let shift = -a / S::THREE;
    let p = b - a * a / S::THREE;
    let q = S::TWO * a * a * a / S::value(27.0) - a * b / S::THREE + c;

    let p_is_zero = p.abs() < S::EPSILON;
    let q_is_zero = q.abs() < S::EPSILON;

    if p_is_zero && q_is_zero {
        // Triple root.
        return (shift, S::nan(), S::nan());
    }

    if p_is_zero {
        return (shift + (-q).cbrt(), S::nan(), S::nan());
    }

    if q_is_zero {
        if p > S::ZERO {
            return (shift, S::nan(), S::nan());
        }
        let r = (-p).sqrt();
        return (shift - r, shift, shift + r);
    }

    let half_q = q / S::TWO;
    let third_p = p / S::THREE;
    let delta = half_q * half_q + third_p * third_p * third_p;

    if delta.abs() < S::EPSILON {
        // A simple and a double root.
        let (x1, x2) = min_max(shift + S::THREE * q / p, shift - S::THREE * q / (S::TWO * p));
        return (x1, x2, S::nan());
    }

    if delta > S::ZERO {
        let sqrt_delta = delta.sqrt();
        let y = (-half_q + sqrt_delta).cbrt() + (-half_q - sqrt_delta).cbrt();
        return (shift + y, S::nan(), S::nan());
    }

    // Three distinct real roots, p is negative here.
    let m = S::TWO * (-third_p).sqrt();
    let cos_arg = (S::THREE * q / (S::TWO * p) * (-S::THREE / p).sqrt())
        .max(-S::ONE)
        .min(S::ONE);
    let theta = cos_arg.acos() / S::THREE;
    let third_turn = S::TWO * S::PI() / S::THREE;

    let mut roots = [
        shift + m * theta.cos(),
        shift + m * (theta - third_turn).cos(),
        shift + m * (theta - S::TWO * third_turn).cos(),
    ];
    sort3(&mut roots);

    (roots[0], roots[1], roots[2])
}

fn sort3<S: Scalar>(v: &mut [S; 3]) {
    if v[0] > v[1] {
        v.swap(0, 1);
    }
    if v[1] > v[2] {
        v.swap(1, 2);
    }
    if v[0] > v[1] {
        v.swap(0, 1);
    }
}

#[cfg(test)]
fn assert_root(actual: f64, expected: f64) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "expected NaN, got {}", actual);
    } else {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }
}

#[cfg(test)]
fn assert_roots2(actual: (f64, f64), expected: (f64, f64)) {
    assert_root(actual.0, expected.0);
    assert_root(actual.1, expected.1);
}

#[cfg(test)]
fn assert_roots3(actual: (f64, f64, f64), expected: (f64, f64, f64)) {
    assert_root(actual.0, expected.0);
    assert_root(actual.1, expected.1);
    assert_root(actual.2, expected.2);
}

#[test]
fn quadratic_degenerate_cases() {
    let nan = f64::NAN;
    // Every x is a solution.
    assert_roots2(solve_quadratic(0.0, 0.0, 0.0), (0.0, nan));
    // No solution.
    assert_roots2(solve_quadratic(0.0, 0.0, 1.0), (nan, nan));
    // Linear.
    assert_roots2(solve_quadratic(0.0, 1.0, 1.0), (-1.0, nan));
    // No constant term.
    assert_roots2(solve_quadratic(1.0, 1.0, 0.0), (-1.0, 0.0));
    // Negative discriminant.
    assert_roots2(solve_quadratic(1.0, 1.0, 1.0), (nan, nan));
    // Zero discriminant.
    assert_roots2(solve_quadratic(1.0, 1.0, 0.25), (-0.5, nan));
}

#[test]
fn quadratic_negative_b() {
    assert_roots2(solve_quadratic(2.0, -5.0, 2.0), (0.5, 2.0));
    assert_roots2(solve_quadratic(2.0, 5.0, 2.0), (-2.0, -0.5));
}

#[test]
fn quadratic_small_c_does_not_cancel() {
    // The naive formula loses all precision on the small root here.
    let (x1, x2): (f64, f64) = solve_quadratic(1.0, -1e8, 1.0);
    assert!((x1 - 1e-8).abs() < 1e-20);
    assert!((x2 - 1e8).abs() < 1e-4);
}

#[test]
fn quadratic_in_unit_interval() {
    let nan = f64::NAN;
    assert_roots2(solve_quadratic_in_unit_interval(0.0, 0.0, 0.0), (0.0, nan));
    assert_roots2(solve_quadratic_in_unit_interval(0.0, 0.0, 1.0), (nan, nan));
    assert_roots2(solve_quadratic_in_unit_interval(0.0, 1.0, 1.0), (nan, nan));
    assert_roots2(solve_quadratic_in_unit_interval(1.0, 1.0, 0.0), (0.0, nan));
    assert_roots2(solve_quadratic_in_unit_interval(1.0, 1.0, 0.25), (nan, nan));
    // The root at 2.0 is filtered out and the remaining one comes first.
    assert_roots2(solve_quadratic_in_unit_interval(2.0, -5.0, 2.0), (0.5, nan));
    assert_roots2(solve_quadratic_in_unit_interval(1.0, -1.0, 0.21), (0.3, 0.7));
    // 1.0 is excluded.
    assert_roots2(solve_quadratic_in_unit_interval(1.0, -1.5, 0.5), (0.5, nan));
}

#[test]
fn quadratic_roots_satisfy_the_equation() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for _ in 0..1000 {
        let a: f64 = rng.gen_range(-10.0..10.0);
        let b: f64 = rng.gen_range(-10.0..10.0);
        let c: f64 = rng.gen_range(-10.0..10.0);
        let (x1, x2) = solve_quadratic_in_unit_interval(a, b, c);
        for x in [x1, x2] {
            if x.is_nan() {
                continue;
            }
            assert!(x >= 0.0 && x < 1.0);
            assert!((a * x * x + b * x + c).abs() < 1e-9);
        }
        if x1.is_nan() {
            assert!(x2.is_nan());
        }
    }
}

#[test]
fn cubic_reference_values() {
    let nan = f64::NAN;
    // Quadratic.
    assert_roots3(solve_cubic(0.0, 1.0, 1.0, 0.25), (-0.5, nan, nan));
    // Triple root.
    assert_roots3(solve_cubic(1.0, -15.0, 75.0, -125.0), (5.0, nan, nan));
    // Depressed cubic without constant term.
    assert_roots3(solve_cubic(1.0, -3.0, -6.0, 8.0), (-2.0, 1.0, 4.0));
    // Depressed cubic without linear term.
    assert_roots3(solve_cubic(1.0, -15.0, 75.0, -124.0), (4.0, nan, nan));
    assert_roots3(solve_cubic(1.0, -15.0, 75.0, -126.0), (6.0, nan, nan));
    // Three real roots.
    assert_roots3(solve_cubic(1.0, 0.0, -7.0, 6.0), (-3.0, 1.0, 2.0));
    // Double root.
    assert_roots3(solve_cubic(1.0, -3.0, -9.0, -5.0), (-1.0, 5.0, nan));
    // One real root.
    assert_roots3(solve_cubic(1.0, -4.0, 2.0, -8.0), (4.0, nan, nan));
    assert_roots3(solve_cubic(1.0, -4.0, 2.0, 7.0), (-1.0, nan, nan));
}

#[test]
fn cubic_scaled_coefficients() {
    // Same roots as (x + 3)(x - 1)(x - 2).
    let (x1, x2, x3) = solve_cubic(-2.0, 0.0, 14.0, -12.0);
    assert_roots3((x1, x2, x3), (-3.0, 1.0, 2.0));
}

#[test]
fn cubic_three_roots_f32() {
    let (x1, x2, x3) = solve_cubic(1.0f32, 0.0, -7.0, 6.0);
    assert!((x1 + 3.0).abs() < 1e-4);
    assert!((x2 - 1.0).abs() < 1e-4);
    assert!((x3 - 2.0).abs() < 1e-4);
}
