//! Small vector and angle helpers shared by the curve types.

use crate::scalar::Scalar;
use crate::{vector, Vector};

#[inline]
pub fn min_max<S: Scalar>(a: S, b: S) -> (S, S) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rotates a vector by 90 degrees clockwise: `(x, y)` becomes `(y, -x)`.
#[inline]
pub fn rotate_90_cw<S: Scalar>(v: Vector<S>) -> Vector<S> {
    vector(v.y, -v.x)
}

/// Rotates a vector by 90 degrees counter-clockwise: `(x, y)` becomes `(-y, x)`.
#[inline]
pub fn rotate_90_ccw<S: Scalar>(v: Vector<S>) -> Vector<S> {
    vector(-v.y, v.x)
}

/// Scales a vector to the given length.
///
/// Unlike `Vector::with_length`, a zero vector stays a zero vector instead of
/// turning into NaNs.
#[inline]
pub fn with_length<S: Scalar>(v: Vector<S>, length: S) -> Vector<S> {
    let current = v.length();
    if current == S::ZERO {
        return vector(S::ZERO, S::ZERO);
    }

    v * (length / current)
}

/// Normalizes an angle in radians to `[0, 2π)`.
pub fn angle_norm<S: Scalar>(theta: S) -> S {
    let two_pi = S::TWO * S::PI();
    let mut theta = theta % two_pi;
    if theta < S::ZERO {
        theta += two_pi;
    }
    // A tiny negative remainder rounds to 2π once shifted.
    if theta >= two_pi {
        theta = S::ZERO;
    }

    theta
}

/// Returns whether `theta` lies strictly between `lower` and `upper`, going
/// counter-clockwise from the smaller of the two bounds.
///
/// All three angles are compared modulo 2π.
pub fn angle_between<S: Scalar>(theta: S, lower: S, upper: S) -> bool {
    let (lower, upper) = min_max(lower, upper);
    let span = upper - lower;
    let relative = angle_norm(theta - lower);

    S::ZERO < relative && relative < span
}

#[cfg(test)]
fn assert_approx_eq(a: f64, b: f64) {
    if (a - b).abs() > 1e-9 {
        std::panic!("{} != {}", a, b);
    }
}

#[test]
fn test_rotations() {
    let v = vector(3.0, 4.0);
    assert_eq!(rotate_90_cw(v), vector(4.0, -3.0));
    assert_eq!(rotate_90_ccw(v), vector(-4.0, 3.0));
    assert_eq!(rotate_90_ccw(rotate_90_cw(v)), v);
}

#[test]
fn test_with_length() {
    let v = with_length(vector(3.0, 4.0), 3.0);
    assert_approx_eq(v.x, 1.8);
    assert_approx_eq(v.y, 2.4);
    assert_eq!(with_length(vector(3.0, 4.0), 0.0), vector(0.0, 0.0));
    assert_eq!(with_length(vector(0.0, 0.0), 1.0), vector(0.0, 0.0));
}

#[test]
fn test_angle_norm() {
    use core::f64::consts::PI;
    assert_approx_eq(angle_norm(0.0), 0.0);
    assert_approx_eq(angle_norm(PI), PI);
    assert_approx_eq(angle_norm(2.0 * PI), 0.0);
    assert_approx_eq(angle_norm(3.0 * PI), PI);
    assert_approx_eq(angle_norm(-PI), PI);
    assert_approx_eq(angle_norm(-2.0 * PI), 0.0);
    assert!(angle_norm(-1e-20) < 2.0 * PI);
}

#[test]
fn test_angle_between() {
    use core::f64::consts::PI;
    assert!(!angle_between(0.0, 0.0, 1.0));
    assert!(!angle_between(1.0, 0.0, 1.0));
    assert!(angle_between(0.5, 0.0, 1.0));
    assert!(angle_between(0.5 + 2.0 * PI, 0.0, 1.0));
    assert!(angle_between(0.5, 2.0 * PI, 1.0 + 2.0 * PI));
    assert!(angle_between(0.5, 1.0 + 2.0 * PI, 2.0 * PI));
    assert!(angle_between(0.5 - 2.0 * PI, 0.0, 1.0));
    assert!(angle_between(0.5, -2.0 * PI, 1.0 - 2.0 * PI));
    assert!(angle_between(0.5, 1.0 - 2.0 * PI, -2.0 * PI));
    assert!(!angle_between(1.5, 0.0, 1.0));
}
