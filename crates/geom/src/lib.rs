#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::let_and_return)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! 2D path geometry on top of euclid: the maths needed to measure, stroke
//! and flatten paths made of line segments, bézier curves and elliptic arcs.
//!
//! # Overview.
//!
//! This crate implements:
//!
//! - stable quadratic and cubic polynomial solvers ([`roots`]),
//! - Gauss-Legendre quadrature and bisection ([`quadrature`]),
//! - cubic and Chebyshev fits of arc length functions ([`approximation`]),
//! - intersections between line segments, lines and circles ([`intersection`]),
//! - elliptic arcs in center and SVG endpoint form ([`arc`]),
//! - quadratic and cubic bézier curves, including a flattening algorithm
//!   that can offset the curve by half of a stroke width ([`cubic_bezier`]).
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of line segments.
//!
//! The tolerance threshold taken as input by the flattening algorithms corresponds
//! to the maximum distance between the curve and its linear approximation.
//! The smaller the tolerance is, the more precise the approximation and the more segments
//! are generated. This value is typically chosen in function of the zoom level.
//!
//! Cubic bézier curves are flattened with the algorithm described in
//! "Fast, precise flattening of cubic Bézier path and offset curves"
//! (T. F. Hain et al., 2005), which handles inflection points and cusps and
//! can produce the offset curve used to outline a stroke.
//!
//! # NaN
//!
//! Geometric degeneracy is never an error. Scalar queries without a solution
//! (a missing root, an undefined curvature radius) return NaN and geometric
//! queries without a solution return `None` or an empty list. Only misuse of
//! the API is reported through [`GeometryError`].

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

#[macro_use]
mod segment;
pub mod approximation;
pub mod arc;
pub mod cubic_bezier;
mod error;
mod flatten_cubic;
pub mod intersection;
mod line;
mod options;
pub mod path;
pub mod quadratic_bezier;
pub mod quadrature;
pub mod roots;
pub mod utils;

#[doc(inline)]
pub use crate::approximation::{ArcLengthParametrization, ChebyshevApproximation, CubicApproximation};
#[doc(inline)]
pub use crate::arc::{Arc, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::error::GeometryError;
#[doc(inline)]
pub use crate::intersection::{Circle, Shape};
#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::options::{ArcLengthOptions, FlattenOptions};
#[doc(inline)]
pub use crate::path::{Path, PathBuilder, PathEvent};
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;
#[doc(inline)]
pub use crate::quadrature::GaussLegendre;
#[doc(inline)]
pub use crate::segment::Segment;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const FIVE: Self;
        const SIX: Self;
        const SEVEN: Self;
        const EIGHT: Self;
        const NINE: Self;
        const TEN: Self;

        const EPSILON: Self;

        /// Converts a constant to the scalar type.
        ///
        /// Quadrature nodes and weights need more digits than `f32` holds, so
        /// constants are written as `f64`.
        fn value(v: f64) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const FIVE: Self = 5.0;
        const SIX: Self = 6.0;
        const SEVEN: Self = 7.0;
        const EIGHT: Self = 8.0;
        const NINE: Self = 9.0;
        const TEN: Self = 10.0;

        const EPSILON: Self = 1e-4;

        #[inline]
        fn value(v: f64) -> Self {
            v as f32
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const FIVE: Self = 5.0;
        const SIX: Self = 6.0;
        const SEVEN: Self = 7.0;
        const EIGHT: Self = 8.0;
        const NINE: Self = 9.0;
        const TEN: Self = 10.0;

        const EPSILON: Self = 1e-8;

        #[inline]
        fn value(v: f64) -> Self {
            v
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// An angle in radians.
pub use euclid::Angle;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}
