use crate::approximation::ArcLengthParametrization;
use crate::error::GeometryError;
use crate::options::ArcLengthOptions;
use crate::scalar::Scalar;
use crate::{LineSegment, Point, Vector};

use core::ops::Range;

/// Common APIs to segment types.
pub trait Segment: Copy + Sized {
    type Scalar: Scalar;

    /// Start of the curve.
    fn from(&self) -> Point<Self::Scalar>;

    /// End of the curve.
    fn to(&self) -> Point<Self::Scalar>;

    /// Sample the curve at t (expecting t between 0 and 1).
    fn sample(&self, t: Self::Scalar) -> Point<Self::Scalar>;

    /// Sample the derivative at t (expecting t between 0 and 1).
    fn derivative(&self, t: Self::Scalar) -> Vector<Self::Scalar>;

    /// Length of the derivative at t.
    fn speed(&self, t: Self::Scalar) -> Self::Scalar {
        self.derivative(t).length()
    }

    /// Split this curve into two sub-curves.
    fn split(&self, t: Self::Scalar) -> (Self, Self);

    /// Return the curve before the split point.
    fn before_split(&self, t: Self::Scalar) -> Self;

    /// Return the curve after the split point.
    fn after_split(&self, t: Self::Scalar) -> Self;

    /// Return the curve inside a given range of t.
    ///
    /// This is equivalent splitting at the range's end points.
    fn split_range(&self, t_range: Range<Self::Scalar>) -> Self;

    /// Swap the direction of the segment.
    fn flip(&self) -> Self;

    /// Length of the segment, within about 1% for curves.
    fn length(&self) -> Self::Scalar;

    /// Signed radius of curvature at t.
    ///
    /// Negative when the curve bends clockwise, NaN where the curve is
    /// straight.
    fn curvature_radius(&self, t: Self::Scalar) -> Self::Scalar;

    /// Normal on the right side of the segment at t, scaled to `distance`.
    ///
    /// Curves that only define their normal at the endpoints return
    /// `GeometryError::NormalAtInteriorParameter` for other values of t.
    fn normal(&self, t: Self::Scalar, distance: Self::Scalar) -> Result<Vector<Self::Scalar>, GeometryError>;

    /// Approximates the curve offset by `offset` along its normal with a
    /// sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve
    /// and its approximation. The callback receives each line segment along
    /// with the range of curve parameters it covers. The last range ends at
    /// `1.0` exactly.
    #[allow(clippy::type_complexity)]
    fn for_each_offset_flattened(
        &self,
        offset: Self::Scalar,
        tolerance: Self::Scalar,
        callback: &mut dyn FnMut(&LineSegment<Self::Scalar>, Range<Self::Scalar>),
    );

    /// Approximates the curve with a sequence of line segments.
    fn for_each_flattened(&self, tolerance: Self::Scalar, callback: &mut dyn FnMut(&LineSegment<Self::Scalar>)) {
        self.for_each_offset_flattened(Self::Scalar::ZERO, tolerance, &mut |segment, _| callback(segment));
    }

    /// Builds the forward and inverse arc length functions of the segment.
    fn arc_length_parametrization(
        &self,
        options: &ArcLengthOptions,
    ) -> Result<ArcLengthParametrization<Self::Scalar>, GeometryError> {
        let speed = |t: Self::Scalar| self.speed(t);
        ArcLengthParametrization::new(options, &speed, Self::Scalar::ZERO, Self::Scalar::ONE)
    }
}

macro_rules! impl_segment {
    ($S:ty) => {
        type Scalar = $S;
        fn from(&self) -> Point<$S> {
            self.from()
        }
        fn to(&self) -> Point<$S> {
            self.to()
        }
        fn sample(&self, t: $S) -> Point<$S> {
            self.sample(t)
        }
        fn derivative(&self, t: $S) -> Vector<$S> {
            self.derivative(t)
        }
        fn split(&self, t: $S) -> (Self, Self) {
            self.split(t)
        }
        fn before_split(&self, t: $S) -> Self {
            self.before_split(t)
        }
        fn after_split(&self, t: $S) -> Self {
            self.after_split(t)
        }
        fn split_range(&self, t_range: Range<$S>) -> Self {
            self.split_range(t_range)
        }
        fn flip(&self) -> Self {
            self.flip()
        }
        fn length(&self) -> $S {
            self.length()
        }
        fn curvature_radius(&self, t: $S) -> $S {
            self.curvature_radius(t)
        }
        fn for_each_offset_flattened(
            &self,
            offset: $S,
            tolerance: $S,
            callback: &mut dyn FnMut(&LineSegment<$S>, Range<$S>),
        ) {
            self.for_each_offset_flattened(offset, tolerance, &mut |segment, range| callback(segment, range));
        }
    };
}
