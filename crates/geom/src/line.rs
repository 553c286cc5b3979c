use crate::error::GeometryError;
use crate::intersection;
use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::utils::{rotate_90_cw, with_length};
use crate::{point, Point, Vector};

use core::ops::Range;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// The derivative is the same everywhere on a segment.
    #[inline]
    pub fn derivative(&self, _t: S) -> Vector<S> {
        self.to_vector()
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Return the sub-segment inside a given range of t.
    ///
    /// This is equivalent splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        LineSegment {
            from: self.from.lerp(self.to, t_range.start),
            to: self.from.lerp(self.to, t_range.end),
        }
    }

    /// Split this curve into two sub-segments.
    #[inline]
    pub fn split(&self, t: S) -> (Self, Self) {
        let split_point = self.sample(t);

        (
            LineSegment {
                from: self.from,
                to: split_point,
            },
            LineSegment {
                from: split_point,
                to: self.to,
            },
        )
    }

    /// Return the segment before the split point.
    #[inline]
    pub fn before_split(&self, t: S) -> Self {
        LineSegment {
            from: self.from,
            to: self.sample(t),
        }
    }

    /// Return the segment after the split point.
    #[inline]
    pub fn after_split(&self, t: S) -> Self {
        LineSegment {
            from: self.sample(t),
            to: self.to,
        }
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Returns the line containing this segment.
    #[inline]
    pub fn to_line(&self) -> Line<S> {
        Line {
            point: self.from,
            vector: self.to - self.from,
        }
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> S {
        self.to_vector().square_length()
    }

    /// A segment has no curvature, the radius is always NaN.
    #[inline]
    pub fn curvature_radius(&self, _t: S) -> S {
        S::nan()
    }

    /// Normal on the right side of the segment, scaled to `distance`.
    ///
    /// A segment with no length has a zero normal.
    #[inline]
    pub fn normal(&self, distance: S) -> Vector<S> {
        with_length(rotate_90_cw(self.to_vector()), distance)
    }

    /// The segment translated by `distance` along its normal.
    pub fn offset(&self, distance: S) -> Self {
        let n = self.normal(distance);
        LineSegment {
            from: self.from + n,
            to: self.to + n,
        }
    }

    /// Computes the intersection (if any) between this segment and another one.
    ///
    /// Segments touching at an end point intersect. Parallel segments, including
    /// overlapping ones, never do.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Point<S>> {
        intersection::line_segments(self.from, self.to, other.from, other.to)
    }

    /// Computes the intersection (if any) between this segment and an infinite line.
    pub fn line_intersection(&self, line: &Line<S>) -> Option<Point<S>> {
        let v1 = self.to_vector();
        let det = v1.cross(line.vector);
        if det.abs() < S::EPSILON {
            return None;
        }

        let t = line.vector.cross(self.from - line.point) / det;
        if t < S::ZERO || t > S::ONE {
            return None;
        }

        Some(self.sample(t))
    }

    /// Computes the distance between this segment and a point.
    #[inline]
    pub fn distance_to_point(&self, p: Point<S>) -> S {
        self.square_distance_to_point(p).sqrt()
    }

    /// Computes the squared distance between this segment and a point.
    ///
    /// Can be useful to save a square root and a division when comparing against
    /// a distance that can be squared.
    #[inline]
    pub fn square_distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).square_length()
    }

    /// Computes the closest point on this segment to `p`.
    #[inline]
    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v1 = self.to - self.from;
        let v2 = p - self.from;
        let square_length = v1.dot(v1);
        if square_length == S::ZERO {
            return self.from;
        }
        let t = S::min(S::max(v2.dot(v1) / square_length, S::ZERO), S::ONE);

        self.from + v1 * t
    }

    /// Calls `callback` with the segment offset by `offset` along its normal.
    ///
    /// A segment is its own flattening so the callback is invoked once, unless
    /// the segment has no length in which case nothing is emitted.
    pub fn for_each_offset_flattened<F>(&self, offset: S, _tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        if self.from == self.to {
            return;
        }

        callback(&self.offset(offset), S::ZERO..S::ONE);
    }

    #[inline]
    pub fn to_f32(&self) -> LineSegment<f32> {
        LineSegment {
            from: self.from.to_f32(),
            to: self.to.to_f32(),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> LineSegment<f64> {
        LineSegment {
            from: self.from.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

impl<S: Scalar> Segment for LineSegment<S> {
    impl_segment!(S);

    fn normal(&self, _t: S, distance: S) -> Result<Vector<S>, GeometryError> {
        Ok(self.normal(distance))
    }
}

/// An infinite line defined by a point and a vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line<S> {
    pub point: Point<S>,
    pub vector: Vector<S>,
}

impl<S: Scalar> Line<S> {
    pub fn intersection(&self, other: &Self) -> Option<Point<S>> {
        let det = self.vector.cross(other.vector);
        if S::abs(det) <= S::EPSILON {
            // The lines are very close to parallel
            return None;
        }
        let inv_det = S::ONE / det;
        let self_p2 = self.point + self.vector;
        let other_p2 = other.point + other.vector;
        let a = self.point.to_vector().cross(self_p2.to_vector());
        let b = other.point.to_vector().cross(other_p2.to_vector());

        Some(point(
            (b * self.vector.x - a * other.vector.x) * inv_det,
            (b * self.vector.y - a * other.vector.y) * inv_det,
        ))
    }

    pub fn distance_to_point(&self, p: &Point<S>) -> S {
        S::abs(self.signed_distance_to_point(p))
    }

    /// Positive on the left side of the line's vector.
    pub fn signed_distance_to_point(&self, p: &Point<S>) -> S {
        let v = *p - self.point;
        self.vector.cross(v) / self.vector.length()
    }
}

#[cfg(test)]
use euclid::approxeq::ApproxEq;

#[cfg(test)]
fn fuzzy_eq_point(a: Point<f32>, b: Point<f32>, epsilon: f32) -> bool {
    (a - b).length() <= epsilon
}

#[test]
fn intersection_rotated() {
    use core::f32::consts::PI;
    let epsilon = 0.0001;
    let count: u32 = 100;

    for i in 0..count {
        for j in 0..count {
            if i % (count / 2) == j % (count / 2) {
                // avoid the colinear case.
                continue;
            }

            let angle1 = i as f32 / (count as f32) * 2.0 * PI;
            let angle2 = j as f32 / (count as f32) * 2.0 * PI;

            let l1 = LineSegment {
                from: point(10.0 * angle1.cos(), 10.0 * angle1.sin()),
                to: point(-10.0 * angle1.cos(), -10.0 * angle1.sin()),
            };

            let l2 = LineSegment {
                from: point(10.0 * angle2.cos(), 10.0 * angle2.sin()),
                to: point(-10.0 * angle2.cos(), -10.0 * angle2.sin()),
            };

            let p = l1.intersection(&l2).unwrap();
            assert!(fuzzy_eq_point(p, point(0.0, 0.0), epsilon));
        }
    }
}

#[test]
fn intersection_touching() {
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 10.0),
    };

    let l2 = LineSegment {
        from: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(l1.intersection(&l2), Some(point(10.0, 10.0)));
}

#[test]
fn intersection_overlap() {
    // Overlapping segments share a region rather than a point, they are
    // treated as parallel.
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };

    let l2 = LineSegment {
        from: point(5.0, 0.0),
        to: point(15.0, 0.0),
    };

    assert!(l1.intersection(&l2).is_none());
}

#[test]
fn intersection_out_of_range() {
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(1.0, 1.0),
    };

    let l2 = LineSegment {
        from: point(3.0, 0.0),
        to: point(3.0, 5.0),
    };

    assert!(l1.intersection(&l2).is_none());
    let p = l1.line_intersection(&l2.to_line());
    assert!(p.is_none());

    let l3 = LineSegment {
        from: point(0.0, 2.0),
        to: point(2.0, 2.0),
    };
    let p = l1.line_intersection(&l3.to_line());
    assert!(p.is_none());

    let l4 = LineSegment {
        from: point(0.5, -10.0),
        to: point(0.5, -9.0),
    };
    let p = l1.line_intersection(&l4.to_line()).unwrap();
    assert!(fuzzy_eq_point(p, point(0.5, 0.5), 1e-6));
}

#[test]
fn line_distance_to_point() {
    use crate::vector;

    let l1 = Line {
        point: point(2.0f32, 3.0),
        vector: vector(-1.5, 0.0),
    };

    let l2 = Line {
        point: point(3.0f32, 3.0),
        vector: vector(1.5, 1.5),
    };

    assert!(l1
        .signed_distance_to_point(&point(1.1, 4.0))
        .approx_eq(&-1.0));
    assert!(l1
        .signed_distance_to_point(&point(2.3, 2.0))
        .approx_eq(&1.0));

    assert!(l2
        .signed_distance_to_point(&point(1.0, 0.0))
        .approx_eq(&(-f32::sqrt(2.0) / 2.0)));
    assert!(l2
        .distance_to_point(&point(0.0, 1.0))
        .approx_eq(&(f32::sqrt(2.0) / 2.0)));
}

#[test]
fn segment_distance_to_point() {
    let s = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    assert!(s.distance_to_point(point(5.0, 3.0)).approx_eq(&3.0));
    assert!(s.distance_to_point(point(-3.0, 4.0)).approx_eq(&5.0));
    assert!(s.distance_to_point(point(13.0, -4.0)).approx_eq(&5.0));
    assert_eq!(s.closest_point(point(20.0, 20.0)), point(10.0, 0.0));

    let degenerate = LineSegment {
        from: point(1.0f32, 1.0),
        to: point(1.0, 1.0),
    };
    assert!(degenerate.distance_to_point(point(4.0, 5.0)).approx_eq(&5.0));
}

#[test]
fn normal_points_right() {
    // With the y axis pointing up, the right side of a segment going along
    // positive x is towards negative y.
    let s = LineSegment {
        from: point(0.0f64, 0.0),
        to: point(3.0, 0.0),
    };
    assert_eq!(s.normal(2.0), crate::vector(0.0, -2.0));

    let offset = s.offset(2.0);
    assert_eq!(offset.from, point(0.0, -2.0));
    assert_eq!(offset.to, point(3.0, -2.0));

    assert!(s.curvature_radius(0.5).is_nan());
    assert_eq!(Segment::normal(&s, 0.3, 1.0), Ok(crate::vector(0.0, -1.0)));
}

#[test]
fn offset_flattening() {
    let s = LineSegment {
        from: point(0.0f64, 0.0),
        to: point(0.0, 4.0),
    };

    let mut segments = std::vec::Vec::new();
    s.for_each_offset_flattened(1.0, 0.1, &mut |segment, range| {
        segments.push((*segment, range));
    });
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].0.from, point(1.0, 0.0));
    assert_eq!(segments[0].0.to, point(1.0, 4.0));
    assert_eq!(segments[0].1, 0.0..1.0);

    let empty = LineSegment {
        from: point(1.0f64, 1.0),
        to: point(1.0, 1.0),
    };
    let mut count = 0;
    empty.for_each_offset_flattened(1.0, 0.1, &mut |_, _| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn split() {
    let s = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 20.0),
    };
    let (a, b) = s.split(0.25);
    assert_eq!(a.to, point(2.5, 5.0));
    assert_eq!(b.from, a.to);
    assert_eq!(s.split_range(0.25..0.5).to, point(5.0, 10.0));
    assert_eq!(s.flip().flip(), s);
    assert!(s.length().approx_eq(&500.0f32.sqrt()));
}
