//! Intersections between line segments, infinite lines and circles.
//!
//! The free functions work on raw points and report "no intersection" with
//! `None`. [`intersections`] dispatches on pairs of [`Shape`] and collects the
//! points in a fixed capacity list.

use crate::scalar::Scalar;
use crate::{vector, Line, LineSegment, Point};

use arrayvec::ArrayVec;

/// A circle defined by its center and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Circle<S> {
    pub center: Point<S>,
    pub radius: S,
}

/// Shapes supported by [`intersections`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Shape<S> {
    LineSegment(LineSegment<S>),
    Line(Line<S>),
    Circle(Circle<S>),
}

/// Intersection of the segments `a0 a1` and `b0 b1`.
///
/// Returns `None` when the segments are parallel (including when they
/// overlap) or when the intersection of their lines is not on both segments.
/// End points are part of the segments.
pub fn line_segments<S: Scalar>(a0: Point<S>, a1: Point<S>, b0: Point<S>, b1: Point<S>) -> Option<Point<S>> {
    let da = a1 - a0;
    let db = b1 - b0;
    let det = da.cross(db);
    if det.abs() < S::EPSILON {
        return None;
    }

    let v = a0 - b0;
    let ta = db.cross(v) / det;
    let tb = da.cross(v) / det;
    if ta < S::ZERO || ta > S::ONE || tb < S::ZERO || tb > S::ONE {
        return None;
    }

    Some(a0.lerp(a1, ta))
}

/// Intersections of the infinite line through `l0` and `l1` with a circle.
///
/// Returns `None` when the line misses the circle or when `l0` and `l1` are
/// the same point. A tangent line produces the same point twice.
///
/// The order of the two points depends on the direction of the line: when it
/// points towards positive y (or along the x axis) the first point is the
/// furthest along the line, otherwise it is the closest.
pub fn line_circle<S: Scalar>(l0: Point<S>, l1: Point<S>, center: Point<S>, radius: S) -> Option<(Point<S>, Point<S>)> {
    let direction = l1 - l0;
    let length = direction.length();
    if length == S::ZERO {
        return None;
    }
    let d = direction / length;

    // Signed distance between the line and the center.
    let distance = (l0 - center).cross(d);
    let discriminant = radius * radius - distance * distance;
    if discriminant < S::ZERO {
        return None;
    }
    let discriminant = discriminant.sqrt();

    let ax = distance * d.y;
    let ay = -distance * d.x;
    let mut bx = d.x * discriminant;
    if d.y < S::ZERO {
        bx = -bx;
    }
    let by = d.y.abs() * discriminant;

    Some((center + vector(ax + bx, ay + by), center + vector(ax - bx, ay - by)))
}

/// Intersections of two circles.
///
/// Returns `None` when the circles are apart, when one is inside the other
/// without touching it, or when they are concentric. Tangent circles produce
/// the same point twice.
pub fn circles<S: Scalar>(c0: Point<S>, r0: S, c1: Point<S>, r1: S) -> Option<(Point<S>, Point<S>)> {
    let r = (c0 - c1).length();
    if r == S::ZERO || r < (r0 - r1).abs() || r0 + r1 < r {
        return None;
    }

    let r2 = r * r;
    let k = r0 * r0 - r1 * r1;
    let b = S::HALF * k / r2;
    let radicand = S::TWO * (r0 * r0 + r1 * r1) / r2 - k * k / (r2 * r2) - S::ONE;
    // Rounding can make the radicand slightly negative for tangent circles.
    let c = S::HALF * radicand.max(S::ZERO).sqrt();

    let mid = c0.lerp(c1, S::HALF);
    let along = (c1 - c0) * b;
    let across = vector(c1.y - c0.y, c0.x - c1.x) * c;

    Some((mid + along + across, mid + along - across))
}

/// Computes the intersection points of two shapes.
///
/// Coincident points (tangents) are only reported once. Parallel lines and
/// overlapping segments have no intersection.
pub fn intersections<S: Scalar>(a: &Shape<S>, b: &Shape<S>) -> ArrayVec<Point<S>, 2> {
    let mut result = ArrayVec::new();

    match (a, b) {
        (Shape::LineSegment(a), Shape::LineSegment(b)) => {
            push_point(&mut result, a.intersection(b));
        }
        (Shape::LineSegment(segment), Shape::Line(line)) | (Shape::Line(line), Shape::LineSegment(segment)) => {
            push_point(&mut result, segment.line_intersection(line));
        }
        (Shape::Line(a), Shape::Line(b)) => {
            push_point(&mut result, a.intersection(b));
        }
        (Shape::LineSegment(segment), Shape::Circle(circle))
        | (Shape::Circle(circle), Shape::LineSegment(segment)) => {
            if let Some((p0, p1)) = line_circle(segment.from, segment.to, circle.center, circle.radius) {
                let on_segment = |p: Point<S>| {
                    let v = segment.to_vector();
                    let t = (p - segment.from).dot(v) / v.square_length();
                    t >= S::ZERO && t <= S::ONE
                };
                if on_segment(p0) {
                    push_point(&mut result, Some(p0));
                }
                if on_segment(p1) {
                    push_point(&mut result, Some(p1));
                }
            }
        }
        (Shape::Line(line), Shape::Circle(circle)) | (Shape::Circle(circle), Shape::Line(line)) => {
            if let Some((p0, p1)) = line_circle(line.point, line.point + line.vector, circle.center, circle.radius) {
                push_point(&mut result, Some(p0));
                push_point(&mut result, Some(p1));
            }
        }
        (Shape::Circle(a), Shape::Circle(b)) => {
            if let Some((p0, p1)) = circles(a.center, a.radius, b.center, b.radius) {
                push_point(&mut result, Some(p0));
                push_point(&mut result, Some(p1));
            }
        }
    }

    result
}

fn push_point<S: Scalar>(points: &mut ArrayVec<Point<S>, 2>, p: Option<Point<S>>) {
    if let Some(p) = p {
        if !points.contains(&p) {
            points.push(p);
        }
    }
}

#[cfg(test)]
fn assert_point_eq(a: Point<f64>, b: Point<f64>) {
    assert!((a - b).length() < 1e-9, "{:?} != {:?}", a, b);
}

#[test]
fn segments() {
    use crate::point;

    let p = line_segments(point(0.0, 0.0), point(2.0, 2.0), point(0.0, 2.0), point(2.0, 0.0)).unwrap();
    assert_point_eq(p, point(1.0, 1.0));

    // Touching at the end points.
    let p = line_segments(point(0.0, 0.0), point(1.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)).unwrap();
    assert_point_eq(p, point(1.0, 0.0));

    // Parallel.
    assert!(line_segments(point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)).is_none());

    // The lines intersect outside of the second segment.
    assert!(line_segments(point(0.0, 0.0), point(2.0, 2.0), point(0.0, 2.0), point(0.5, 1.5)).is_none());
}

#[test]
fn line_through_circle() {
    use crate::point;

    let (p0, p1) = line_circle(point(0.0, 0.0), point(1.0, 0.0), point(0.0, 0.0), 1.0).unwrap();
    assert_point_eq(p0, point(1.0, 0.0));
    assert_point_eq(p1, point(-1.0, 0.0));

    // Pointing down, the closest point comes first.
    let (p0, p1) = line_circle(point(2.0, 5.0), point(2.0, 4.0), point(2.0, 0.0), 2.0).unwrap();
    assert_point_eq(p0, point(2.0, 2.0));
    assert_point_eq(p1, point(2.0, -2.0));

    // Pointing up, the furthest point comes first.
    let (p0, p1) = line_circle(point(2.0, -5.0), point(2.0, -4.0), point(2.0, 0.0), 2.0).unwrap();
    assert_point_eq(p0, point(2.0, 2.0));
    assert_point_eq(p1, point(2.0, -2.0));

    // Tangent.
    let (p0, p1) = line_circle(point(-3.0, 1.0), point(3.0, 1.0), point(0.0, 0.0), 1.0).unwrap();
    assert_point_eq(p0, point(0.0, 1.0));
    assert_eq!(p0, p1);

    // Miss.
    assert!(line_circle(point(-3.0, 1.5), point(3.0, 1.5), point(0.0, 0.0), 1.0).is_none());
    // Not a line.
    assert!(line_circle(point(0.5, 0.5), point(0.5, 0.5), point(0.0, 0.0), 1.0).is_none());
}

#[test]
fn two_circles() {
    use crate::point;

    let (p0, p1) = circles(point(0.0, 0.0), 1.0, point(1.0, 0.0), 1.0).unwrap();
    let h = 3.0f64.sqrt() / 2.0;
    assert_point_eq(p0, point(0.5, -h));
    assert_point_eq(p1, point(0.5, h));

    // Externally tangent.
    let (p0, p1) = circles(point(0.0, 0.0), 1.0, point(3.0, 0.0), 2.0).unwrap();
    assert_point_eq(p0, point(1.0, 0.0));
    assert_point_eq(p1, point(1.0, 0.0));

    // Apart.
    assert!(circles(point(0.0, 0.0), 1.0, point(5.0, 0.0), 1.0).is_none());
    // Nested.
    assert!(circles(point(0.0, 0.0), 5.0, point(1.0, 0.0), 1.0).is_none());
    // Concentric.
    assert!(circles(point(0.0, 0.0), 1.0, point(0.0, 0.0), 1.0).is_none());
}

#[test]
fn shapes() {
    use crate::point;

    let circle = Shape::Circle(Circle {
        center: point(0.0, 0.0),
        radius: 1.0,
    });
    let segment = Shape::LineSegment(LineSegment {
        from: point(0.0, 0.0),
        to: point(5.0, 0.0),
    });
    let line = Shape::Line(Line {
        point: point(0.0, 0.0),
        vector: vector(1.0, 0.0),
    });
    let vertical = Shape::Line(Line {
        point: point(3.0, -1.0),
        vector: vector(0.0, 2.0),
    });

    // The segment starts inside of the circle.
    let points = intersections(&segment, &circle);
    assert_eq!(points.len(), 1);
    assert_point_eq(points[0], point(1.0, 0.0));

    let points = intersections(&circle, &line);
    assert_eq!(points.len(), 2);

    let points = intersections(&segment, &vertical);
    assert_eq!(points.len(), 1);
    assert_point_eq(points[0], point(3.0, 0.0));

    let points = intersections(&line, &vertical);
    assert_eq!(points.len(), 1);
    assert_point_eq(points[0], point(3.0, 0.0));

    // Parallel lines.
    assert!(intersections(&line, &segment).is_empty());

    // Tangent circles produce a single point.
    let other = Shape::Circle(Circle {
        center: point(2.0, 0.0),
        radius: 1.0,
    });
    let points = intersections(&circle, &other);
    assert_eq!(points.len(), 1);
    assert_point_eq(points[0], point(1.0, 0.0));
}
