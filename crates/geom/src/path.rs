//! A minimal path representation to collect the output of the curve
//! conversions.
//!
//! Arcs are converted into sequences of cubic bézier curves and curves are
//! flattened into polylines, both of which are written through the
//! [`PathBuilder`] interface.

use crate::scalar::Scalar;
use crate::{CubicBezierSegment, Point};

use alloc::vec::Vec;

/// An element of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathEvent<S> {
    MoveTo(Point<S>),
    LineTo(Point<S>),
    CubicTo {
        ctrl1: Point<S>,
        ctrl2: Point<S>,
        to: Point<S>,
    },
}

impl<S: Copy> PathEvent<S> {
    /// The point at which the event ends.
    #[inline]
    pub fn to(&self) -> Point<S> {
        match *self {
            PathEvent::MoveTo(to) | PathEvent::LineTo(to) | PathEvent::CubicTo { to, .. } => to,
        }
    }
}

/// The path building interface.
pub trait PathBuilder<S> {
    /// Starts a new sub-path at `to`.
    fn move_to(&mut self, to: Point<S>);

    fn line_to(&mut self, to: Point<S>);

    fn cubic_bezier_to(&mut self, ctrl1: Point<S>, ctrl2: Point<S>, to: Point<S>);

    fn path_event(&mut self, event: PathEvent<S>) {
        match event {
            PathEvent::MoveTo(to) => self.move_to(to),
            PathEvent::LineTo(to) => self.line_to(to),
            PathEvent::CubicTo { ctrl1, ctrl2, to } => self.cubic_bezier_to(ctrl1, ctrl2, to),
        }
    }
}

/// A sequence of path events.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path<S> {
    events: Vec<PathEvent<S>>,
}

impl<S: Scalar> Path<S> {
    pub fn new() -> Self {
        Path { events: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Path {
            events: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn events(&self) -> &[PathEvent<S>] {
        &self.events
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<PathEvent<S>> {
        self.events.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The end point of the last event.
    pub fn last_point(&self) -> Option<Point<S>> {
        self.events.last().map(PathEvent::to)
    }

    /// The end points of every event, control points excluded.
    pub fn points(&self) -> Vec<Point<S>> {
        self.events.iter().map(PathEvent::to).collect()
    }

    /// Returns a copy of the path where cubic bézier curves are replaced with
    /// line segments, within `tolerance` of the curves.
    pub fn flattened(&self, tolerance: S) -> Path<S> {
        let mut output = Path::with_capacity(self.events.len());
        let mut current = Point::new(S::ZERO, S::ZERO);
        for event in &self.events {
            match *event {
                PathEvent::MoveTo(to) => output.move_to(to),
                PathEvent::LineTo(to) => output.line_to(to),
                PathEvent::CubicTo { ctrl1, ctrl2, to } => {
                    let curve = CubicBezierSegment {
                        from: current,
                        ctrl1,
                        ctrl2,
                        to,
                    };
                    curve.for_each_flattened(tolerance, &mut |segment| {
                        output.line_to(segment.to);
                    });
                }
            }
            current = event.to();
        }

        output
    }
}

impl<S: Scalar> PathBuilder<S> for Path<S> {
    fn move_to(&mut self, to: Point<S>) {
        self.events.push(PathEvent::MoveTo(to));
    }

    fn line_to(&mut self, to: Point<S>) {
        self.events.push(PathEvent::LineTo(to));
    }

    fn cubic_bezier_to(&mut self, ctrl1: Point<S>, ctrl2: Point<S>, to: Point<S>) {
        self.events.push(PathEvent::CubicTo { ctrl1, ctrl2, to });
    }
}

impl<'l, S> IntoIterator for &'l Path<S> {
    type Item = &'l PathEvent<S>;
    type IntoIter = core::slice::Iter<'l, PathEvent<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[test]
fn build_and_flatten() {
    use crate::point;

    let mut path = Path::new();
    assert!(path.is_empty());
    assert_eq!(path.last_point(), None);

    path.move_to(point(0.0f64, 0.0));
    path.line_to(point(10.0, 0.0));
    path.cubic_bezier_to(point(20.0, 0.0), point(20.0, 10.0), point(10.0, 10.0));
    assert_eq!(path.len(), 3);
    assert_eq!(path.last_point(), Some(point(10.0, 10.0)));
    assert_eq!(
        path.points(),
        std::vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]
    );

    let flattened = path.flattened(0.01);
    assert!(flattened.len() > 3);
    assert_eq!(flattened.events()[0], PathEvent::MoveTo(point(0.0, 0.0)));
    assert_eq!(flattened.events()[1], PathEvent::LineTo(point(10.0, 0.0)));
    assert_eq!(flattened.last_point(), Some(point(10.0, 10.0)));
    for event in &flattened {
        assert!(!matches!(event, PathEvent::CubicTo { .. }));
    }
}

#[test]
fn path_event_dispatch() {
    use crate::point;

    let mut a = Path::new();
    a.move_to(point(1.0f32, 2.0));
    a.cubic_bezier_to(point(1.0, 3.0), point(2.0, 3.0), point(2.0, 2.0));

    let mut b = Path::new();
    for event in a.iter() {
        b.path_event(*event);
    }

    assert_eq!(a, b);
}

#[cfg(feature = "serialization")]
#[test]
fn serializable() {
    fn assert_serde<T: serde::Serialize + for<'de> serde::Deserialize<'de>>() {}

    assert_serde::<Path<f32>>();
    assert_serde::<PathEvent<f64>>();
    assert_serde::<crate::CubicBezierSegment<f64>>();
    assert_serde::<crate::Arc<f64>>();
    assert_serde::<crate::FlattenOptions>();
    assert_serde::<crate::ArcLengthOptions>();
}
