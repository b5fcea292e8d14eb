//! Geometry kernel
//!
//! Points, line segments and the pure predicates the rest of the pipeline
//! is built on. Rectangle predicates live next to [`Room`](crate::Room).

use serde::{Deserialize, Serialize};

/// A point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Point::new(self.x / len, self.y / len))
    }
}

impl core::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl core::ops::Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl core::ops::Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// A straight line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    /// Create a segment from raw coordinates
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a segment between two points
    pub const fn between(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        distance(self.start(), self.end())
    }
}

/// Euclidean distance between two points
pub fn distance(p: Point, q: Point) -> f64 {
    (q.x - p.x).hypot(q.y - p.y)
}

/// Parametric segment intersection test.
///
/// Returns true iff both parametric coordinates fall in `[0, 1]`, so segments
/// that touch at an endpoint intersect. A zero denominator (parallel,
/// collinear or zero-length segments) is always reported as no intersection,
/// including collinear segments that overlap.
pub fn segments_intersect(s1: &Segment, s2: &Segment) -> bool {
    let denom = (s2.y2 - s2.y1) * (s1.x2 - s1.x1) - (s2.x2 - s2.x1) * (s1.y2 - s1.y1);
    if denom == 0.0 || !denom.is_finite() {
        tracing::trace!(?s1, ?s2, "zero denominator in segment intersection");
        return false;
    }

    let ua = ((s2.x2 - s2.x1) * (s1.y1 - s2.y1) - (s2.y2 - s2.y1) * (s1.x1 - s2.x1)) / denom;
    let ub = ((s1.x2 - s1.x1) * (s1.y1 - s2.y1) - (s1.y2 - s1.y1) * (s1.x1 - s2.x1)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}
