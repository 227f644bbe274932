//! Line-segment algebra for the visibility and hit-detection kernels.

use serde::{Deserialize, Serialize};

/// Immutable 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Ordered pair of points. Direction matters for [`Segment::angle`] only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    /// A zero-length segment is allowed and never intersects anything.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.p1.x + self.p2.x) / 2.0, (self.p1.y + self.p2.y) / 2.0)
    }

    /// Direction of `p1 -> p2` in radians. Only meant as a sort key.
    pub fn angle(&self) -> f64 {
        (self.p2.y - self.p1.y).atan2(self.p2.x - self.p1.x)
    }
}

/// Bounded probe from `origin` along `angle`.
pub fn ray(origin: Point, length: f64, angle: f64) -> Segment {
    Segment {
        p1: origin,
        p2: Point::new(
            origin.x + length * angle.cos(),
            origin.y + length * angle.sin(),
        ),
    }
}

/// Intersection point of two segments, if any.
///
/// Parallel and collinear pairs never intersect, even when they overlap.
/// Both parametric offsets must lie in `[0, 1]`; touching endpoints count.
pub fn intersect(a: &Segment, b: &Segment) -> Option<Point> {
    let denom = (a.p1.x - a.p2.x) * (b.p1.y - b.p2.y) - (a.p1.y - a.p2.y) * (b.p1.x - b.p2.x);
    if denom == 0.0 {
        return None;
    }

    let t_num = (a.p1.x - b.p1.x) * (b.p1.y - b.p2.y) - (a.p1.y - b.p1.y) * (b.p1.x - b.p2.x);
    let t = t_num / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let u_num = -((a.p1.x - a.p2.x) * (a.p1.y - b.p1.y) - (a.p1.y - a.p2.y) * (a.p1.x - b.p1.x));
    let u = u_num / denom;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Point::new(
        a.p1.x + t * (a.p2.x - a.p1.x),
        a.p1.y + t * (a.p2.y - a.p1.y),
    ))
}
