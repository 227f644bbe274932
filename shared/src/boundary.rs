//! Polyline obstacles and hitboxes.

use crate::geometry::{Point, Segment};

/// Axis-aligned rectangle, `(x, y)` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Circle/rectangle overlap: clamp the centre onto the rectangle and
    /// compare the squared distance against the squared radius.
    pub fn circle_intersects(&self, cx: f64, cy: f64, radius: f64) -> bool {
        let closest_x = cx.clamp(self.x, self.x + self.width);
        let closest_y = cy.clamp(self.y, self.y + self.height);
        let dx = cx - closest_x;
        let dy = cy - closest_y;
        dx * dx + dy * dy < radius * radius
    }
}

/// Ordered chain of segments, open or closed. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    segments: Vec<Segment>,
}

impl Boundary {
    /// Returns `None` for an empty segment list.
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Connects consecutive points, skipping repeats. Needs at least two
    /// distinct points.
    pub fn polyline(points: &[Point]) -> Option<Self> {
        let segments = points
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();
        Self::from_segments(segments)
    }

    /// Closed rectangle walked left side, bottom, right side, top.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let top_left = Point::new(x, y);
        let bottom_left = Point::new(x, y + height);
        let bottom_right = Point::new(x + width, y + height);
        let top_right = Point::new(x + width, y);
        Self {
            segments: vec![
                Segment::new(top_left, bottom_left),
                Segment::new(bottom_left, bottom_right),
                Segment::new(bottom_right, top_right),
                Segment::new(top_right, top_left),
            ],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The end point of every segment, plus the start of the first segment
    /// when the chain is open. A closed chain yields no duplicate of its
    /// closing vertex.
    pub fn vertices(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.segments.iter().map(|s| s.p2).collect();
        let start = self.segments[0].p1;
        if points.last() != Some(&start) {
            points.push(start);
        }
        points
    }

    pub fn bounding_rect(&self) -> Rect {
        let mut min = self.segments[0].p1;
        let mut max = min;
        for p in self.segments.iter().flat_map(|s| [s.p1, s.p2]) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}
