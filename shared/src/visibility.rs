//! Occlusion-aware visibility from a single viewpoint.
//!
//! For every obstacle vertex two probe rays are cast just either side of it
//! (`angle ± PROBE_OFFSET`), each clipped at the first surface it meets. The
//! clipped rays sorted by angle describe a star-shaped polygon around the
//! viewpoint; consecutive pairs, including the last/first wraparound, form
//! the triangle fan used as an occlusion mask.
//!
//! Cost is O(V·S) for V obstacle vertices and S obstacle segments, which is
//! fine for maps with tens of obstacles.

use crate::boundary::Boundary;
use crate::constants::PROBE_OFFSET;
use crate::geometry::{intersect, ray, Point, Segment};
use log::trace;

#[derive(Debug, Clone, Default)]
pub struct VisibilityPolygon {
    origin: Point,
    /// Viewpoint -> nearest hit, ascending by angle.
    rays: Vec<Segment>,
}

impl VisibilityPolygon {
    pub fn compute(origin: Point, occluders: &[Boundary], ray_length: f64) -> Self {
        let mut rays = Vec::new();
        let mut dropped = 0usize;

        for vertex in occluders.iter().flat_map(Boundary::vertices) {
            let angle = (vertex.y - origin.y).atan2(vertex.x - origin.x);

            for offset in [-PROBE_OFFSET, PROBE_OFFSET] {
                let probe = ray(origin, ray_length, angle + offset);
                match nearest_hit(origin, &probe, occluders) {
                    Some(hit) => rays.push(Segment { p1: origin, p2: hit }),
                    // Only possible when the map has no closed outer wall.
                    None => dropped += 1,
                }
            }
        }

        if dropped > 0 {
            trace!("{} probe rays hit nothing from {:?}", dropped, origin);
        }

        rays.sort_by(|a, b| a.angle().total_cmp(&b.angle()));
        Self { origin, rays }
    }

    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Outer vertices of the fan in angular order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.rays.iter().map(|r| r.p2)
    }

    /// Fan triangles `(origin, ray[i], ray[i + 1 mod n])`.
    pub fn triangles(&self) -> impl Iterator<Item = [Point; 3]> + '_ {
        let n = self.rays.len();
        (0..n).map(move |i| [self.origin, self.rays[i].p2, self.rays[(i + 1) % n].p2])
    }

    /// Whether `point` lies inside the visible region.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.rays.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.rays[i].p2;
            let b = self.rays[j].p2;
            if (a.y > point.y) != (b.y > point.y) {
                let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

fn nearest_hit(origin: Point, probe: &Segment, occluders: &[Boundary]) -> Option<Point> {
    occluders
        .iter()
        .flat_map(|b| b.segments())
        .filter_map(|wall| intersect(probe, wall))
        .min_by(|a, b| {
            origin
                .distance_squared(*a)
                .total_cmp(&origin.distance_squared(*b))
        })
}
