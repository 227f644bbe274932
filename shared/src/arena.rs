//! Static map description: the outer wall plus interior obstacles.

use crate::boundary::{Boundary, Rect};
use crate::constants::{PLAYFIELD_PADDING, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::geometry::Point;

/// Obstacle set for one session. Built at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Arena {
    width: f64,
    height: f64,
    /// Outer wall first, then interior obstacles.
    occluders: Vec<Boundary>,
    obstacle_rects: Vec<Rect>,
    walkable: Rect,
}

impl Arena {
    /// The outer wall is a closed rectangle inset by `padding` so that every
    /// probe ray terminates on some surface.
    pub fn new(width: f64, height: f64, padding: f64, obstacles: Vec<Boundary>) -> Self {
        let walkable = Rect::new(
            padding,
            padding,
            width - 2.0 * padding,
            height - 2.0 * padding,
        );
        let outer = Boundary::rect(walkable.x, walkable.y, walkable.width, walkable.height);
        let obstacle_rects = obstacles.iter().map(Boundary::bounding_rect).collect();

        let mut occluders = Vec::with_capacity(obstacles.len() + 1);
        occluders.push(outer);
        occluders.extend(obstacles);

        Self {
            width,
            height,
            occluders,
            obstacle_rects,
            walkable,
        }
    }

    /// The default map: a box below the centre and two blocks on the left.
    pub fn standard() -> Self {
        let obstacles = vec![
            Boundary::rect(SCREEN_WIDTH / 2.0 - 50.0, SCREEN_HEIGHT / 2.0 + 50.0, 100.0, 100.0),
            Boundary::rect(200.0, 150.0, 100.0, 200.0),
            Boundary::rect(500.0, 300.0, 150.0, 100.0),
        ];
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT, PLAYFIELD_PADDING, obstacles)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn occluders(&self) -> &[Boundary] {
        &self.occluders
    }

    /// Long enough to cross the whole playfield from any point in it.
    pub fn ray_length(&self) -> f64 {
        self.width.hypot(self.height)
    }

    pub fn spawn_point(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a circle at `(x, y)` overlaps an obstacle or pokes through
    /// the outer wall.
    pub fn blocks(&self, x: f64, y: f64, radius: f64) -> bool {
        let w = &self.walkable;
        let outside = x - radius < w.x
            || x + radius > w.x + w.width
            || y - radius < w.y
            || y + radius > w.y + w.height;
        outside
            || self
                .obstacle_rects
                .iter()
                .any(|r| r.circle_intersects(x, y, radius))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::standard()
    }
}
