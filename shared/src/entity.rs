//! Players and projectiles, and their local simulation rules.

use crate::arena::Arena;
use crate::boundary::Boundary;
use crate::constants::{
    HITBOX_HEIGHT, HITBOX_WIDTH, MAX_HEALTH, PLAYER_RADIUS, PLAYER_SPEED, PLAYER_SPRINT_FACTOR,
    PROJECTILE_MAX_AGE, PROJECTILE_SPEED, SHOT_COOLDOWN,
};
use crate::geometry::{Point, Segment};
use crate::protocol::PlayerUpdate;
use serde::{Deserialize, Serialize};

/// Input sampled once per tick by the rendering/input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub fire: bool,
    /// Pointer position in playfield coordinates.
    pub aim: Point,
}

impl PlayerInput {
    /// Axis-aligned velocity for this tick.
    pub fn velocity(&self) -> (f64, f64) {
        let speed = if self.sprint {
            PLAYER_SPEED * PLAYER_SPRINT_FACTOR
        } else {
            PLAYER_SPEED
        };

        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.up {
            dy -= speed;
        }
        if self.down {
            dy += speed;
        }
        if self.left {
            dx -= speed;
        }
        if self.right {
            dx += speed;
        }
        (dx, dy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner_id: String,
    pub x: f64,
    pub y: f64,
    /// Position one tick ahead along the trajectory.
    pub end_x: f64,
    pub end_y: f64,
    pub direction: f64,
    pub velocity: f64,
    /// Ticks since creation.
    #[serde(default)]
    pub age: u32,
}

impl Projectile {
    pub fn new(owner_id: &str, origin: Point, direction: f64, velocity: f64) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            x: origin.x,
            y: origin.y,
            end_x: origin.x + direction.cos() * velocity,
            end_y: origin.y + direction.sin() * velocity,
            direction,
            velocity,
            age: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn advance(&mut self) {
        let dx = self.direction.cos() * self.velocity;
        let dy = self.direction.sin() * self.velocity;
        self.x += dx;
        self.y += dy;
        self.end_x += dx;
        self.end_y += dy;
        self.age += 1;
    }

    /// Segment tested against hitboxes: current position to the
    /// forward-projected end point.
    pub fn path(&self) -> Segment {
        Segment {
            p1: self.position(),
            p2: Point::new(self.end_x, self.end_y),
        }
    }

    pub fn is_expired(&self, width: f64, height: f64) -> bool {
        self.age > PROJECTILE_MAX_AGE
            || self.x < 0.0
            || self.x > width
            || self.y < 0.0
            || self.y > height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub health: i32,
    pub projectiles: Vec<Projectile>,
    /// Seconds timestamp of the last shot; never leaves this process.
    last_shot: Option<f64>,
}

impl Player {
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            angle: 0.0,
            health: MAX_HEALTH,
            projectiles: Vec::new(),
            last_shot: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_downed(&self) -> bool {
        self.health <= 0
    }

    /// Rectangle centred on the player, smaller than the drawn sprite.
    pub fn hitbox(&self) -> Boundary {
        Boundary::rect(
            self.x - HITBOX_WIDTH / 2.0,
            self.y - HITBOX_HEIGHT / 2.0,
            HITBOX_WIDTH,
            HITBOX_HEIGHT,
        )
    }

    /// Runs one local tick: movement, facing, firing and projectile
    /// advancement. `now` is in seconds and `recoil` is only consumed when
    /// a shot is actually fired. Returns whether a shot was fired.
    pub fn step(
        &mut self,
        input: &PlayerInput,
        arena: &Arena,
        now: f64,
        recoil: impl FnOnce() -> f64,
    ) -> bool {
        let mut fired = false;

        if !self.is_downed() {
            self.move_by(input.velocity(), arena);
            self.angle = (input.aim.y - self.y).atan2(input.aim.x - self.x);

            if input.fire && self.cooldown_elapsed(now) {
                self.fire(recoil());
                self.last_shot = Some(now);
                fired = true;
            }
        }

        self.advance_projectiles(arena.width(), arena.height());
        fired
    }

    /// Move first, test, undo, one axis at a time.
    fn move_by(&mut self, (dx, dy): (f64, f64), arena: &Arena) {
        self.x += dx;
        if arena.blocks(self.x, self.y, PLAYER_RADIUS) {
            self.x -= dx;
        }

        self.y += dy;
        if arena.blocks(self.x, self.y, PLAYER_RADIUS) {
            self.y -= dy;
        }
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        match self.last_shot {
            Some(last) => now - last > SHOT_COOLDOWN,
            None => true,
        }
    }

    /// Spawns a projectile at the player's position along the facing angle
    /// perturbed once by `recoil`.
    pub fn fire(&mut self, recoil: f64) {
        let projectile = Projectile::new(
            &self.id,
            self.position(),
            self.angle + recoil,
            PROJECTILE_SPEED,
        );
        self.projectiles.push(projectile);
    }

    pub fn advance_projectiles(&mut self, width: f64, height: f64) {
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        self.projectiles.retain(|p| !p.is_expired(width, height));
    }

    /// Subtracts `damage`, keeping health within `[0, MAX_HEALTH]`.
    /// Negative damage is treated as zero.
    pub fn apply_damage(&mut self, damage: i32) {
        self.health = self
            .health
            .saturating_sub(damage.max(0))
            .clamp(0, MAX_HEALTH);
    }

    pub fn to_update(&self) -> PlayerUpdate {
        PlayerUpdate {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            angle: self.angle,
            health: self.health,
            bullets: self.projectiles.clone(),
        }
    }

    /// Replaces every transmitted field with the payload's.
    pub fn apply_update(&mut self, update: PlayerUpdate) {
        self.x = update.x;
        self.y = update.y;
        self.angle = update.angle;
        self.health = update.health.clamp(0, MAX_HEALTH);
        self.projectiles = update.bullets;
    }
}
