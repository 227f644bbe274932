//! Tuning values shared by every peer.
//!
//! Distances are in playfield pixels, speeds in pixels per simulation tick.

pub const SCREEN_WIDTH: f64 = 1600.0;
pub const SCREEN_HEIGHT: f64 = 900.0;
/// Inset of the outer wall from the screen edge.
pub const PLAYFIELD_PADDING: f64 = 20.0;

pub const MAX_HEALTH: i32 = 100;
pub const PLAYER_RADIUS: f64 = 10.0;
pub const PLAYER_SPEED: f64 = 1.0;
pub const PLAYER_SPRINT_FACTOR: f64 = 1.7;

/// Hitbox is narrower than the drawn player.
pub const HITBOX_WIDTH: f64 = 20.0;
pub const HITBOX_HEIGHT: f64 = 20.0;

pub const PROJECTILE_SPEED: f64 = 80.0;
pub const PROJECTILE_MAX_AGE: u32 = 60;
/// Seconds between two shots.
pub const SHOT_COOLDOWN: f64 = 0.2;
/// Half-width of the uniform recoil perturbation, in radians.
pub const RECOIL_SPREAD: f64 = 0.05;
pub const WEAPON_DAMAGE: i32 = 20;

/// Angular offset of the two probe rays cast around each obstacle vertex.
pub const PROBE_OFFSET: f64 = 0.001;
