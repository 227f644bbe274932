//! Simulation core shared by every player process.
//!
//! Nothing in this crate performs IO. The client feeds it input and inbound
//! frames; it hands back events to send and state to draw.

pub mod arena;
pub mod boundary;
pub mod combat;
pub mod constants;
pub mod entity;
pub mod geometry;
pub mod protocol;
pub mod visibility;
pub mod world;

pub use arena::Arena;
pub use boundary::{Boundary, Rect};
pub use combat::resolve_hits;
pub use constants::*;
pub use entity::{Player, PlayerInput, Projectile};
pub use geometry::{intersect, ray, Point, Segment};
pub use protocol::{decode, encode, Event, PlayerHit, PlayerUpdate, ProtocolError};
pub use visibility::VisibilityPolygon;
pub use world::{MergeOutcome, World};
