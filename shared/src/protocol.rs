//! Relay wire format.
//!
//! Every frame is one line of JSON, `{"type": <tag>, "data": <payload>}`,
//! terminated by `\n`. Known tags are `player_update` and `player_hit`.

use crate::entity::Projectile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PLAYER_UPDATE: &str = "player_update";
pub const PLAYER_HIT: &str = "player_hit";

/// Full state of one player, sent every tick by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub health: i32,
    pub bullets: Vec<Projectile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHit {
    pub victim_id: String,
    pub damage: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    PlayerUpdate(PlayerUpdate),
    PlayerHit(PlayerHit),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event type {0:?}")]
    UnknownEvent(String),
    #[error("frame contains an embedded newline")]
    EmbeddedNewline,
}

/// Outer shape of a frame before the payload is interpreted.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

/// Serializes an event into a single frame, without the trailing newline.
pub fn encode(event: &Event) -> Result<String, ProtocolError> {
    let frame = serde_json::to_string(event)?;
    if frame.contains('\n') {
        return Err(ProtocolError::EmbeddedNewline);
    }
    Ok(frame)
}

/// Parses one frame. Surrounding whitespace, including the line
/// terminator, is ignored.
pub fn decode(frame: &str) -> Result<Event, ProtocolError> {
    let frame = frame.trim();
    if frame.contains('\n') {
        return Err(ProtocolError::EmbeddedNewline);
    }

    let envelope: Envelope = serde_json::from_str(frame)?;
    match envelope.kind.as_str() {
        PLAYER_UPDATE => Ok(Event::PlayerUpdate(serde_json::from_value(envelope.data)?)),
        PLAYER_HIT => Ok(Event::PlayerHit(serde_json::from_value(envelope.data)?)),
        _ => Err(ProtocolError::UnknownEvent(envelope.kind)),
    }
}
