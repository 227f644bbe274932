//! # Arena Client Library
//!
//! Everything a player process runs: input capture, the connection to the
//! relay, the local simulation tick and drawing.
//!
//! ## Architecture Overview
//!
//! There is no authoritative server. Each client simulates its own player and
//! projectiles, decides whether its projectiles hit anyone, and broadcasts the
//! outcome through a relay that forwards frames verbatim to every other peer.
//! Remote players are whatever their owners last reported.
//!
//! ### Shared World
//! The [`shared::World`] sits behind one mutex. The frame loop locks it for a
//! tick; the listener task locks it for each merged frame. Rendering works
//! from a cloned snapshot so drawing never holds the lock.
//!
//! ### Visibility
//! After every tick the local player's visibility polygon is recomputed. The
//! renderer fills it as the lit floor and hides remote players outside it.
//!
//! ## Module Organization
//!
//! ### Session Module (`session`)
//! - TCP connection to the relay
//! - Outbound frame queue and writer task
//! - Inbound listener that merges updates and hits
//!
//! ### Input Module (`input`)
//! - Keyboard and mouse sampling
//! - Edge detection for debug toggles
//!
//! ### Rendering Module (`rendering`)
//! - Lit area, walls, players, projectiles
//! - Debug overlays for rays and hitboxes
//!
//! ### Game Module (`game`)
//! - Client configuration
//! - The per-frame loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::{self, ClientConfig};
//! use client::session::Session;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let config = ClientConfig::new("alice", "127.0.0.1:8080");
//! let session = Session::connect(runtime.handle(), &config.relay_addr, config.world())?;
//!
//! macroquad::Window::from_config(game::window_conf(), game::run(session, config));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod game;
pub mod input;
pub mod rendering;
pub mod session;

pub use game::ClientConfig;
pub use session::Session;
