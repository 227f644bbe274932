//! # Relay Server Library
//!
//! The relay is the only shared process in a match, and it is deliberately
//! dumb: it accepts TCP connections and copies every newline-terminated
//! frame it reads from one peer to all the others. It never parses a frame
//! and holds no game state, so every player process simulates its own
//! world and reconciles with its peers from the frames they send.
//!
//! ## Module Organization
//!
//! ### Peers Module (`peers`)
//! Registry of connected peers:
//! - Relay-assigned peer IDs
//! - One outbound frame queue per peer
//! - Fan-out that skips the sender and tolerates dead queues
//!
//! ### Relay Module (`relay`)
//! Socket handling:
//! - Accept loop on the listening port
//! - One reader task per peer, splitting the byte stream into lines
//! - One writer task per peer, draining its queue into the socket
//!
//! ## Failure Model
//!
//! Failing to bind the listening port is fatal. A read error or EOF on a
//! peer removes that peer without notice to anyone. A write error stops
//! only that peer's writer. There is no reconnection or backpressure.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     server::relay::run("0.0.0.0:8080").await
//! }
//! ```

pub mod peers;
pub mod relay;
