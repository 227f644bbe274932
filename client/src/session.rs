//! The player's connection to the relay and the lock around its world.
//!
//! One `Session` exists per process. The frame loop calls [`Session::tick`]
//! and [`Session::snapshot`]; a background task runs [`listen`] and merges
//! inbound frames. Both sides take the same mutex, each for one tick or one
//! frame at a time.

use log::{debug, error, info, warn};
use rand::Rng;
use shared::{decode, encode, PlayerInput, World};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

pub struct Session {
    world: Arc<Mutex<World>>,
    outbound: mpsc::UnboundedSender<String>,
}

impl Session {
    pub fn new(world: Arc<Mutex<World>>, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { world, outbound }
    }

    /// Connects to the relay and starts the reader and writer tasks on
    /// `runtime`. Failing to connect is fatal to the caller.
    pub fn connect(
        runtime: &Handle,
        relay_addr: &str,
        world: World,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = runtime.block_on(TcpStream::connect(relay_addr))?;
        stream.set_nodelay(true)?;
        info!("Connected to relay at {}", relay_addr);

        let (read_half, write_half) = stream.into_split();
        let world = Arc::new(Mutex::new(world));
        let (outbound, frames) = mpsc::unbounded_channel();

        runtime.spawn(write_frames(write_half, frames));
        runtime.spawn(listen(BufReader::new(read_half), Arc::clone(&world)));

        Ok(Self::new(world, outbound))
    }

    pub fn shared_world(&self) -> Arc<Mutex<World>> {
        Arc::clone(&self.world)
    }

    /// Advances the local simulation one tick and queues the resulting
    /// events for the relay, hits first and our own state last.
    pub fn tick<R: Rng>(&self, input: &PlayerInput, now: f64, rng: &mut R) {
        let mut world = lock(&self.world);
        for event in world.tick(input, now, rng) {
            match encode(&event) {
                Ok(frame) => {
                    if self.outbound.send(frame).is_err() {
                        debug!("Writer task has stopped, dropping frame");
                    }
                }
                Err(e) => error!("Error encoding event: {}", e),
            }
        }
    }

    /// Consistent copy of the world for drawing outside the lock.
    pub fn snapshot(&self) -> World {
        lock(&self.world).clone()
    }
}

fn lock(world: &Mutex<World>) -> MutexGuard<'_, World> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads frames until the stream ends or fails, merging each into `world`.
/// Malformed frames are logged and skipped.
pub async fn listen<R>(mut reader: R, world: Arc<Mutex<World>>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("Relay closed the connection");
                return;
            }
            Ok(_) => {
                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Discarding frame that is not UTF-8: {}", e);
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match decode(line) {
                    Ok(event) => {
                        let outcome = lock(&world).apply(event);
                        debug!("Merged frame: {:?}", outcome);
                    }
                    Err(e) => warn!("Discarding frame: {}", e),
                }
            }
            Err(e) => {
                warn!("Connection lost: {}", e);
                return;
            }
        }
    }
}

/// Writes queued frames, one per line. A failed write is logged and the
/// next frame is still attempted.
pub async fn write_frames<W>(mut writer: W, mut frames: mpsc::UnboundedReceiver<String>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut frame) = frames.recv().await {
        frame.push('\n');
        if let Err(e) = writer.write_all(frame.as_bytes()).await {
            error!("Error sending event: {}", e);
        }
    }
}
