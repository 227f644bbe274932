//! TCP relay: accepts peers and rebroadcasts every line it receives to all
//! other peers, byte for byte.

use crate::peers::{Frame, PeerManager};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};

/// Binds `addr` and relays until the process exits. Failing to bind is the
/// only error.
pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Relay listening on {}", listener.local_addr()?);

    let peers = Arc::new(RwLock::new(PeerManager::new()));
    serve(listener, peers).await;
    Ok(())
}

/// Accept loop. Each peer gets its own reader and writer task.
pub async fn serve(listener: TcpListener, peers: Arc<RwLock<PeerManager>>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tokio::spawn(handle_peer(stream, addr, Arc::clone(&peers)));
            }
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Reads frames from one peer until its socket fails or closes, handing
/// each to every other peer. The peer is dropped silently afterwards.
pub async fn handle_peer(
    stream: TcpStream,
    addr: SocketAddr,
    peers: Arc<RwLock<PeerManager>>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Could not disable Nagle for {}: {}", addr, e);
    }
    let (read_half, write_half) = stream.into_split();
    let (sender, receiver) = mpsc::unbounded_channel();

    let peer_id = peers.write().await.add_peer(addr, sender);
    tokio::spawn(forward_frames(peer_id, write_half, receiver));

    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                info!("Peer {} closed the connection", peer_id);
                break;
            }
            Ok(_) => {
                // a final frame cut off by EOF still goes out as a full line
                if line.last() != Some(&b'\n') {
                    line.push(b'\n');
                }
                let frame: Frame = Arc::from(line.as_slice());
                let delivered = peers.write().await.broadcast(peer_id, frame);
                debug!("Peer {}: {} bytes to {} peers", peer_id, line.len(), delivered);
            }
            Err(e) => {
                warn!("Read from peer {} failed: {}", peer_id, e);
                break;
            }
        }
    }

    peers.write().await.remove_peer(&peer_id);
}

/// Drains a peer's queue into its socket. Stops on the first write error;
/// other peers are unaffected.
pub async fn forward_frames<W>(
    peer_id: u32,
    mut writer: W,
    mut receiver: mpsc::UnboundedReceiver<Frame>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = receiver.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            error!("Failed to send frame to peer {}: {}", peer_id, e);
            return;
        }
    }
    debug!("Writer for peer {} finished", peer_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::time::{sleep, timeout};

    async fn start_relay() -> (SocketAddr, Arc<RwLock<PeerManager>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let peers = Arc::new(RwLock::new(PeerManager::new()));
        tokio::spawn(serve(listener, Arc::clone(&peers)));
        (addr, peers)
    }

    async fn wait_for_peers(peers: &Arc<RwLock<PeerManager>>, count: usize) {
        for _ in 0..200 {
            if peers.read().await.len() == count {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("relay never reached {} peers", count);
    }

    async fn read_line(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        timeout(Duration::from_secs(2), async {
            loop {
                stream.read_exact(&mut byte).await.unwrap();
                buf.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
        })
        .await
        .expect("timed out waiting for a frame");
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_frames_reach_every_other_peer() {
        let (addr, peers) = start_relay().await;
        let mut a = TcpStream::connect(addr).await.unwrap();
        let mut b = TcpStream::connect(addr).await.unwrap();
        let mut c = TcpStream::connect(addr).await.unwrap();
        wait_for_peers(&peers, 3).await;

        a.write_all(b"{\"type\":\"player_hit\"}\n").await.unwrap();
        assert_eq!(read_line(&mut b).await, "{\"type\":\"player_hit\"}\n");
        assert_eq!(read_line(&mut c).await, "{\"type\":\"player_hit\"}\n");

        // nothing echoes back to the sender
        let mut byte = [0u8; 1];
        assert!(timeout(Duration::from_millis(100), a.read(&mut byte)).await.is_err());
    }

    #[tokio::test]
    async fn test_frames_are_opaque() {
        let (addr, peers) = start_relay().await;
        let mut a = TcpStream::connect(addr).await.unwrap();
        let mut b = TcpStream::connect(addr).await.unwrap();
        wait_for_peers(&peers, 2).await;

        a.write_all(b"not json at all\nsecond\n").await.unwrap();
        assert_eq!(read_line(&mut b).await, "not json at all\n");
        assert_eq!(read_line(&mut b).await, "second\n");
    }

    #[tokio::test]
    async fn test_disconnected_peer_is_dropped() {
        let (addr, peers) = start_relay().await;
        let mut a = TcpStream::connect(addr).await.unwrap();
        let b = TcpStream::connect(addr).await.unwrap();
        let mut c = TcpStream::connect(addr).await.unwrap();
        wait_for_peers(&peers, 3).await;

        drop(b);
        wait_for_peers(&peers, 2).await;

        a.write_all(b"still here\n").await.unwrap();
        assert_eq!(read_line(&mut c).await, "still here\n");
    }

    #[tokio::test]
    async fn test_forward_frames_writes_in_order() {
        let mock = tokio_test::io::Builder::new()
            .write(b"one\n")
            .write(b"two\n")
            .build();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Frame::from(&b"one\n"[..])).unwrap();
        tx.send(Frame::from(&b"two\n"[..])).unwrap();
        drop(tx);

        forward_frames(1, mock, rx).await;
    }

    #[tokio::test]
    async fn test_forward_frames_stops_on_write_error() {
        let mock = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Frame::from(&b"lost\n"[..])).unwrap();
        tx.send(Frame::from(&b"never\n"[..])).unwrap();

        forward_frames(1, mock, rx).await;
        // the writer gave up and released its queue while the sender was alive
        assert!(tx.is_closed());
    }
}
