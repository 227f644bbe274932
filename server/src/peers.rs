//! Registry of peers connected to the relay
//!
//! Each peer owns an outbound frame queue drained by its own writer task.
//! The registry knows nothing about what a frame contains.

use log::{info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One newline-terminated frame, shared between every recipient.
pub type Frame = Arc<[u8]>;

/// A connected peer and the queue feeding its socket
#[derive(Debug)]
pub struct Peer {
    /// Relay-assigned identifier, unrelated to any player identity
    pub id: u32,
    pub addr: SocketAddr,
    sender: mpsc::UnboundedSender<Frame>,
}

/// Tracks connected peers and fans frames out between them
#[derive(Debug)]
pub struct PeerManager {
    peers: HashMap<u32, Peer>,
    next_peer_id: u32,
}

impl PeerManager {
    /// Creates an empty registry. Peer IDs start from 1.
    pub fn new() -> Self {
        Self {
            peers: HashMap::new(),
            next_peer_id: 1,
        }
    }

    /// Registers a peer and returns its ID
    ///
    /// Frames for the peer are pushed onto `sender`; whoever holds the
    /// receiving end is responsible for writing them to the socket.
    pub fn add_peer(&mut self, addr: SocketAddr, sender: mpsc::UnboundedSender<Frame>) -> u32 {
        let peer_id = self.next_peer_id;
        self.next_peer_id += 1;

        info!("Peer {} connected from {}", peer_id, addr);
        self.peers.insert(
            peer_id,
            Peer {
                id: peer_id,
                addr,
                sender,
            },
        );
        peer_id
    }

    /// Removes a peer. Dropping its queue ends the peer's writer task.
    pub fn remove_peer(&mut self, peer_id: &u32) -> bool {
        if let Some(peer) = self.peers.remove(peer_id) {
            info!("Peer {} ({}) removed", peer.id, peer.addr);
            true
        } else {
            false
        }
    }

    /// Queues `frame` for every peer except `from`
    ///
    /// Returns how many peers accepted the frame. A peer whose writer has
    /// already stopped is removed, so it is reported only once.
    pub fn broadcast(&mut self, from: u32, frame: Frame) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();
        for (peer_id, peer) in &self.peers {
            if *peer_id == from {
                continue;
            }
            match peer.sender.send(Arc::clone(&frame)) {
                Ok(()) => delivered += 1,
                Err(_) => dead.push(*peer_id),
            }
        }

        for peer_id in dead {
            warn!("Peer {} is no longer accepting frames", peer_id);
            self.remove_peer(&peer_id);
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

impl Default for PeerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), port)
    }

    fn frame(text: &str) -> Frame {
        Arc::from(text.as_bytes())
    }

    #[test]
    fn test_peer_ids_increment() {
        let mut peers = PeerManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(peers.add_peer(addr(1000), tx.clone()), 1);
        assert_eq!(peers.add_peer(addr(1001), tx), 2);
        assert_eq!(peers.len(), 2);
    }

    #[test]
    fn test_remove_peer() {
        let mut peers = PeerManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = peers.add_peer(addr(1000), tx);
        assert!(peers.remove_peer(&id));
        assert!(!peers.remove_peer(&id));
        assert!(peers.is_empty());
    }

    #[test]
    fn test_broadcast_skips_sender() {
        let mut peers = PeerManager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        let a = peers.add_peer(addr(1000), tx_a);
        peers.add_peer(addr(1001), tx_b);
        peers.add_peer(addr(1002), tx_c);

        assert_eq!(peers.broadcast(a, frame("hello\n")), 2);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(&*rx_b.try_recv().unwrap(), b"hello\n");
        assert_eq!(&*rx_c.try_recv().unwrap(), b"hello\n");
    }

    #[test]
    fn test_closed_peer_does_not_block_others() {
        let mut peers = PeerManager::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        let a = peers.add_peer(addr(1000), tx_a);
        peers.add_peer(addr(1001), tx_b);
        peers.add_peer(addr(1002), tx_c);
        drop(rx_b);

        assert_eq!(peers.broadcast(a, frame("x\n")), 1);
        assert_eq!(&*rx_c.try_recv().unwrap(), b"x\n");
    }

    #[test]
    fn test_stopped_writer_is_dropped_after_first_failure() {
        let mut peers = PeerManager::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        let a = peers.add_peer(addr(1000), tx_a);
        let b = peers.add_peer(addr(1001), tx_b);
        peers.add_peer(addr(1002), tx_c);
        drop(rx_b);

        peers.broadcast(a, frame("one\n"));
        assert_eq!(peers.len(), 2);
        assert!(!peers.remove_peer(&b));

        assert_eq!(peers.broadcast(a, frame("two\n")), 1);
        assert_eq!(&*rx_c.try_recv().unwrap(), b"one\n");
        assert_eq!(&*rx_c.try_recv().unwrap(), b"two\n");
    }
}
