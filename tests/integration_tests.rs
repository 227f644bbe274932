//! Integration tests for the arena crates working together
//!
//! These cover the shooting scenario end to end and real relay traffic
//! between client sessions over loopback sockets.

use assert_approx_eq::assert_approx_eq;
use client::session::{listen, write_frames};
use client::Session;
use rand::rngs::StdRng;
use rand::SeedableRng;
use server::peers::PeerManager;
use server::relay::serve;
use shared::{
    decode, encode, resolve_hits, Arena, Event, MergeOutcome, Player, PlayerInput, Point, World,
    MAX_HEALTH, PROJECTILE_SPEED, WEAPON_DAMAGE,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};
use tokio::time::sleep;

/// SHOOTING SCENARIO TESTS
mod scenario_tests {
    use super::*;

    const WIDE: f64 = 100_000.0;

    #[test]
    fn projectile_travels_speed_per_tick() {
        let mut shooter = Player::new("a", 0.0, 0.0);
        shooter.fire(0.0);

        let ticks = 7;
        for _ in 0..ticks {
            shooter.advance_projectiles(WIDE, WIDE);
        }

        let bullet = &shooter.projectiles[0];
        assert_approx_eq!(bullet.x, ticks as f64 * PROJECTILE_SPEED, 1e-9);
        assert_approx_eq!(bullet.y, 0.0, 1e-9);
    }

    #[test]
    fn target_on_path_is_hit_exactly_once() {
        let mut shooter = Player::new("a", 0.0, 0.0);
        let mut target = Player::new("target", 300.0, 0.0);
        shooter.fire(0.0);

        let mut hits = Vec::new();
        for _ in 0..10 {
            shooter.advance_projectiles(WIDE, WIDE);
            hits.extend(resolve_hits(&mut shooter, std::iter::once(&mut target)));
        }

        assert_eq!(hits.len(), 1);
        assert_eq!(target.health, MAX_HEALTH - WEAPON_DAMAGE);
        assert!(shooter.projectiles.is_empty());

        let frame = encode(&Event::PlayerHit(hits.remove(0))).unwrap();
        match decode(&frame).unwrap() {
            Event::PlayerHit(hit) => {
                assert_eq!(hit.victim_id, "target");
                assert_eq!(hit.damage, WEAPON_DAMAGE);
            }
            other => panic!("expected a hit, got {:?}", other),
        }
    }

    #[test]
    fn world_tick_reports_hit_before_update() {
        let mut world = World::new("a", Arena::new(1600.0, 900.0, 20.0, Vec::new()));
        world.local.x = 100.0;
        world.local.y = 100.0;
        world.add_remote(Player::new("b", 220.0, 100.0));
        let input = PlayerInput {
            fire: true,
            aim: Point::new(400.0, 100.0),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);

        let events = world.tick(&input, 0.0, &mut rng);

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Event::PlayerHit(hit) if hit.victim_id == "b"));
        assert!(matches!(&events[1], Event::PlayerUpdate(update) if update.id == "a"));
        assert_eq!(world.remotes["b"].health, MAX_HEALTH - WEAPON_DAMAGE);
    }

    #[test]
    fn duplicate_hit_frames_double_count() {
        let mut world = World::new("b", Arena::standard());
        let frame = encode(&Event::PlayerHit(shared::PlayerHit {
            victim_id: "b".to_string(),
            damage: WEAPON_DAMAGE,
        }))
        .unwrap();

        for _ in 0..2 {
            let outcome = world.apply(decode(&frame).unwrap());
            assert_eq!(outcome, MergeOutcome::Damaged);
        }
        assert_eq!(world.local.health, MAX_HEALTH - 2 * WEAPON_DAMAGE);
    }
}

/// RELAY TRAFFIC TESTS
mod relay_tests {
    use super::*;

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

    async fn wait_until(world: &Arc<Mutex<World>>, check: impl Fn(&World) -> bool) {
        for _ in 0..400 {
            if check(&world.lock().unwrap()) {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("world never reached the expected state");
    }

    /// Connects a player to the relay the way `Session::connect` does, but
    /// on the test's own runtime.
    async fn join(addr: SocketAddr, world: World) -> Session {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let shared = Arc::new(Mutex::new(world));
        let (outbound, frames) = mpsc::unbounded_channel();
        tokio::spawn(write_frames(write_half, frames));
        tokio::spawn(listen(BufReader::new(read_half), Arc::clone(&shared)));
        Session::new(shared, outbound)
    }

    #[tokio::test]
    async fn update_reaches_other_player() {
        let (addr, peers) = start_relay().await;
        let alice = join(addr, World::new("alice", Arena::standard())).await;
        let bob = join(addr, World::new("bob", Arena::standard())).await;
        wait_for_peers(&peers, 2).await;

        let mut rng = StdRng::seed_from_u64(5);
        alice.tick(&PlayerInput::default(), 0.0, &mut rng);

        let bob_world = bob.shared_world();
        wait_until(&bob_world, |world| world.remotes.contains_key("alice")).await;

        let alice_world = alice.snapshot();
        let guard = bob_world.lock().unwrap();
        let seen = &guard.remotes["alice"];
        assert_eq!(seen.x, alice_world.local.x);
        assert_eq!(seen.y, alice_world.local.y);
        assert!(alice_world.remotes.is_empty());
    }

    #[tokio::test]
    async fn hit_travels_to_victim() {
        let (addr, peers) = start_relay().await;

        let mut shooter_world = World::new("alice", Arena::new(1600.0, 900.0, 20.0, Vec::new()));
        shooter_world.local.x = 100.0;
        shooter_world.local.y = 100.0;
        shooter_world.add_remote(Player::new("bob", 220.0, 100.0));

        let alice = join(addr, shooter_world).await;
        let bob = join(addr, World::new("bob", Arena::standard())).await;
        wait_for_peers(&peers, 2).await;

        let input = PlayerInput {
            fire: true,
            aim: Point::new(400.0, 100.0),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        alice.tick(&input, 0.0, &mut rng);

        let bob_world = bob.shared_world();
        wait_until(&bob_world, |world| world.remotes.contains_key("alice")).await;

        assert_eq!(bob_world.lock().unwrap().local.health, MAX_HEALTH - WEAPON_DAMAGE);
        assert_eq!(alice.snapshot().remotes["bob"].health, MAX_HEALTH - WEAPON_DAMAGE);
    }

    #[tokio::test]
    async fn garbage_from_one_peer_is_ignored_by_others() {
        let (addr, peers) = start_relay().await;
        let mut rogue = TcpStream::connect(addr).await.unwrap();
        let bob = join(addr, World::new("bob", Arena::standard())).await;
        wait_for_peers(&peers, 2).await;

        rogue.write_all(b"not json at all\n").await.unwrap();
        rogue.write_all(b"\xff\xfe\x00 not utf-8\n").await.unwrap();
        let update = Player::new("carol", 40.0, 50.0).to_update();
        let frame = format!("{}\n", encode(&Event::PlayerUpdate(update)).unwrap());
        rogue.write_all(frame.as_bytes()).await.unwrap();

        let bob_world = bob.shared_world();
        wait_until(&bob_world, |world| world.remotes.contains_key("carol")).await;
        assert_eq!(bob_world.lock().unwrap().remotes.len(), 1);
    }
}
