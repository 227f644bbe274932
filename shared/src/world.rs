//! One peer's view of the match: its own player, every remote player it has
//! heard of, and the static arena.

use crate::arena::Arena;
use crate::combat::resolve_hits;
use crate::constants::RECOIL_SPREAD;
use crate::entity::{Player, PlayerInput};
use crate::protocol::{Event, PlayerHit, PlayerUpdate};
use crate::visibility::VisibilityPolygon;
use log::{debug, info};
use rand::Rng;
use std::collections::HashMap;

/// Stationary targets for solo practice.
const DUMMY_SPAWNS: [(&str, f64, f64); 5] = [
    ("dummy-1", 900.0, 700.0),
    ("dummy-2", 900.0, 750.0),
    ("dummy-3", 1300.0, 300.0),
    ("dummy-4", 100.0, 100.0),
    ("dummy-5", 690.0, 250.0),
];

/// What merging an inbound event did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A remote record was created from a first sighting.
    Inserted,
    /// An existing remote record was replaced wholesale.
    Replaced,
    /// Damage landed on the local player or a known remote.
    Damaged,
    /// Echo of our own state, or a hit on an unknown player.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct World {
    pub local: Player,
    pub remotes: HashMap<String, Player>,
    arena: Arena,
    visibility: VisibilityPolygon,
    tick: u64,
}

impl World {
    /// Spawns the local player at the arena's spawn point.
    pub fn new(local_id: &str, arena: Arena) -> Self {
        let spawn = arena.spawn_point();
        let local = Player::new(local_id, spawn.x, spawn.y);
        let visibility = VisibilityPolygon::compute(spawn, arena.occluders(), arena.ray_length());
        Self {
            local,
            remotes: HashMap::new(),
            arena,
            visibility,
            tick: 0,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn visibility(&self) -> &VisibilityPolygon {
        &self.visibility
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn add_remote(&mut self, player: Player) {
        self.remotes.insert(player.id.clone(), player);
    }

    pub fn seed_dummies(&mut self) {
        for (id, x, y) in DUMMY_SPAWNS {
            self.add_remote(Player::new(id, x, y));
        }
        info!("Seeded {} target dummies", DUMMY_SPAWNS.len());
    }

    /// Advances the local simulation by one tick and returns the events to
    /// broadcast: any hits scored this tick, followed by our full state.
    pub fn tick<R: Rng>(&mut self, input: &PlayerInput, now: f64, rng: &mut R) -> Vec<Event> {
        self.local.step(input, &self.arena, now, || {
            rng.gen_range(-RECOIL_SPREAD..RECOIL_SPREAD)
        });

        let hits = resolve_hits(&mut self.local, self.remotes.values_mut());

        self.visibility = VisibilityPolygon::compute(
            self.local.position(),
            self.arena.occluders(),
            self.arena.ray_length(),
        );
        self.tick += 1;

        let mut events: Vec<Event> = hits.into_iter().map(Event::PlayerHit).collect();
        events.push(Event::PlayerUpdate(self.local.to_update()));
        events
    }

    /// Merges one inbound event.
    ///
    /// Updates replace a remote record wholesale and are idempotent. Hits
    /// are not: the same hit delivered twice subtracts damage twice.
    pub fn apply(&mut self, event: Event) -> MergeOutcome {
        match event {
            Event::PlayerUpdate(update) => self.merge_update(update),
            Event::PlayerHit(hit) => self.merge_hit(hit),
        }
    }

    fn merge_update(&mut self, update: PlayerUpdate) -> MergeOutcome {
        if update.id == self.local.id {
            return MergeOutcome::Ignored;
        }

        match self.remotes.get_mut(&update.id) {
            Some(remote) => {
                remote.apply_update(update);
                MergeOutcome::Replaced
            }
            None => {
                info!("First sighting of player {}", update.id);
                let mut remote = Player::new(&update.id, update.x, update.y);
                remote.apply_update(update);
                self.add_remote(remote);
                MergeOutcome::Inserted
            }
        }
    }

    fn merge_hit(&mut self, hit: PlayerHit) -> MergeOutcome {
        if hit.victim_id == self.local.id {
            self.local.apply_damage(hit.damage);
            info!("Took {} damage, health {}", hit.damage, self.local.health);
            return MergeOutcome::Damaged;
        }

        match self.remotes.get_mut(&hit.victim_id) {
            Some(remote) => {
                remote.apply_damage(hit.damage);
                MergeOutcome::Damaged
            }
            None => {
                debug!("Hit for unknown player {} dropped", hit.victim_id);
                MergeOutcome::Ignored
            }
        }
    }
}
