//! Projectile versus hitbox resolution for the local shooter.

use crate::constants::WEAPON_DAMAGE;
use crate::entity::{Player, Projectile};
use crate::geometry::{intersect, Segment};
use crate::protocol::PlayerHit;
use log::debug;

/// Hitbox edges of `target` ordered by how close their midpoints are to the
/// projectile's current position, nearest first.
pub fn ordered_edges(target: &Player, projectile: &Projectile) -> Vec<Segment> {
    let origin = projectile.position();
    let mut edges = target.hitbox().segments().to_vec();
    edges.sort_by(|a, b| {
        origin
            .distance_squared(a.midpoint())
            .total_cmp(&origin.distance_squared(b.midpoint()))
    });
    edges
}

/// Tests each of the shooter's projectiles against each target's hitbox.
///
/// The first intersecting edge (nearest midpoint first) counts. A hit
/// damages the target, removes the projectile and yields a [`PlayerHit`].
/// The shooter is never its own target. Downed targets stay hit-testable,
/// and the clamp on health makes the damage a no-op.
pub fn resolve_hits<'a>(
    shooter: &mut Player,
    targets: impl IntoIterator<Item = &'a mut Player>,
) -> Vec<PlayerHit> {
    let mut hits = Vec::new();

    for target in targets {
        if target.id == shooter.id {
            continue;
        }

        for i in (0..shooter.projectiles.len()).rev() {
            let projectile = &shooter.projectiles[i];
            let path = projectile.path();
            let struck = ordered_edges(target, projectile)
                .iter()
                .any(|edge| intersect(edge, &path).is_some());

            if struck {
                target.apply_damage(WEAPON_DAMAGE);
                shooter.projectiles.remove(i);
                debug!(
                    "{} hit {} for {} (health now {})",
                    shooter.id, target.id, WEAPON_DAMAGE, target.health
                );
                hits.push(PlayerHit {
                    victim_id: target.id.clone(),
                    damage: WEAPON_DAMAGE,
                });
            }
        }
    }

    hits
}
