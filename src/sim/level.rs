//! Fixed level layout
//!
//! Places every entity at its hard-coded coordinates and wires the physics
//! rules. The only variation between runs is the seeded spawn randomness
//! (coin bounce, enemy launch speed).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Aabb, Body};
use super::entity::{Coin, Enemy, EntityRegistry, Platform, Player};
use super::physics::{ContactHandler, Group, Physics};
use crate::consts::*;

/// A freshly built level
#[derive(Debug, Clone)]
pub struct Level {
    pub entities: EntityRegistry,
    pub physics: Physics,
}

/// Hands out entity IDs in creation order
struct IdAllocator(u32);

impl IdAllocator {
    fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Build the level. Same seed, same level.
pub fn build_level(seed: u64) -> Level {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut ids = IdAllocator(1);

    let (px, py) = PLAYER_SPAWN;
    let (sx, sy) = PLAYER_SCALE;
    let player = Player::new(
        Body::dynamic(Vec2::new(px, py), Vec2::new(sx, sy))
            .with_bounce(Vec2::splat(PLAYER_BOUNCE))
            .with_world_bounds(),
    );
    let mut entities = EntityRegistry::new(player);

    for &(x, y, scale_x, scale_y) in PLATFORMS.iter() {
        entities.platforms.push(Platform {
            id: ids.next(),
            body: Body::fixed(Vec2::new(x, y), Vec2::new(scale_x, scale_y)),
        });
    }

    for i in 0..COIN_COUNT {
        let pos = Vec2::new(COIN_START_X + COIN_STEP_X * i as f32, COIN_START_Y);
        let bounce_y = rng.random_range(COIN_BOUNCE_MIN..COIN_BOUNCE_MAX);
        let body = Body::dynamic(pos, Vec2::splat(COIN_SCALE)).with_bounce(Vec2::new(0.0, bounce_y));
        entities.coins.push(Coin::new(ids.next(), body));
    }

    for &(x, y) in ENEMY_SPAWNS.iter() {
        let vx = rng.random_range(-ENEMY_MAX_SPEED_X..=ENEMY_MAX_SPEED_X) as f32;
        let body = Body::dynamic(Vec2::new(x, y), Vec2::splat(ENEMY_SCALE))
            .with_bounce(Vec2::ONE)
            .with_world_bounds()
            .with_velocity(Vec2::new(vx, ENEMY_SPEED_Y));
        entities.enemies.push(Enemy {
            id: ids.next(),
            body,
        });
    }
    entities.normalize_order();

    let mut physics = Physics::new(
        GRAVITY,
        Aabb::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
    );
    physics.add_collider(Group::Player, Group::Platforms, None);
    physics.add_collider(Group::Coins, Group::Platforms, None);
    physics.add_collider(Group::Enemies, Group::Platforms, None);
    physics.add_overlap(Group::Player, Group::Coins, Some(ContactHandler::CollectCoin));
    physics.add_collider(Group::Player, Group::Enemies, Some(ContactHandler::HitEnemy));

    log::info!(
        "Level built (seed {}): {} platforms, {} coins, {} enemies",
        seed,
        entities.platforms.len(),
        entities.coins.len(),
        entities.enemies.len()
    );

    Level { entities, physics }
}
