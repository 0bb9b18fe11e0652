//! Arcade physics service
//!
//! Integrates dynamic bodies under gravity, clamps them to the world and
//! processes the collider/overlap rules registered by the level builder.
//! Rules never touch game state directly: contacts with a handler are turned
//! into `GameEvent`s and queued for the state machine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::body::{Aabb, Body};
use super::collision::{separate, world_bounds_collision};
use super::entity::{Coin, Enemy, EntityRegistry, Player};
use super::state::GameEvent;

/// Body groups that rules are registered between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    Player,
    Platforms,
    Coins,
    Enemies,
}

/// Physical response (collide) or detection only (overlap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairMode {
    Collide,
    Overlap,
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactHandler {
    CollectCoin,
    HitEnemy,
}

impl ContactHandler {
    /// Event for a contact between the player and entity `id`
    pub fn event(self, id: u32) -> GameEvent {
        match self {
            ContactHandler::CollectCoin => GameEvent::CoinCollected { coin_id: id },
            ContactHandler::HitEnemy => GameEvent::EnemyHit { enemy_id: id },
        }
    }
}

/// A registered collider or overlap pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRule {
    pub a: Group,
    pub b: Group,
    pub mode: PairMode,
    pub handler: Option<ContactHandler>,
}

impl PairRule {
    /// Pairings the step knows how to process
    fn is_supported(&self) -> bool {
        match (self.a, self.b, self.mode) {
            (Group::Player | Group::Coins | Group::Enemies, Group::Platforms, PairMode::Collide) => {
                true
            }
            (Group::Player, Group::Coins | Group::Enemies, _) => true,
            _ => false,
        }
    }
}

/// Physics world configuration and rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// World rectangle for bodies that collide with bounds
    pub bounds: Aabb,
    paused: bool,
    rules: Vec<PairRule>,
}

impl Physics {
    pub fn new(gravity: f32, bounds: Aabb) -> Self {
        Self {
            gravity,
            bounds,
            paused: false,
            rules: Vec::new(),
        }
    }

    /// Register a solid collision pair. Returns false if the pairing is unsupported.
    pub fn add_collider(&mut self, a: Group, b: Group, handler: Option<ContactHandler>) -> bool {
        self.add_rule(PairRule {
            a,
            b,
            mode: PairMode::Collide,
            handler,
        })
    }

    /// Register a detection-only pair. Returns false if the pairing is unsupported.
    pub fn add_overlap(&mut self, a: Group, b: Group, handler: Option<ContactHandler>) -> bool {
        self.add_rule(PairRule {
            a,
            b,
            mode: PairMode::Overlap,
            handler,
        })
    }

    fn add_rule(&mut self, rule: PairRule) -> bool {
        if !rule.is_supported() {
            log::warn!(
                "Ignoring unsupported physics pair {:?} / {:?} ({:?})",
                rule.a,
                rule.b,
                rule.mode
            );
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn rules(&self) -> &[PairRule] {
        &self.rules
    }

    /// Freeze all bodies; `step` becomes a no-op
    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("Physics paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance every dynamic body by `dt` and resolve rules in registration order
    pub fn step(&self, entities: &mut EntityRegistry, dt: f32, events: &mut VecDeque<GameEvent>) {
        if self.paused {
            return;
        }

        let EntityRegistry {
            platforms,
            player,
            coins,
            enemies,
        } = entities;

        for body in group_bodies(Group::Player, player, coins, enemies) {
            body.integrate(self.gravity, dt);
        }
        for body in group_bodies(Group::Coins, player, coins, enemies) {
            body.integrate(self.gravity, dt);
        }
        for body in group_bodies(Group::Enemies, player, coins, enemies) {
            body.integrate(self.gravity, dt);
        }

        for group in [Group::Player, Group::Coins, Group::Enemies] {
            for body in group_bodies(group, player, coins, enemies) {
                if body.collide_world_bounds {
                    world_bounds_collision(body, &self.bounds);
                }
            }
        }

        for rule in &self.rules {
            match (rule.a, rule.b) {
                (group, Group::Platforms) => {
                    for body in group_bodies(group, player, coins, enemies) {
                        for platform in platforms.iter() {
                            separate(body, &platform.body.aabb());
                        }
                    }
                }
                (Group::Player, other) => {
                    let player_box = player.body.aabb();
                    let contacts: Vec<(u32, Aabb)> = match other {
                        Group::Coins => coins
                            .iter()
                            .filter(|c| c.body.enabled && c.body.aabb().overlaps(&player_box))
                            .map(|c| (c.id, c.body.aabb()))
                            .collect(),
                        Group::Enemies => enemies
                            .iter()
                            .filter(|e| e.body.enabled && e.body.aabb().overlaps(&player_box))
                            .map(|e| (e.id, e.body.aabb()))
                            .collect(),
                        _ => Vec::new(),
                    };

                    for (id, other_box) in contacts {
                        match rule.handler {
                            Some(handler) => events.push_back(handler.event(id)),
                            // Solid pair without a handler: push the player out
                            None if rule.mode == PairMode::Collide => {
                                separate(&mut player.body, &other_box);
                            }
                            None => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// Enabled bodies of a dynamic group
fn group_bodies<'a>(
    group: Group,
    player: &'a mut Player,
    coins: &'a mut [Coin],
    enemies: &'a mut [Enemy],
) -> Vec<&'a mut Body> {
    match group {
        Group::Player => vec![&mut player.body],
        Group::Coins => coins
            .iter_mut()
            .map(|c| &mut c.body)
            .filter(|b| b.enabled)
            .collect(),
        Group::Enemies => enemies
            .iter_mut()
            .map(|e| &mut e.body)
            .filter(|b| b.enabled)
            .collect(),
        Group::Platforms => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::Platform;
    use glam::Vec2;

    fn world() -> Physics {
        Physics::new(
            GRAVITY,
            Aabb::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
        )
    }

    fn registry_with_ground() -> EntityRegistry {
        let player = Player::new(
            Body::dynamic(Vec2::new(100.0, 450.0), Vec2::new(0.32, 0.48))
                .with_bounce(Vec2::splat(PLAYER_BOUNCE))
                .with_world_bounds(),
        );
        let mut registry = EntityRegistry::new(player);
        registry.platforms.push(Platform {
            id: 1,
            body: Body::fixed(Vec2::new(400.0, 568.0), Vec2::new(8.0, 0.64)),
        });
        registry
    }

    #[test]
    fn test_unsupported_pairs_are_rejected() {
        let mut physics = world();
        assert!(!physics.add_collider(Group::Platforms, Group::Player, None));
        assert!(!physics.add_overlap(Group::Coins, Group::Enemies, None));
        assert!(physics.add_collider(Group::Player, Group::Platforms, None));
        assert_eq!(physics.rules().len(), 1);
    }

    #[test]
    fn test_player_settles_on_ground() {
        let mut physics = world();
        physics.add_collider(Group::Player, Group::Platforms, None);
        let mut registry = registry_with_ground();
        let mut events = VecDeque::new();

        for _ in 0..240 {
            physics.step(&mut registry, SIM_DT, &mut events);
        }

        let player = &registry.player.body;
        assert!(player.on_ground());
        assert!((player.aabb().max.y - 536.0).abs() < 0.5);
        assert!(events.is_empty());
    }

    #[test]
    fn test_overlap_queues_event_per_contact() {
        let mut physics = world();
        physics.add_overlap(Group::Player, Group::Coins, Some(ContactHandler::CollectCoin));
        let mut registry = registry_with_ground();
        registry
            .coins
            .push(Coin::new(5, Body::dynamic(Vec2::new(100.0, 450.0), Vec2::splat(0.2))));
        registry
            .coins
            .push(Coin::new(6, Body::dynamic(Vec2::new(600.0, 100.0), Vec2::splat(0.2))));
        let mut events = VecDeque::new();

        physics.step(&mut registry, SIM_DT, &mut events);
        assert_eq!(events.pop_front(), Some(GameEvent::CoinCollected { coin_id: 5 }));
        assert!(events.is_empty());

        // Disabled coins no longer produce contacts
        if let Some(coin) = registry.coin_mut(5) {
            coin.disable();
        }
        physics.step(&mut registry, SIM_DT, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_paused_step_is_noop() {
        let mut physics = world();
        physics.add_collider(Group::Player, Group::Platforms, None);
        let mut registry = registry_with_ground();
        registry.player.body.vel = Vec2::new(160.0, -100.0);
        physics.pause();

        let mut events = VecDeque::new();
        physics.step(&mut registry, SIM_DT, &mut events);
        assert_eq!(registry.player.body.pos, Vec2::new(100.0, 450.0));
        assert_eq!(registry.player.body.vel, Vec2::new(160.0, -100.0));

        physics.resume();
        physics.step(&mut registry, SIM_DT, &mut events);
        assert!(registry.player.body.pos.x > 100.0);
    }
}
