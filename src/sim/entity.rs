//! Entity registry
//!
//! Typed collections for the four entity kinds. Entities are created once by
//! the level builder; afterwards only coins change membership (active ->
//! disabled), and nothing is ever removed.

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Entity kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Player,
    Coin,
    Enemy,
}

/// Immovable level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub body: Body,
}

/// The controllable character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Multiplicative tint applied when drawing (set on game over)
    pub tint: Option<u32>,
}

impl Player {
    pub fn new(body: Body) -> Self {
        Self { body, tint: None }
    }
}

/// A collectable coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub body: Body,
    /// False once collected; never flips back
    pub active: bool,
}

impl Coin {
    pub fn new(id: u32, body: Body) -> Self {
        Self {
            id,
            body,
            active: true,
        }
    }

    /// Take the coin out of physics and rendering.
    /// Returns false if it was already collected.
    pub fn disable(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.body.disable();
        true
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
}

/// All entities of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub platforms: Vec<Platform>,
    pub player: Player,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
}

impl EntityRegistry {
    pub fn new(player: Player) -> Self {
        Self {
            platforms: Vec::new(),
            player,
            coins: Vec::new(),
            enemies: Vec::new(),
        }
    }

    pub fn coin(&self, id: u32) -> Option<&Coin> {
        self.coins.iter().find(|c| c.id == id)
    }

    pub fn coin_mut(&mut self, id: u32) -> Option<&mut Coin> {
        self.coins.iter_mut().find(|c| c.id == id)
    }

    pub fn active_coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter().filter(|c| c.active)
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.coins.sort_by_key(|c| c.id);
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_coin_disable_is_write_once() {
        let mut coin = Coin::new(7, Body::dynamic(Vec2::new(12.0, 0.0), Vec2::splat(0.2)));
        assert!(coin.disable());
        assert!(!coin.active);
        assert!(!coin.body.enabled);

        // Second disable is a no-op
        assert!(!coin.disable());
        assert!(!coin.active);
    }

    #[test]
    fn test_lookup_by_id() {
        let player = Player::new(Body::dynamic(Vec2::new(100.0, 450.0), Vec2::ONE));
        let mut registry = EntityRegistry::new(player);
        registry.platforms.push(Platform {
            id: 1,
            body: Body::fixed(Vec2::new(400.0, 568.0), Vec2::new(8.0, 0.64)),
        });
        registry.coins.push(Coin::new(3, Body::dynamic(Vec2::ZERO, Vec2::splat(0.2))));
        registry.coins.push(Coin::new(2, Body::dynamic(Vec2::ZERO, Vec2::splat(0.2))));
        registry.normalize_order();

        assert_eq!(registry.coins[0].id, 2);
        assert_eq!(registry.coin(3).map(|c| c.id), Some(3));
        assert!(registry.coin(99).is_none());

        if let Some(coin) = registry.coin_mut(3) {
            coin.disable();
        }
        assert_eq!(registry.active_coins().count(), 1);
    }
}
