//! Game state and the win/lose state machine
//!
//! Everything a running session mutates lives in `GameState`; there is no
//! module-level state. Transitions are only ever driven by collision events.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::entity::EntityRegistry;
use super::level::build_level;
use super::physics::Physics;
use crate::consts::{GAME_OVER_TEXT, PLAYER_HIT_TINT};
use crate::score_text;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (terminal)
    GameOver,
}

/// Collision outcomes queued by physics and consumed by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { coin_id: u32 },
    EnemyHit { enemy_id: u32 },
}

/// Text the presentation layer shows on top of the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score_text: String,
    /// Centered banner (game over)
    pub message: Option<String>,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score_text: score_text(0),
            message: None,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Coins collected this session
    pub score: u32,
    pub hud: Hud,
    pub entities: EntityRegistry,
    pub physics: Physics,
    /// Events raised by the last physics step, drained in arrival order
    pub events: VecDeque<GameEvent>,
}

impl GameState {
    /// Create a new game state with the fixed level, randomized by `seed`
    pub fn new(seed: u64) -> Self {
        let level = build_level(seed);
        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            hud: Hud::default(),
            entities: level.entities,
            physics: level.physics,
            events: VecDeque::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Coin pickup transition.
    ///
    /// Ignored after game over and for coins that are unknown or already
    /// collected. Returns true if the score changed.
    pub fn collect_coin(&mut self, coin_id: u32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(coin) = self.entities.coin_mut(coin_id) else {
            log::warn!("Collect event for unknown coin {}", coin_id);
            return false;
        };
        if !coin.disable() {
            return false;
        }

        self.score += 1;
        self.hud.score_text = score_text(self.score);
        log::debug!("Coin {} collected, score {}", coin_id, self.score);
        true
    }

    /// Enemy contact transition: ends the run.
    ///
    /// Freezes physics, tints the player and raises the game-over banner.
    /// Returns false if the run had already ended.
    pub fn hit_enemy(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        self.physics.pause();
        self.entities.player.tint = Some(PLAYER_HIT_TINT);
        self.hud.message = Some(GAME_OVER_TEXT.to_string());
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} ticks with score {}",
            self.time_ticks,
            self.score
        );
        true
    }

    /// Route one queued event to its transition
    pub fn apply_event(&mut self, event: GameEvent) -> bool {
        match event {
            GameEvent::CoinCollected { coin_id } => self.collect_coin(coin_id),
            GameEvent::EnemyHit { enemy_id } => {
                log::debug!("Player hit enemy {}", enemy_id);
                self.hit_enemy()
            }
        }
    }

    /// Drain the event queue in arrival order
    pub fn process_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            self.apply_event(event);
        }
    }
}
