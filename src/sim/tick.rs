//! Fixed timestep simulation tick
//!
//! Order within a tick: input -> physics step -> collision events -> state
//! machine. Once the run is over the tick does nothing, so any input that
//! still arrives is discarded here rather than at the source.

use super::state::{GamePhase, GameState};
use crate::consts::{PLAYER_JUMP_SPEED, PLAYER_RUN_SPEED};

/// Horizontal intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
    #[default]
    Idle,
}

impl Horizontal {
    /// -1, 0 or 1
    pub fn direction(self) -> f32 {
        match self {
            Horizontal::Left => -1.0,
            Horizontal::Right => 1.0,
            Horizontal::Idle => 0.0,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub horizontal: Horizontal,
    /// Jump requested (space held or jump zone tapped)
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    apply_input(state, input);

    state
        .physics
        .step(&mut state.entities, dt, &mut state.events);

    state.process_events();
}

/// Map intent onto player velocity. Jumps need ground contact from the last step.
fn apply_input(state: &mut GameState, input: &TickInput) {
    let body = &mut state.entities.player.body;

    // Idle always resets, so no residual speed survives a release
    body.vel.x = input.horizontal.direction() * PLAYER_RUN_SPEED;

    if input.jump {
        if body.on_ground() {
            body.vel.y = -PLAYER_JUMP_SPEED;
        } else {
            log::trace!("Jump rejected: player is airborne");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::GameEvent;
    use glam::Vec2;
    use proptest::prelude::*;

    /// Let the player fall onto the ground
    fn settled_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        // Keep enemies out of the way for movement tests
        for enemy in &mut state.entities.enemies {
            enemy.body.pos = Vec2::new(700.0, 50.0);
            enemy.body.prev_pos = enemy.body.pos;
            enemy.body.vel = Vec2::ZERO;
            enemy.body.allow_gravity = false;
        }
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.entities.player.body.on_ground());
        state
    }

    #[test]
    fn test_run_and_release() {
        let mut state = settled_state(1);

        let right = TickInput {
            horizontal: Horizontal::Right,
            jump: false,
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.entities.player.body.vel.x, PLAYER_RUN_SPEED);
        let x = state.entities.player.body.pos.x;
        assert!(x > 100.0);

        // Release: stops within the same tick
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.entities.player.body.vel.x, 0.0);
        assert_eq!(state.entities.player.body.pos.x, x);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = settled_state(2);
        let jump = TickInput {
            horizontal: Horizontal::Idle,
            jump: true,
        };

        tick(&mut state, &jump, SIM_DT);
        let vy = state.entities.player.body.vel.y;
        // Jump speed minus one step of gravity
        assert!((vy - (-PLAYER_JUMP_SPEED + GRAVITY * SIM_DT)).abs() < 0.01);
        assert!(!state.entities.player.body.on_ground());

        // Mid-air request leaves vertical velocity to gravity alone
        tick(&mut state, &jump, SIM_DT);
        let expected = vy + GRAVITY * SIM_DT;
        assert!((state.entities.player.body.vel.y - expected).abs() < 0.01);
    }

    #[test]
    fn test_enemy_contact_freezes_simulation() {
        let mut state = GameState::new(3);
        // Drop an enemy right onto the player
        let player_pos = state.entities.player.body.pos;
        let enemy = &mut state.entities.enemies[0];
        enemy.body.pos = player_pos + Vec2::new(10.0, 0.0);
        enemy.body.prev_pos = enemy.body.pos;
        enemy.body.vel = Vec2::ZERO;

        let right = TickInput {
            horizontal: Horizontal::Right,
            jump: false,
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.physics.is_paused());

        let frozen_pos = state.entities.player.body.pos;
        let frozen_vel = state.entities.player.body.vel;
        let ticks = state.time_ticks;

        let left_jump = TickInput {
            horizontal: Horizontal::Left,
            jump: true,
        };
        tick(&mut state, &left_jump, SIM_DT);
        assert_eq!(state.entities.player.body.pos, frozen_pos);
        assert_eq!(state.entities.player.body.vel, frozen_vel);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_walking_into_coin_collects_it() {
        let mut state = settled_state(4);
        // Park a coin on the ground just ahead of the player
        let player = state.entities.player.body.aabb();
        let coin_id = state.entities.coins[0].id;
        if let Some(coin) = state.entities.coin_mut(coin_id) {
            coin.body.pos = Vec2::new(player.max.x + 12.0, player.max.y - 10.0);
            coin.body.prev_pos = coin.body.pos;
            coin.body.vel = Vec2::ZERO;
        }

        let right = TickInput {
            horizontal: Horizontal::Right,
            jump: false,
        };
        // Six steps cover 16 units: enough to reach this coin, not the next one
        for _ in 0..6 {
            tick(&mut state, &right, SIM_DT);
        }

        assert_eq!(state.score, 1);
        assert_eq!(state.hud.score_text, "Score: 1");
        assert!(state.entities.coin(coin_id).is_some_and(|c| !c.active));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_coins_fall_and_settle() {
        let mut state = settled_state(5);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        for coin in state.entities.active_coins() {
            assert!(coin.body.pos.y > 0.0);
            assert!(coin.body.aabb().max.y <= 536.0 + 0.5);
        }
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                horizontal: Horizontal::Right,
                jump: false,
            },
            TickInput {
                horizontal: Horizontal::Right,
                jump: true,
            },
            TickInput {
                horizontal: Horizontal::Left,
                jump: false,
            },
            TickInput::default(),
        ];

        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(
            state1.entities.player.body.pos,
            state2.entities.player.body.pos
        );
        for (a, b) in state1.entities.enemies.iter().zip(&state2.entities.enemies) {
            assert_eq!(a.body.pos, b.body.pos);
        }
    }

    #[test]
    fn test_queue_drained_every_tick() {
        let mut state = GameState::new(6);
        let coin_id = state.entities.coins[0].id;
        state.events.push_back(GameEvent::CoinCollected { coin_id });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.is_empty());
        assert_eq!(state.score, 1);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (
            prop_oneof![
                Just(Horizontal::Left),
                Just(Horizontal::Right),
                Just(Horizontal::Idle)
            ],
            any::<bool>(),
        )
            .prop_map(|(horizontal, jump)| TickInput { horizontal, jump })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_enemies_stay_in_world(seed in any::<u64>(), inputs in prop::collection::vec(arb_input(), 1..600)) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                tick(&mut state, input, SIM_DT);
                for enemy in &state.entities.enemies {
                    let aabb = enemy.body.aabb();
                    prop_assert!(aabb.min.x >= -0.001);
                    prop_assert!(aabb.max.x <= WORLD_WIDTH + 0.001);
                }
            }
        }

        #[test]
        fn prop_player_speed_matches_intent(seed in any::<u64>(), inputs in prop::collection::vec(arb_input(), 1..200)) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                let was_over = state.is_game_over();
                let before = state.entities.player.body.vel.x;
                tick(&mut state, input, SIM_DT);
                let vx = state.entities.player.body.vel.x;
                if was_over {
                    prop_assert_eq!(vx, before);
                } else if state.is_game_over() {
                    // Contact tick: intent applied, then frozen
                    prop_assert!(vx.abs() <= PLAYER_RUN_SPEED + 0.001);
                } else if input.horizontal == Horizontal::Idle {
                    prop_assert_eq!(vx, 0.0);
                }
            }
        }
    }
}
