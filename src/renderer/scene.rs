//! Scene drawing
//!
//! Back to front: sky, platforms, coins, enemies, player, HUD text, then the
//! touch buttons over everything.

use glam::Vec2;

use super::surface::{Color, Surface, TextStyle};
use crate::consts::{
    MESSAGE_COLOR, MESSAGE_FONT_SIZE, MESSAGE_POS, SCORE_COLOR, SCORE_FONT_SIZE, SCORE_POS,
    SKY_COLOR, TOUCH_BUTTON_ALPHA, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::platform::TouchControls;
use crate::sim::{Aabb, EntityKind, GameState};
use crate::textures::TextureCache;

/// Draw one frame of `state` onto `surface`
pub fn draw_scene(
    state: &GameState,
    textures: &TextureCache,
    touch: Option<&TouchControls>,
    surface: &mut impl Surface,
) {
    surface.fill_rect(
        Aabb::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
        Color::from_hex(SKY_COLOR),
    );

    let entities = &state.entities;

    let platform_color = textures.color_for(EntityKind::Platform);
    for platform in &entities.platforms {
        surface.fill_rect(platform.body.aabb(), platform_color);
    }

    let coin_color = textures.color_for(EntityKind::Coin);
    for coin in entities.active_coins() {
        surface.fill_rect(coin.body.aabb(), coin_color);
    }

    let enemy_color = textures.color_for(EntityKind::Enemy);
    for enemy in &entities.enemies {
        surface.fill_rect(enemy.body.aabb(), enemy_color);
    }

    let player = &entities.player;
    let mut player_color = textures.color_for(EntityKind::Player);
    if let Some(tint) = player.tint {
        player_color = player_color.tinted(tint);
    }
    surface.fill_rect(player.body.aabb(), player_color);

    surface.draw_text(
        Vec2::from(SCORE_POS),
        &state.hud.score_text,
        TextStyle {
            font_size: SCORE_FONT_SIZE,
            color: Color::from_hex(SCORE_COLOR),
        },
    );
    if let Some(message) = &state.hud.message {
        surface.draw_text(
            Vec2::from(MESSAGE_POS),
            message,
            TextStyle {
                font_size: MESSAGE_FONT_SIZE,
                color: Color::from_hex(MESSAGE_COLOR),
            },
        );
    }

    if let Some(touch) = touch {
        let overlay = Color::from_hex(0x000000).with_alpha(TOUCH_BUTTON_ALPHA);
        for zone in touch.zones() {
            surface.fill_rect(zone.rect, overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{DrawCommand, DrawList};

    fn draw(state: &GameState, touch: Option<&TouchControls>) -> DrawList {
        let mut list = DrawList::new(WORLD_WIDTH, WORLD_HEIGHT);
        draw_scene(state, &TextureCache::generate(), touch, &mut list);
        list
    }

    #[test]
    fn test_initial_frame() {
        let state = GameState::new(1);
        let list = draw(&state, None);

        // sky + 4 platforms + 12 coins + 2 enemies + player
        assert_eq!(list.rects().count(), 20);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Score: 0"]);

        let (first, sky) = list.rects().next().unwrap();
        assert_eq!(*sky, Color::from_hex(SKY_COLOR));
        assert_eq!(first.size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_collected_coins_not_drawn() {
        let mut state = GameState::new(1);
        let id = state.entities.coins[0].id;
        assert!(state.collect_coin(id));

        let list = draw(&state, None);
        assert_eq!(list.rects().count(), 19);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Score: 1"]);
    }

    #[test]
    fn test_game_over_frame() {
        let mut state = GameState::new(1);
        state.hit_enemy();
        let list = draw(&state, None);

        assert_eq!(
            list.texts().collect::<Vec<_>>(),
            vec!["Score: 0", "Game Over!"]
        );
        // Player is the last rect; blue under a red tint goes black
        let (_, player) = list.rects().last().unwrap();
        assert_eq!(player.to_array(), [0.0, 0.0, 0.0, 1.0]);

        match list.commands().last() {
            Some(DrawCommand::Text { pos, style, .. }) => {
                assert_eq!(*pos, Vec2::new(300.0, 250.0));
                assert_eq!(style.font_size, 64.0);
                assert_eq!(style.color, Color::from_hex(0xFF0000));
            }
            other => panic!("expected game over label, got {:?}", other),
        }
    }

    #[test]
    fn test_touch_overlays_drawn_last() {
        let state = GameState::new(1);
        let touch = TouchControls::new(800.0, 600.0);
        let list = draw(&state, Some(&touch));

        let overlays: Vec<_> = list.commands().iter().rev().take(3).collect();
        for command in overlays {
            match command {
                DrawCommand::Rect { rect, color } => {
                    assert_eq!(rect.size(), Vec2::splat(100.0));
                    assert_eq!(color.a, 0.5);
                }
                other => panic!("expected overlay rect, got {:?}", other),
            }
        }
    }
}
