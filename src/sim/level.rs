//! Level construction: walls and the brick grid

use glam::Vec2;

use super::entity::{Brick, Wall};
use super::state::GameState;
use crate::color::Color;
use crate::consts::*;

/// Grid cells covered by bricks, column by column
pub fn brick_grid() -> impl Iterator<Item = (u32, u32)> {
    let x_end = LEVEL_SIZE.x as u32 - BRICK_MARGIN;
    let y_end = LEVEL_SIZE.y as u32 - BRICK_MARGIN;
    (BRICK_X_START..=x_end)
        .step_by(BRICK_X_STEP as usize)
        .flat_map(move |x| {
            (BRICK_Y_START..=y_end)
                .step_by(BRICK_Y_STEP as usize)
                .map(move |y| (x, y))
        })
}

/// Hue rotation keyed by grid position
pub fn brick_color(x: u32, y: u32) -> Color {
    let hue = ((x + y) * 20 % 360) as f32 / 360.0;
    Color::hsl(hue, 1.0, 0.5)
}

/// Left, right and top boundaries; the bottom stays open
pub fn build_walls() -> Vec<Wall> {
    let w = LEVEL_SIZE.x;
    let h = LEVEL_SIZE.y;
    vec![
        Wall::new(Vec2::new(-0.5, h / 2.0), Vec2::new(1.0, 100.0)),
        Wall::new(Vec2::new(w + 0.5, h / 2.0), Vec2::new(1.0, 100.0)),
        Wall::new(Vec2::new(w / 2.0, h + 0.5), Vec2::new(100.0, 1.0)),
    ]
}

/// Reset score state and rebuild the brick grid
///
/// Clears the whole brick collection before rebuilding. The combo message
/// countdown is left running.
pub fn init_level(state: &mut GameState) {
    state.score.score = 0;
    state.score.combo = 0;
    state.score.won = false;
    state.ball = None;

    state.bricks.clear();
    for (x, y) in brick_grid() {
        let id = state.next_entity_id();
        let pos = Vec2::new(x as f32, y as f32);
        state.bricks.push(Brick::new(id, pos, brick_color(x, y)));
    }
    state.score.bricks_left = state.bricks.len() as u32;

    log::info!("Level initialized with {} bricks", state.score.bricks_left);
}
