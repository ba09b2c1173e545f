//! Fixed timestep simulation tick
//!
//! One call to [`tick`] is one 60 Hz frame: game rules ([`update`]), then the
//! object pass (paddle, ball physics, particles), then [`update_post`].

use super::particles;
use super::physics;
use super::state::{GameEvent, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer horizontal position in world units
    pub pointer_x: Option<f32>,
    /// Primary button was pressed since the last tick
    pub primary_pressed: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    update(state, input);
    update_objects(state, input);
    update_post(state);
}

/// Per-frame game rules: win, ball loss, spawn, restart, message countdown
pub fn update(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if state.score.bricks_left == 0 && !state.score.won {
        state.win();
    }

    if state.ball.as_ref().is_some_and(physics::ball_lost) {
        state.lose_ball();
    }

    if state.ball.is_none() && input.primary_pressed && !state.score.won {
        state.spawn_ball();
    }

    if state.score.won && input.primary_pressed {
        super::level::init_level(state);
        state.events.push(GameEvent::LevelReset);
    }

    if state.score.combo_message_ticks > 0 {
        state.score.combo_message_ticks -= 1;
    }
}

/// Object pass: paddle follows the pointer, the ball moves and collides
pub fn update_objects(state: &mut GameState, input: &TickInput) {
    // Without a pointer the paddle holds its place, still clamped
    let x = input.pointer_x.unwrap_or(state.paddle.body.pos.x);
    state.paddle.follow(x);

    physics::step(state);

    particles::update_particles(&mut state.particles);
}

/// Runs after physics; nothing to do for this game
pub fn update_post(_state: &mut GameState) {}
