//! Demo mode: steers the paddle on its own
//!
//! Used by the native headless runner and by the web build when demo mode is
//! enabled in settings.

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Frames to wait before pressing again, so messages stay readable
const PRESS_DELAY_TICKS: u64 = 45;

/// Produce the input a simple player would give this frame
pub fn steer(state: &GameState) -> TickInput {
    let pressed = match state.phase() {
        GamePhase::Active => false,
        GamePhase::Populated | GamePhase::Won => state.time_ticks % PRESS_DELAY_TICKS == 0,
    };

    let pointer_x = state.ball.as_ref().map(|ball| {
        let body = &ball.body;
        // Lead the ball to where it will cross the paddle line when falling
        let target = if body.vel.y < 0.0 {
            let frames = ((body.pos.y - PADDLE_Y) / -body.vel.y).max(0.0);
            reflect_into_level(body.pos.x + body.vel.x * frames)
        } else {
            body.pos.x
        };

        // Off-center contact varies the rebound angle
        let time_factor = state.time_ticks as f32 * 0.01;
        let offset = time_factor.sin() * 1.2 + (time_factor * 0.7).sin() * 0.6;
        target + offset
    });

    TickInput {
        pointer_x,
        primary_pressed: pressed,
    }
}

/// Fold a predicted x back into the level as if it bounced off the side walls
fn reflect_into_level(x: f32) -> f32 {
    let width = LEVEL_SIZE.x;
    let period = 2.0 * width;
    let folded = x.rem_euclid(period);
    if folded > width { period - folded } else { folded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::tick;

    #[test]
    fn test_reflect_into_level() {
        assert_eq!(reflect_into_level(10.0), 10.0);
        assert_eq!(reflect_into_level(-3.0), 3.0);
        assert_eq!(reflect_into_level(40.0), 36.0);
    }

    #[test]
    fn test_presses_when_idle() {
        let state = GameState::new(1);
        assert_eq!(state.time_ticks, 0);
        assert!(steer(&state).primary_pressed);
        assert!(steer(&state).pointer_x.is_none());
    }

    #[test]
    fn test_autopilot_breaks_bricks() {
        use crate::sim::GameEvent;

        let mut state = GameState::new(7);
        let mut broken = 0;
        for _ in 0..6000 {
            let input = steer(&state);
            tick(&mut state, &input);
            broken += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::BrickBroken { .. }))
                .count();
        }
        assert!(broken > 0);
    }
}
