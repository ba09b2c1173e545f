//! Physics pass: velocity integration and box collision resolution
//!
//! Only the ball moves, and only while it has mass. Each frame it is integrated by its velocity, then
//! tested against every solid object. For each overlap both collision
//! responses run (ball first, then the other object) and the default
//! elastic resolution applies only when both allow it.

use glam::Vec2;

use super::entity::{Ball, Body, EntityKind};
use super::state::GameState;

/// Separation added when pushing a body out of a static one
const SEPARATION_EPSILON: f32 = 0.001;
/// Nudge applied when the ball was already inside the other object
const PUSH_AWAY_ACCEL: f32 = 0.001;

/// Engine sign: zero counts as positive
#[inline]
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Move the ball and resolve its collisions for one frame
pub fn step(state: &mut GameState) {
    let Some(mut ball) = state.ball.take() else {
        return;
    };

    let old_pos = ball.body.pos;
    if !ball.body.is_static() {
        ball.body.pos += ball.body.vel;
    }

    let paddle = state.paddle.body;
    if paddle.solid && ball.body.overlaps(&paddle) {
        let resolve = ball.collide_with(EntityKind::Paddle, &paddle, &mut state.events);
        if resolve {
            resolve_static(&mut ball.body, old_pos, &paddle);
        }
    }

    for i in 0..state.walls.len() {
        let wall = state.walls[i].body;
        if !wall.solid || !ball.body.overlaps(&wall) {
            continue;
        }
        if ball.collide_with(EntityKind::Wall, &wall, &mut state.events) {
            resolve_static(&mut ball.body, old_pos, &wall);
        }
    }

    // Bricks remove themselves on hit, so only advance past misses
    let mut i = 0;
    while i < state.bricks.len() {
        let brick = state.bricks[i].body;
        if !brick.solid || !ball.body.overlaps(&brick) {
            i += 1;
            continue;
        }
        let ball_allows = ball.collide_with(EntityKind::Brick, &brick, &mut state.events);
        let brick_allows = state.break_brick(i);
        if ball_allows && brick_allows {
            resolve_static(&mut ball.body, old_pos, &brick);
        }
    }

    state.ball = Some(ball);
}

/// Default collision resolution of a moving body against a static one
///
/// `old_pos` is the moving body's position before this frame's integration.
pub fn resolve_static(body: &mut Body, old_pos: Vec2, other: &Body) {
    // Already overlapping before the move: push apart instead of bouncing
    if super::entity::boxes_overlap(old_pos, body.size, other.pos, other.size) {
        let delta = old_pos - other.pos;
        let len = delta.length();
        let push = if len < 0.01 {
            Vec2::Y * PUSH_AWAY_ACCEL
        } else {
            delta * (PUSH_AWAY_ACCEL / len)
        };
        body.vel += push;
        return;
    }

    let size_both = body.size + other.size;
    let elasticity = body.elasticity.max(other.elasticity);
    let step_up = (old_pos.y - other.pos.y) * 2.0 > size_both.y;
    let blocked_x = (old_pos.y - other.pos.y).abs() * 2.0 < size_both.y;
    let blocked_y = (old_pos.x - other.pos.x).abs() * 2.0 < size_both.x;

    if step_up || blocked_y || !blocked_x {
        body.pos.y =
            other.pos.y + (size_both.y / 2.0 + SEPARATION_EPSILON) * sign(old_pos.y - other.pos.y);
        body.vel.y *= -elasticity;
    }
    if blocked_x {
        body.pos.x =
            other.pos.x + (size_both.x / 2.0 + SEPARATION_EPSILON) * sign(old_pos.x - other.pos.x);
        body.vel.x *= -elasticity;
    }
}

/// Whether the ball has fallen out through the open bottom
#[inline]
pub fn ball_lost(ball: &Ball) -> bool {
    ball.body.pos.y < crate::consts::BALL_LOSS_Y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::GameEvent;

    fn state_with_ball(pos: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new(11);
        state.spawn_ball();
        state.drain_events();
        if let Some(ball) = state.ball.as_mut() {
            ball.body.pos = pos;
            ball.body.vel = vel;
        }
        state
    }

    #[test]
    fn test_free_flight_integrates_velocity() {
        let mut state = state_with_ball(Vec2::new(19.0, 8.0), Vec2::new(-0.1, -0.1));
        step(&mut state);
        let ball = state.ball.as_ref().unwrap();
        assert!(ball.body.pos.abs_diff_eq(Vec2::new(18.9, 7.9), 1e-5));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_left_wall_reflects_and_speeds_up() {
        let mut state = state_with_ball(Vec2::new(0.3, 8.0), Vec2::new(-0.1, -0.05));
        step(&mut state);
        let ball = state.ball.as_ref().unwrap();
        assert!(ball.body.vel.x > 0.0, "horizontal velocity reflected");
        assert!(ball.body.vel.y < 0.0, "vertical velocity kept");
        let expected = Vec2::new(0.1, 0.05).length() * BALL_SPEEDUP;
        assert!((ball.body.vel.length() - expected).abs() < 1e-5);
        // Pushed back out of the wall
        assert!(ball.body.pos.x - BALL_SIZE / 2.0 >= 0.0);
    }

    #[test]
    fn test_brick_hit_destroys_brick_and_bounces() {
        // Column x=2 bottom brick sits at y=12, spanning 11.5..12.5
        let mut state = state_with_ball(Vec2::new(2.0, 11.0), Vec2::new(0.0, 0.3));
        let left = state.score.bricks_left;
        step(&mut state);

        assert_eq!(state.score.bricks_left, left - 1);
        assert_eq!(state.score.combo, 1);
        assert_eq!(state.score.score, 1);
        let ball = state.ball.as_ref().unwrap();
        assert!(ball.body.vel.y < 0.0, "ball bounced back down");
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::BrickBroken { .. })));
        assert!(!state.bricks.iter().any(|b| b.body.pos == Vec2::new(2.0, 12.0)));
    }

    #[test]
    fn test_paddle_hit_overrides_default_bounce() {
        let mut state = state_with_ball(Vec2::new(20.0, 1.6), Vec2::new(-0.1, -0.2));
        state.paddle.follow(19.0);
        step(&mut state);

        let ball = state.ball.as_ref().unwrap();
        assert!(ball.body.vel.y >= BALL_MIN_BOUNCE_Y);
        // No positional correction from the default response
        assert!(ball.body.pos.abs_diff_eq(Vec2::new(19.9, 1.4), 1e-5));
    }

    #[test]
    fn test_massless_ball_is_not_integrated() {
        let mut state = state_with_ball(Vec2::new(19.0, 8.0), Vec2::new(-0.1, -0.1));
        if let Some(ball) = state.ball.as_mut() {
            ball.body.mass = 0.0;
        }
        step(&mut state);
        let ball = state.ball.as_ref().unwrap();
        assert!(ball.body.is_static());
        assert_eq!(ball.body.pos, Vec2::new(19.0, 8.0));
    }

    #[test]
    fn test_ball_lost_below_threshold() {
        let mut ball = Ball::new(Vec2::new(5.0, -0.9));
        assert!(!ball_lost(&ball));
        ball.body.pos.y = -1.5;
        assert!(ball_lost(&ball));
    }
}
