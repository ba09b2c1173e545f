//! Game entities: paddle, ball, walls and bricks
//!
//! Every entity shares a [`Body`] (the physics-facing part: position, size,
//! velocity, mass, elasticity, color). The set of entity kinds is closed;
//! collision responses branch on [`EntityKind`] instead of dynamic dispatch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::color::Color;
use crate::consts::*;
use crate::rotate_cw;

/// Closed set of entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Paddle,
    Ball,
    Wall,
    Brick,
}

/// Physics-facing state shared by all entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position (world units, y up)
    pub pos: Vec2,
    /// Full width and height
    pub size: Vec2,
    /// Units per frame
    pub vel: Vec2,
    /// 0 = static, never moved by the physics pass
    pub mass: f32,
    pub elasticity: f32,
    pub color: Color,
    /// Takes part in collision detection
    pub solid: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            mass: 1.0,
            elasticity: 0.0,
            color: Color::WHITE,
            solid: false,
        }
    }

    /// Static collidable body (walls, bricks, paddle)
    pub fn fixed(pos: Vec2, size: Vec2) -> Self {
        Self {
            mass: 0.0,
            solid: true,
            ..Self::new(pos, size)
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Axis-aligned box overlap test against another body
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        boxes_overlap(self.pos, self.size, other.pos, other.size)
    }
}

/// Axis-aligned box overlap for center/size boxes
#[inline]
pub fn boxes_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    (pos_a.x - pos_b.x).abs() * 2.0 < size_a.x + size_b.x
        && (pos_a.y - pos_b.y).abs() * 2.0 < size_a.y + size_b.y
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Body,
}

impl Default for Paddle {
    /// Starts against the left wall, as if the pointer were at x = 0
    fn default() -> Self {
        let mut paddle = Self {
            body: Body::fixed(Vec2::new(0.0, PADDLE_Y), PADDLE_SIZE),
        };
        paddle.follow(0.0);
        paddle
    }
}

impl Paddle {
    /// Snap to the pointer, keeping the whole paddle inside the level
    pub fn follow(&mut self, pointer_x: f32) {
        let half = self.body.size.x / 2.0;
        self.body.pos.x = pointer_x.clamp(half, LEVEL_SIZE.x - half);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: Body,
    /// Collisions so far (raises bounce pitch)
    pub hits: u32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        let mut body = Body::new(pos, Vec2::splat(BALL_SIZE));
        body.vel = BALL_START_VELOCITY;
        body.elasticity = 1.0;
        body.solid = true;
        Self { body, hits: 0 }
    }

    /// Collision response against `other`
    ///
    /// Returns true when the default elastic resolution should run, false
    /// when the collision is ignored or the ball already handled it.
    pub fn collide_with(
        &mut self,
        kind: EntityKind,
        other: &Body,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        // Already leaving the paddle
        if kind == EntityKind::Paddle && self.body.vel.y > 0.0 {
            return false;
        }

        events.push(GameEvent::Bounce {
            pos: self.body.pos,
            hits: self.hits,
        });
        self.hits += 1;

        if kind == EntityKind::Paddle {
            let dx = self.body.pos.x - other.pos.x;
            self.body.vel = rotate_cw(self.body.vel, PADDLE_DEFLECT * dx);
            self.body.vel.y = (-self.body.vel.y).max(BALL_MIN_BOUNCE_Y);
            return false;
        }

        let speed = (BALL_SPEEDUP * self.body.vel.length()).min(BALL_MAX_SPEED);
        self.body.vel = self.body.vel.normalize_or_zero() * speed;
        true
    }
}

/// Invisible static boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub body: Body,
}

impl Wall {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        let mut body = Body::fixed(pos, size);
        body.color = Color::CLEAR;
        Self { body }
    }
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub body: Body,
}

impl Brick {
    pub fn new(id: u32, pos: Vec2, color: Color) -> Self {
        let mut body = Body::fixed(pos, BRICK_SIZE);
        body.color = color;
        Self { id, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boxes_overlap() {
        let a = Body::fixed(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0));
        let b = Body::fixed(Vec2::new(1.2, 0.0), Vec2::new(0.5, 0.5));
        let c = Body::fixed(Vec2::new(1.3, 0.0), Vec2::new(0.5, 0.5));
        assert!(a.overlaps(&b));
        // Touching edges do not count
        assert!(!a.overlaps(&Body::fixed(Vec2::new(1.25, 0.0), Vec2::new(0.5, 0.5))));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_default_paddle_starts_inside_level() {
        let paddle = Paddle::default();
        assert_eq!(paddle.body.pos, Vec2::new(PADDLE_SIZE.x / 2.0, PADDLE_Y));
        assert!(paddle.body.is_static());
    }

    #[test]
    fn test_paddle_collision_ignored_when_moving_up() {
        let paddle = Paddle::default();
        let mut ball = Ball::new(Vec2::new(3.0, 1.2));
        ball.body.vel = Vec2::new(0.05, 0.1);
        let mut events = Vec::new();

        assert!(!ball.collide_with(EntityKind::Paddle, &paddle.body, &mut events));
        assert!(events.is_empty());
        assert_eq!(ball.hits, 0);
        assert_eq!(ball.body.vel, Vec2::new(0.05, 0.1));
    }

    #[test]
    fn test_paddle_collision_deflects_upward() {
        let mut paddle = Paddle::default();
        paddle.follow(10.0);
        let mut ball = Ball::new(Vec2::new(11.0, 1.3));
        let before = ball.body.vel;
        let mut events = Vec::new();

        let resolve = ball.collide_with(EntityKind::Paddle, &paddle.body, &mut events);
        assert!(!resolve, "paddle bounce overrides default response");

        let rotated = rotate_cw(before, PADDLE_DEFLECT * 1.0);
        assert!((ball.body.vel.x - rotated.x).abs() < 1e-6);
        assert!(ball.body.vel.y >= BALL_MIN_BOUNCE_Y);
        assert_eq!(ball.hits, 1);
        assert!(matches!(events[0], GameEvent::Bounce { hits: 0, .. }));
    }

    #[test]
    fn test_wall_collision_speeds_up() {
        let wall = Wall::new(Vec2::new(-0.5, 10.0), Vec2::new(1.0, 100.0));
        let mut ball = Ball::new(Vec2::new(0.1, 10.0));
        let speed = ball.body.vel.length();
        let dir = ball.body.vel.normalize();
        let mut events = Vec::new();

        assert!(ball.collide_with(EntityKind::Wall, &wall.body, &mut events));
        assert!((ball.body.vel.length() - speed * BALL_SPEEDUP).abs() < 1e-6);
        assert!(ball.body.vel.normalize().abs_diff_eq(dir, 1e-6));
    }

    #[test]
    fn test_walls_are_invisible_and_static() {
        let wall = Wall::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(wall.body.color.a, 0.0);
        assert!(wall.body.is_static());
        assert!(wall.body.solid);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_inside_level(x in -1000.0f32..1000.0) {
            let mut paddle = Paddle::default();
            paddle.follow(x);
            let half = PADDLE_SIZE.x / 2.0;
            prop_assert!(paddle.body.pos.x - half >= 0.0);
            prop_assert!(paddle.body.pos.x + half <= LEVEL_SIZE.x);
            prop_assert_eq!(paddle.body.pos.y, PADDLE_Y);
        }

        #[test]
        fn prop_speed_never_exceeds_cap(vx in -0.6f32..0.6, vy in -0.6f32..0.6, bounces in 1usize..200) {
            let brick = Brick::new(1, Vec2::new(10.0, 14.0), Color::WHITE);
            let mut ball = Ball::new(Vec2::new(10.0, 13.0));
            ball.body.vel = Vec2::new(vx, vy);
            let start = ball.body.vel.length();
            let mut events = Vec::new();
            for _ in 0..bounces {
                ball.collide_with(EntityKind::Brick, &brick.body, &mut events);
            }
            prop_assert!(ball.body.vel.length() <= BALL_MAX_SPEED.max(start) + 1e-5);
        }
    }
}
