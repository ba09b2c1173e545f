//! Combo Breakout - a single-level brick breaker with combo scoring
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, physics pass, game rules)
//! - `hud`: Render-time HUD text model
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound effects
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod color;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, velocities are in units per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area size in world units
    pub const LEVEL_SIZE: Vec2 = Vec2::new(38.0, 20.0);

    /// Fixed canvas size in pixels (720p)
    pub const CANVAS_SIZE: (u32, u32) = (1280, 720);
    /// Pixels per world unit
    pub const CAMERA_SCALE: f32 = 32.0;

    /// Paddle defaults
    pub const PADDLE_Y: f32 = 1.0;
    pub const PADDLE_SIZE: Vec2 = Vec2::new(6.0, 0.5);

    /// Ball defaults
    pub const BALL_SIZE: f32 = 0.5;
    pub const BALL_START_VELOCITY: Vec2 = Vec2::new(-0.1, -0.1);
    /// Absolute speed cap (units per frame)
    pub const BALL_MAX_SPEED: f32 = 0.5;
    /// Multiplicative speed-up on wall/brick hits
    pub const BALL_SPEEDUP: f32 = 1.04;
    /// Minimum upward speed after a paddle hit
    pub const BALL_MIN_BOUNCE_Y: f32 = 0.2;
    /// Radians of deflection per unit of paddle offset
    pub const PADDLE_DEFLECT: f32 = 0.3;
    /// Ball is lost once it falls below this height
    pub const BALL_LOSS_Y: f32 = -1.0;

    /// Brick grid: x in [BRICK_X_START, LEVEL_SIZE.x - 2] step 2,
    /// y in [BRICK_Y_START, LEVEL_SIZE.y - 2] step 1
    pub const BRICK_SIZE: Vec2 = Vec2::new(2.0, 1.0);
    pub const BRICK_X_START: u32 = 2;
    pub const BRICK_Y_START: u32 = 12;
    pub const BRICK_X_STEP: u32 = 2;
    pub const BRICK_Y_STEP: u32 = 1;
    pub const BRICK_MARGIN: u32 = 2;

    /// Frames the "That combo was ..." message stays up
    pub const COMBO_MESSAGE_TICKS: u32 = 130;
}

/// Center of the play area (camera target and ball spawn point)
#[inline]
pub fn level_center() -> Vec2 {
    consts::LEVEL_SIZE * 0.5
}

/// Rotate a vector clockwise by `angle` radians (engine convention)
#[inline]
pub fn rotate_cw(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(-angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_cw_quarter_turn() {
        let v = rotate_cw(Vec2::new(0.0, 1.0), FRAC_PI_2);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn test_level_center() {
        assert_eq!(level_center(), Vec2::new(19.0, 10.0));
    }
}
