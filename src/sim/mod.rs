//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed 60 Hz timestep, velocities in units per frame
//! - Seeded RNG only (and only for cosmetic particles)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod entity;
pub mod level;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use entity::{Ball, Body, Brick, EntityKind, Paddle, Wall};
pub use level::init_level;
pub use particles::Particle;
pub use state::{GameEvent, GamePhase, GameState, ScoreState};
pub use tick::{TickInput, tick};
