//! Game state and score bookkeeping
//!
//! Everything the rules mutate lives in [`GameState`]; there are no globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Ball, Brick, Paddle, Wall};
use super::level;
use super::particles::{self, Particle};
use crate::consts::*;

/// Derived phase of the level lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bricks up, waiting for a click to spawn the ball
    Populated,
    /// Ball in play
    Active,
    /// All bricks cleared, waiting for a click to restart
    Won,
}

/// Things that happened during a frame, drained by the frontend (sound, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off something; `hits` is the count before this bounce
    Bounce { pos: Vec2, hits: u32 },
    /// A brick was destroyed
    BrickBroken { pos: Vec2 },
    BallSpawned,
    BallLost { combo: u32 },
    Won { score: u64 },
    LevelReset,
}

/// Score, combo and win bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    /// Combo at the moment the last ball was lost
    pub last_combo: u32,
    /// Frames left to show the "That combo was ..." message
    pub combo_message_ticks: u32,
    pub bricks_left: u32,
    pub won: bool,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub score: ScoreState,
    /// Simulation tick counter (drives animated HUD colors)
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Option<Ball>,
    pub walls: Vec<Wall>,
    /// Live bricks in creation order
    pub bricks: Vec<Brick>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Particle jitter only; gameplay never draws from it
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
    next_id: u32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// One-time setup: level, paddle and walls
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            score: ScoreState::default(),
            time_ticks: 0,
            paddle: Paddle::default(),
            ball: None,
            walls: level::build_walls(),
            bricks: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        level::init_level(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        if self.score.won {
            GamePhase::Won
        } else if self.ball.is_some() {
            GamePhase::Active
        } else {
            GamePhase::Populated
        }
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a ball at the level center
    pub fn spawn_ball(&mut self) {
        self.ball = Some(Ball::new(crate::level_center()));
        self.events.push(GameEvent::BallSpawned);
        log::info!("Ball spawned ({} bricks left)", self.score.bricks_left);
    }

    /// Brick collision response: the brick at `index` is destroyed
    ///
    /// Always allows the default collision response.
    pub fn break_brick(&mut self, index: usize) -> bool {
        let brick = self.bricks.remove(index);
        let pos = brick.body.pos;

        self.score.combo += 1;
        self.score.score += u64::from(self.score.combo);
        self.events.push(GameEvent::BrickBroken { pos });
        particles::emit_burst(&mut self.particles, &mut self.rng, pos, brick.body.color);
        self.score.bricks_left = self.score.bricks_left.saturating_sub(1);

        log::debug!(
            "Brick {} broken at ({:.0}, {:.0}), combo {}, score {}",
            brick.id,
            pos.x,
            pos.y,
            self.score.combo,
            self.score.score
        );
        true
    }

    /// Drop the ball after it fell out of the level
    pub fn lose_ball(&mut self) {
        self.ball = None;
        self.score.last_combo = self.score.combo;
        self.score.combo = 0;
        self.score.combo_message_ticks = COMBO_MESSAGE_TICKS;
        self.events.push(GameEvent::BallLost {
            combo: self.score.last_combo,
        });
        log::info!("Ball lost with combo {}", self.score.last_combo);
    }

    /// Mark the level as won
    pub fn win(&mut self) {
        self.score.won = true;
        self.ball = None;
        self.score.combo = 0;
        self.events.push(GameEvent::Won {
            score: self.score.score,
        });
        log::info!("Level cleared with score {}", self.score.score);
    }
}
