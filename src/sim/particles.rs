//! Cosmetic particle bursts

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::color::Color;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 512;

/// Particles per brick burst (0.01 s of emission at 1000/s)
pub const BURST_COUNT: usize = 10;
/// Particle lifetime in frames (0.5 s)
pub const PARTICLE_LIFE: u32 = 30;
const SIZE_START: f32 = 0.1;
const SIZE_END: f32 = 1.0;
const MAX_SPEED: f32 = 0.1;
const DAMPING: f32 = 0.99;
const RANDOMNESS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub color_start: Color,
    pub color_end: Color,
}

impl Particle {
    /// 0 at birth, 1 at death
    pub fn age(&self) -> f32 {
        1.0 - self.life as f32 / self.max_life as f32
    }

    pub fn color(&self) -> Color {
        self.color_start.lerp(self.color_end, self.age())
    }

    pub fn size(&self) -> f32 {
        SIZE_START + (SIZE_END - SIZE_START) * self.age()
    }
}

/// Burst of particles fading from `color` to transparent
pub fn emit_burst(particles: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, color: Color) {
    for _ in 0..BURST_COUNT {
        if particles.len() >= MAX_PARTICLES {
            particles.remove(0);
        }

        let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
        let speed = MAX_SPEED * rng.random_range(1.0 - RANDOMNESS..=1.0) * rng.random::<f32>();
        let life_jitter = rng.random_range(0..=(PARTICLE_LIFE as f32 * RANDOMNESS) as u32);
        let life = PARTICLE_LIFE - life_jitter;

        particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            life,
            max_life: life,
            color_start: color,
            color_end: color.with_alpha(0.0),
        });
    }
}

/// Advance all particles by one frame and drop dead ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= DAMPING;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}
