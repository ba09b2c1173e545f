//! Shape generation for 2D primitives
//!
//! Everything is tessellated in world units; the pipeline maps to NDC.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::color::Color;
use crate::consts::LEVEL_SIZE;
use crate::settings::Settings;
use crate::sim::{Body, GameState};

/// Size of the backdrop quad drawn behind the level
const BACKGROUND_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(center: Vec2, size: Vec2, color: Color) -> [Vertex; 6] {
    let half = size * 0.5;
    let (min, max) = (center - half, center + half);
    let c = color.to_array();

    [
        Vertex::new(min.x, min.y, c),
        Vertex::new(max.x, min.y, c),
        Vertex::new(max.x, max.y, c),
        Vertex::new(min.x, min.y, c),
        Vertex::new(max.x, max.y, c),
        Vertex::new(min.x, max.y, c),
    ]
}

fn push_body(vertices: &mut Vec<Vertex>, body: &Body) {
    vertices.extend_from_slice(&rect(body.pos, body.size, body.color));
}

/// Build the whole frame in draw order
///
/// Backdrop and level first, then bricks, paddle, ball and particles on top.
/// Walls are invisible.
pub fn scene(state: &GameState, camera: Vec2, settings: &Settings) -> Vec<Vertex> {
    let particle_count = state.particles.len().min(settings.particle_cap());
    let quads = 3 + state.bricks.len() + particle_count;
    let mut vertices = Vec::with_capacity(quads * 6);

    vertices.extend_from_slice(&rect(camera, BACKGROUND_SIZE, colors::BACKGROUND));
    vertices.extend_from_slice(&rect(LEVEL_SIZE * 0.5, LEVEL_SIZE, colors::LEVEL));

    for brick in &state.bricks {
        push_body(&mut vertices, &brick.body);
    }
    push_body(&mut vertices, &state.paddle.body);
    if let Some(ball) = &state.ball {
        push_body(&mut vertices, &ball.body);
    }

    // Newest particles are at the end; keep those when capped
    let skip = state.particles.len() - particle_count;
    for particle in &state.particles[skip..] {
        let size = Vec2::splat(particle.size());
        vertices.extend_from_slice(&rect(particle.pos, size, particle.color()));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let verts = rect(Vec2::new(2.0, 1.0), Vec2::new(4.0, 2.0), Color::WHITE);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 2.0);
        assert!(verts.iter().all(|v| v.color == [1.0; 4]));
    }

    #[test]
    fn test_fresh_scene() {
        let state = GameState::new(1);
        let verts = scene(&state, crate::level_center(), &Settings::default());
        // backdrop, level, 126 bricks, paddle
        assert_eq!(verts.len(), (2 + 126 + 1) * 6);
        assert_eq!(verts[0].color, colors::BACKGROUND.to_array());
        assert_eq!(verts[6].color, colors::LEVEL.to_array());
    }

    #[test]
    fn test_ball_and_particles_drawn() {
        let mut state = GameState::new(1);
        state.spawn_ball();
        state.break_brick(0);
        let particles = state.particles.len();
        assert!(particles > 0);

        let verts = scene(&state, crate::level_center(), &Settings::default());
        assert_eq!(verts.len(), (2 + 125 + 2 + particles) * 6);
    }

    #[test]
    fn test_particles_respect_cap() {
        let mut state = GameState::new(1);
        state.break_brick(0);
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        let verts = scene(&state, crate::level_center(), &settings);
        assert_eq!(verts.len(), (2 + 125 + 1) * 6);
    }
}
