//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Aabb, BrickTier, GameState};

/// Segments used to tessellate the ball
const BALL_SEGMENTS: u32 = 32;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(aabb: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let l = aabb.left();
    let r = aabb.right();
    let t = aabb.top();
    let b = aabb.bottom();

    vec![
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

fn tier_color(tier: BrickTier) -> [f32; 4] {
    match tier {
        BrickTier::Violet => colors::BRICK_VIOLET,
        BrickTier::Yellow => colors::BRICK_YELLOW,
        BrickTier::Red => colors::BRICK_RED,
    }
}

/// Assemble the frame's vertex list from the round state
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for brick in state.bricks.iter().filter(|b| b.alive) {
        vertices.extend(rect(&brick.aabb(), tier_color(brick.tier)));
    }

    vertices.extend(rect(&state.paddle.aabb(), colors::PADDLE));
    vertices.extend(circle(
        state.ball.pos,
        state.ball.radius,
        colors::BALL,
        BALL_SEGMENTS,
    ));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn scene_skips_dead_bricks() {
        let mut state = GameState::new("alice");
        let full = scene(&state).len();

        state.brick_mut(0).unwrap().alive = false;
        let after = scene(&state).len();

        // One brick is one quad (two triangles)
        assert_eq!(full - after, 6);
    }
}
