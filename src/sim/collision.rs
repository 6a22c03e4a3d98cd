//! Circle-vs-rectangle collision detection and response
//!
//! Everything on the field is either the ball (a circle) or an
//! axis-aligned box (paddle, bricks), so closest-point tests cover all
//! contacts.

use glam::Vec2;

/// Axis-aligned box, stored as center + half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    /// Upper edge (y-down coordinates: top has the smaller y)
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Closest point on (or in) the box to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between the ball and an axis-aligned box.
///
/// Returns the contact point, the outward surface normal, and the
/// penetration depth for position correction.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Aabb) -> CollisionResult {
    let closest = rect.closest_point(ball_pos);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-6 {
        // Ball center outside the box: normal points from the contact
        // point toward the ball center.
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Ball center inside the box (tunneling with a large step): push out
    // along the axis of least overlap.
    let offset = ball_pos - rect.center;
    let overlap_x = rect.half.x - offset.x.abs();
    let overlap_y = rect.half.y - offset.y.abs();

    let (normal, penetration) = if overlap_x < overlap_y {
        (Vec2::new(offset.x.signum(), 0.0), overlap_x + ball_radius)
    } else {
        (Vec2::new(0.0, offset.y.signum()), overlap_y + ball_radius)
    };

    CollisionResult {
        hit: true,
        point: ball_pos,
        normal,
        penetration,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_above_brick_hits_with_upward_normal() {
        // Brick centered at (100, 100), 64x32; ball just above its top edge
        let brick = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0));
        let ball_pos = Vec2::new(100.0, 100.0 - 16.0 - 10.0);

        let result = ball_rect_collision(ball_pos, 16.0, &brick);
        assert!(result.hit);
        // y-down coords: the normal toward a ball above the brick points up (-y)
        assert!((result.normal.y - (-1.0)).abs() < 1e-5);
        assert!(result.normal.x.abs() < 1e-5);
        assert!(result.penetration > 0.0);
    }

    #[test]
    fn ball_clear_of_brick_misses() {
        let brick = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0));
        let result = ball_rect_collision(Vec2::new(300.0, 300.0), 16.0, &brick);
        assert!(!result.hit);
    }

    #[test]
    fn corner_contact_gets_diagonal_normal() {
        let brick = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0));
        // Just off the bottom-right corner (132, 116)
        let ball_pos = Vec2::new(132.0 + 8.0, 116.0 + 8.0);

        let result = ball_rect_collision(ball_pos, 16.0, &brick);
        assert!(result.hit);
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
        assert!((result.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn center_inside_rect_pushes_out_least_axis() {
        let brick = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0));
        // Inside, nearer the top edge than the sides
        let result = ball_rect_collision(Vec2::new(100.0, 90.0), 16.0, &brick);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn reflect_flips_normal_component_only() {
        let velocity = Vec2::new(60.0, 200.0);
        let reflected = reflect(velocity, Vec2::new(0.0, -1.0));
        assert!((reflected.x - 60.0).abs() < 1e-5);
        assert!((reflected.y - (-200.0)).abs() < 1e-5);
    }
}
