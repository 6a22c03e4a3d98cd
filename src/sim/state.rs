//! Round state and playfield entities
//!
//! All coordinates are y-down with the origin at the top-left of the
//! 800x640 field, matching screen space.

use glam::Vec2;

use super::collision::Aabb;
use crate::consts::*;

/// How a finished round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Ball escaped below the paddle
    GameOver,
    /// Every brick destroyed
    Won,
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Ball resting above the paddle, waiting for the start input
    Waiting,
    /// Active gameplay
    Playing,
    /// Terminal until the page is reloaded
    Ended(RoundOutcome),
}

/// Brick color tiers, top row to bottom row: red, yellow, violet.
///
/// Variant order is the contact-scan order (violet first), which fixes
/// the per-tick processing sequence when the ball overlaps more than one
/// brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickTier {
    Violet,
    Yellow,
    Red,
}

impl BrickTier {
    pub const ALL: [BrickTier; 3] = [BrickTier::Violet, BrickTier::Yellow, BrickTier::Red];

    /// Row center height for this tier
    pub fn row_y(&self) -> f32 {
        match self {
            BrickTier::Violet => 140.0,
            BrickTier::Yellow => 90.0,
            BrickTier::Red => 40.0,
        }
    }
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub id: u32,
    pub tier: BrickTier,
    pub pos: Vec2,
    /// Cleared bricks stay in the list (ids remain stable) but are dead
    pub alive: bool,
}

impl Brick {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BRICK_WIDTH, BRICK_HEIGHT))
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub pos: Vec2,
    /// Horizontal velocity, set fresh from input each tick
    pub vel_x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, PADDLE_Y),
            vel_x: 0.0,
        }
    }
}

impl Paddle {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT))
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, BALL_START_Y),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Per-round session: who is playing and what they scored so far.
///
/// Built at round start from the persisted username, folded into the
/// score store when the round ends, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub score: u32,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            score: 0,
        }
    }
}

/// Complete round state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: RoundPhase,
    pub session: Session,
    pub paddle: Paddle,
    pub ball: Ball,
    /// All bricks, dead ones included; sorted by id
    pub bricks: Vec<Brick>,
}

impl GameState {
    /// Fresh round for `username`: full brick wall, ball on the paddle,
    /// waiting for the start input.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            phase: RoundPhase::Waiting,
            session: Session::new(username),
            paddle: Paddle::default(),
            ball: Ball::default(),
            bricks: build_brick_wall(),
        }
    }

    pub fn brick(&self, id: u32) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    pub fn brick_mut(&mut self, id: u32) -> Option<&mut Brick> {
        self.bricks.iter_mut().find(|b| b.id == id)
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }
}

/// Lay out the three tiers of ten bricks.
///
/// Ids run left to right within a tier, violet tier first, so ascending
/// id order equals the contact-scan order.
fn build_brick_wall() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BrickTier::ALL.len() * BRICK_COLUMNS as usize);
    let mut next_id = 0;

    for tier in BrickTier::ALL {
        for column in 0..BRICK_COLUMNS {
            bricks.push(Brick {
                id: next_id,
                tier,
                pos: Vec2::new(BRICK_FIRST_X + column as f32 * BRICK_STEP_X, tier.row_y()),
                alive: true,
            });
            next_id += 1;
        }
    }

    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_has_full_wall_and_resting_ball() {
        let state = GameState::new("alice");
        assert_eq!(state.phase, RoundPhase::Waiting);
        assert_eq!(state.bricks.len(), 30);
        assert_eq!(state.bricks_remaining(), 30);
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn brick_ids_follow_scan_order() {
        let state = GameState::new("alice");
        // Sorted, contiguous ids
        assert!(state.bricks.windows(2).all(|w| w[1].id == w[0].id + 1));
        // Violet tier occupies the first ten ids, left to right
        assert_eq!(state.bricks[0].tier, BrickTier::Violet);
        assert_eq!(state.bricks[9].tier, BrickTier::Violet);
        assert_eq!(state.bricks[10].tier, BrickTier::Yellow);
        assert_eq!(state.bricks[20].tier, BrickTier::Red);
        assert!(state.bricks[1].pos.x > state.bricks[0].pos.x);
    }

    #[test]
    fn bricks_stay_inside_the_field() {
        for brick in build_brick_wall() {
            let aabb = brick.aabb();
            assert!(aabb.left() >= 0.0);
            assert!(aabb.right() <= crate::consts::FIELD_WIDTH);
        }
    }
}
