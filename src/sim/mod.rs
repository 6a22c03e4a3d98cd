//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable contact-scan order (tier, then brick id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionResult, ball_rect_collision, reflect};
pub use state::{Ball, Brick, BrickTier, GameState, Paddle, RoundOutcome, RoundPhase, Session};
pub use tick::{GameEvent, TickInput, apply_contacts, detect_contacts, tick};
