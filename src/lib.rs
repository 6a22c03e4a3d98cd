//! Breakwall - a classic Breakout clone for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle, ball, bricks, round phases)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native storage abstraction
//! - `scores`: LocalStorage-backed leaderboard
//! - `auth`: Login/register placeholder in front of the leaderboard

pub mod auth;
pub mod platform;
pub mod renderer;
pub mod scores;
pub mod sim;

pub use scores::ScoreBoard;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y-down, origin top-left)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 640.0;

    /// Paddle defaults - slides along the bottom of the field
    pub const PADDLE_WIDTH: f32 = 128.0;
    pub const PADDLE_HEIGHT: f32 = 32.0;
    pub const PADDLE_Y: f32 = 565.0;
    pub const PADDLE_SPEED: f32 = 350.0;
    /// Horizontal speed gained on every paddle bounce
    pub const PADDLE_SPEEDUP: f32 = 5.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 16.0;
    pub const BALL_START_Y: f32 = 530.0;
    /// Vertical launch speed (upward)
    pub const BALL_LAUNCH_SPEED: f32 = 200.0;

    /// Brick wall layout: three tiers of ten columns
    pub const BRICK_WIDTH: f32 = 64.0;
    pub const BRICK_HEIGHT: f32 = 32.0;
    pub const BRICK_COLUMNS: u32 = 10;
    /// Center of the leftmost brick column
    pub const BRICK_FIRST_X: f32 = 80.0;
    /// Horizontal spacing between brick centers
    pub const BRICK_STEP_X: f32 = 70.0;
}
