//! Fixed timestep round tick
//!
//! Advances one round deterministically. Contacts are resolved in a fixed
//! scan order (violet tier, yellow, red, each left to right, paddle last)
//! so scoring replays identically for identical input sequences.

use glam::Vec2;

use super::collision::{ball_rect_collision, reflect};
use super::state::{Ball, BrickTier, GameState, RoundOutcome, RoundPhase};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held; overrides left when both are down)
    pub right: bool,
    /// Begin the round (one-shot)
    pub start: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A live brick was struck and removed from play
    BrickHit(u32),
    /// The ball bounced off the paddle
    PaddleHit,
    /// The round reached a terminal state
    RoundEnded(RoundOutcome),
}

/// Advance the round by one fixed timestep.
///
/// Returns the events the step produced; the caller reacts to
/// `RoundEnded` by folding the session score into the score store.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        RoundPhase::Waiting => {
            // Entry guard: a signed-in user and the start input
            if input.start && !state.session.username.is_empty() {
                state.ball.vel = Vec2::new(0.0, -BALL_LAUNCH_SPEED);
                state.phase = RoundPhase::Playing;
            }
        }

        RoundPhase::Playing => {
            move_paddle(state, input, dt);
            state.ball.pos += state.ball.vel * dt;
            bounce_off_walls(&mut state.ball);

            let contacts = detect_contacts(state);
            events.extend(apply_contacts(state, &contacts));

            // Terminal checks: the loss condition takes precedence
            if state.ball.pos.y > FIELD_HEIGHT {
                end_round(state, RoundOutcome::GameOver, &mut events);
            } else if state.bricks_remaining() == 0 {
                end_round(state, RoundOutcome::Won, &mut events);
            }
        }

        // Terminal until the page is reloaded
        RoundPhase::Ended(_) => {}
    }

    events
}

/// Set paddle velocity from held input and integrate, clamped to the field.
fn move_paddle(state: &mut GameState, input: &TickInput, dt: f32) {
    let paddle = &mut state.paddle;

    paddle.vel_x = 0.0;
    if input.left {
        paddle.vel_x = -PADDLE_SPEED;
    }
    if input.right {
        paddle.vel_x = PADDLE_SPEED;
    }

    let half = PADDLE_WIDTH / 2.0;
    paddle.pos.x = (paddle.pos.x + paddle.vel_x * dt).clamp(half, FIELD_WIDTH - half);
}

/// Reflect the ball off the side and top walls. The bottom is open.
fn bounce_off_walls(ball: &mut Ball) {
    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x = ball.vel.x.abs();
    }
    if ball.pos.x + ball.radius > FIELD_WIDTH {
        ball.pos.x = FIELD_WIDTH - ball.radius;
        ball.vel.x = -ball.vel.x.abs();
    }
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
    }
}

/// Scan for contacts in the fixed order: violet tier, then yellow, then
/// red, ascending brick id within a tier, paddle last.
pub fn detect_contacts(state: &GameState) -> Vec<GameEvent> {
    let mut contacts = Vec::new();

    for tier in BrickTier::ALL {
        for brick in state.bricks.iter().filter(|b| b.alive && b.tier == tier) {
            if ball_rect_collision(state.ball.pos, state.ball.radius, &brick.aabb()).hit {
                contacts.push(GameEvent::BrickHit(brick.id));
            }
        }
    }

    // The paddle only stops a descending ball
    if state.ball.vel.y > 0.0
        && ball_rect_collision(state.ball.pos, state.ball.radius, &state.paddle.aabb()).hit
    {
        contacts.push(GameEvent::PaddleHit);
    }

    contacts
}

/// Apply contact events: brick removal, scoring, and the ball's response.
///
/// Removal is idempotent: an event for an already-dead brick is dropped,
/// so simultaneous contacts on one brick can never double-count. The ball
/// reflects off the first live brick struck this tick; further overlapped
/// bricks still clear and score. Returns the events that took effect.
pub fn apply_contacts(state: &mut GameState, contacts: &[GameEvent]) -> Vec<GameEvent> {
    let mut applied = Vec::new();
    let mut bounced = false;

    for &contact in contacts {
        match contact {
            GameEvent::BrickHit(id) => {
                let Some(brick) = state.brick_mut(id) else {
                    continue;
                };
                if !brick.alive {
                    continue;
                }
                brick.alive = false;
                let brick_box = brick.aabb();

                state.session.score += 1;
                applied.push(contact);

                if !bounced {
                    let result =
                        ball_rect_collision(state.ball.pos, state.ball.radius, &brick_box);
                    if result.hit {
                        state.ball.pos += result.normal * result.penetration;
                        state.ball.vel = reflect(state.ball.vel, result.normal);
                        bounced = true;
                    }
                }
            }

            GameEvent::PaddleHit => {
                let paddle_box = state.paddle.aabb();
                let ball = &mut state.ball;

                // Vertical bounce plus a horizontal kick away from the
                // paddle center, 5 px/s faster than before
                ball.vel.y = -ball.vel.y;
                let kick = ball.vel.x.abs() + PADDLE_SPEEDUP;
                ball.vel.x = if ball.pos.x < paddle_box.center.x {
                    -kick
                } else {
                    kick
                };

                // Lift the ball clear of the paddle so one touch is one bounce
                if ball.pos.y + ball.radius > paddle_box.top() {
                    ball.pos.y = paddle_box.top() - ball.radius;
                }

                applied.push(contact);
            }

            GameEvent::RoundEnded(_) => {}
        }
    }

    applied
}

fn end_round(state: &mut GameState, outcome: RoundOutcome, events: &mut Vec<GameEvent>) {
    state.ball.vel = Vec2::ZERO;
    state.phase = RoundPhase::Ended(outcome);
    events.push(GameEvent::RoundEnded(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::MemoryStore;
    use crate::scores::ScoreBoard;
    use proptest::prelude::*;

    fn playing_state(username: &str) -> GameState {
        let mut state = GameState::new(username);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Playing);
        state
    }

    #[test]
    fn start_requires_username() {
        let mut state = GameState::new("");
        let input = TickInput {
            start: true,
            left: true,
            right: true,
        };
        for _ in 0..100 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, RoundPhase::Waiting);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn start_launches_ball_upward() {
        let mut state = GameState::new("alice");

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RoundPhase::Waiting);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Playing);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn right_input_wins_when_both_held() {
        let mut state = playing_state("alice");

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, SIM_DT);
        assert_eq!(state.paddle.vel_x, PADDLE_SPEED);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT);
        assert_eq!(state.paddle.vel_x, -PADDLE_SPEED);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.paddle.vel_x, 0.0);
    }

    #[test]
    fn paddle_stops_at_field_edge() {
        let mut state = playing_state("alice");
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        // 2.5 seconds of travel, well before the ball can return to the bottom
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, RoundPhase::Playing);
        assert_eq!(state.paddle.pos.x, PADDLE_WIDTH / 2.0);
    }

    #[test]
    fn brick_hit_scores_and_clears_once() {
        let mut state = playing_state("alice");

        // Two simultaneous contact events on one brick
        let hits = [GameEvent::BrickHit(3), GameEvent::BrickHit(3)];
        let applied = apply_contacts(&mut state, &hits);
        assert_eq!(applied, vec![GameEvent::BrickHit(3)]);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.bricks_remaining(), 29);
        assert!(!state.brick(3).unwrap().alive);

        // A later duplicate is dropped too
        let applied = apply_contacts(&mut state, &[GameEvent::BrickHit(3)]);
        assert!(applied.is_empty());
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn ball_reflects_off_struck_brick() {
        let mut state = playing_state("alice");
        // Rising ball just under brick 0 (violet row)
        state.ball.pos = Vec2::new(80.0, 170.0);
        state.ball.vel = Vec2::new(0.0, -BALL_LAUNCH_SPEED);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::BrickHit(0)));
        assert!(state.ball.vel.y > 0.0);
        assert_eq!(state.session.score, 1);
        assert!(!state.brick(0).unwrap().alive);
    }

    #[test]
    fn simultaneous_contacts_scan_left_to_right() {
        let mut state = playing_state("alice");
        // Rising ball midway between bricks 0 and 1, close enough to graze both
        state.ball.pos = Vec2::new(115.0, 170.0);
        state.ball.vel = Vec2::new(0.0, -BALL_LAUNCH_SPEED);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        let hits: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickHit(_)))
            .collect();
        assert_eq!(hits, [&GameEvent::BrickHit(0), &GameEvent::BrickHit(1)]);
        assert_eq!(state.session.score, 2);
    }

    #[test]
    fn paddle_bounce_kicks_away_from_center() {
        let mut state = playing_state("alice");
        // Descending ball striking the left half of the paddle
        state.ball.pos = Vec2::new(
            state.paddle.pos.x - 30.0,
            state.paddle.aabb().top() - 10.0,
        );
        state.ball.vel = Vec2::new(20.0, 200.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::PaddleHit));
        assert!(state.ball.vel.y < 0.0);
        assert_eq!(state.ball.vel.x, -(20.0 + PADDLE_SPEEDUP));
    }

    #[test]
    fn round_lost_when_ball_exits_bottom() {
        let mut state = playing_state("alice");
        state.ball.pos = Vec2::new(400.0, FIELD_HEIGHT + 1.0);
        state.ball.vel = Vec2::new(0.0, 300.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RoundPhase::Ended(RoundOutcome::GameOver));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(events.contains(&GameEvent::RoundEnded(RoundOutcome::GameOver)));
    }

    #[test]
    fn clearing_every_brick_wins_and_records_the_score() {
        let mut state = playing_state("carol");
        let ids: Vec<u32> = state.bricks.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), 30);
        for id in ids {
            apply_contacts(&mut state, &[GameEvent::BrickHit(id)]);
        }
        assert_eq!(state.session.score, 30);
        assert_eq!(state.bricks_remaining(), 0);

        // Closing tick with the ball well inside the field
        state.ball.pos = Vec2::new(400.0, 300.0);
        state.ball.vel = Vec2::new(0.0, -BALL_LAUNCH_SPEED);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RoundPhase::Ended(RoundOutcome::Won));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(events.contains(&GameEvent::RoundEnded(RoundOutcome::Won)));

        // The driver folds the session into the store on RoundEnded
        let store = MemoryStore::new();
        let mut board = ScoreBoard::load(&store);
        board.record(&state.session.username, state.session.score as u64);
        board.save(&store);
        assert_eq!(ScoreBoard::load(&store).best("carol"), Some(30));
    }

    #[test]
    fn terminal_phase_ignores_input() {
        let mut state = playing_state("alice");
        state.ball.pos = Vec2::new(400.0, FIELD_HEIGHT + 1.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let ended = state.clone();

        let input = TickInput {
            left: true,
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, SIM_DT);
        assert!(events.is_empty());
        assert_eq!(state, ended);
    }

    #[test]
    fn identical_inputs_replay_identically() {
        let script = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut state1 = GameState::new("alice");
        let mut state2 = GameState::new("alice");
        for input in script.iter().cycle().take(600) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }
        assert_eq!(state1, state2);
    }

    proptest! {
        #[test]
        fn paddle_bounce_never_slows_the_ball(
            offset in -60.0f32..60.0,
            vx in -80.0f32..80.0,
            vy in 1.0f32..400.0,
        ) {
            let mut state = playing_state("alice");
            state.ball.pos = Vec2::new(
                (state.paddle.pos.x + offset).clamp(BALL_RADIUS, FIELD_WIDTH - BALL_RADIUS),
                state.paddle.aabb().top() - 2.0,
            );
            state.ball.vel = Vec2::new(vx, vy);
            let before = state.ball.speed();

            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if events.contains(&GameEvent::PaddleHit) {
                prop_assert!(state.ball.speed() >= before);
            }
        }
    }
}
