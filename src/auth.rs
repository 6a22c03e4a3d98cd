//! Login/register glue for the leaderboard
//!
//! Not a security mechanism: the username is an opaque leaderboard key and
//! the default policy accepts any non-empty username/password pair. The
//! policy sits behind a trait so a real credential check could be swapped
//! in without touching the game or score logic.

use thiserror::Error;

use crate::platform::KeyValueStore;
use crate::scores::ScoreBoard;

/// LocalStorage key holding the signed-in username
pub const USERNAME_KEY: &str = "username";

/// Pluggable credential check.
pub trait CredentialCheck {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Placeholder policy: any non-empty username/password pair passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptNonEmpty;

impl CredentialCheck for AcceptNonEmpty {
    fn verify(&self, username: &str, password: &str) -> bool {
        !username.is_empty() && !password.is_empty()
    }
}

/// Rejected login/register attempts. Surfaced to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter both username and password.")]
    MissingCredentials,
    #[error("This username is already taken.")]
    UsernameTaken,
}

/// Sign in an existing (or new, unregistered) user.
///
/// On success the username is persisted so the next page load skips the
/// form. Nothing is mutated on failure.
pub fn login(
    policy: &dyn CredentialCheck,
    store: &dyn KeyValueStore,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    if !policy.verify(username, password) {
        return Err(AuthError::MissingCredentials);
    }
    store.set(USERNAME_KEY, username);
    log::info!("Signed in as {username}");
    Ok(())
}

/// Register a new user and seed them on the leaderboard at score 0.
///
/// Requires the username to be unseen in the score store. Nothing is
/// mutated on failure.
pub fn register(
    policy: &dyn CredentialCheck,
    store: &dyn KeyValueStore,
    board: &mut ScoreBoard,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    if !policy.verify(username, password) {
        return Err(AuthError::MissingCredentials);
    }
    if board.contains(username) {
        return Err(AuthError::UsernameTaken);
    }
    board.seed(username);
    board.save(store);
    store.set(USERNAME_KEY, username);
    log::info!("Registered {username}");
    Ok(())
}

/// The persisted username from a previous session, if any.
pub fn saved_username(store: &dyn KeyValueStore) -> Option<String> {
    store.get(USERNAME_KEY).filter(|name| !name.is_empty())
}
