//! High score leaderboard
//!
//! One best score per username, persisted to LocalStorage as a flat JSON
//! object (`{"alice": 7, ...}`). Storage is single-writer and synchronous;
//! the board is loaded once, mutated on round end or registration, and
//! written back whole.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Number of entries shown on the leaderboard panel
pub const LEADERBOARD_SIZE: usize = 5;

/// Username-keyed best scores
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    entries: BTreeMap<String, u64>,
}

impl ScoreBoard {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "highScores";

    /// Create an empty board
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Load the board from storage.
    ///
    /// A missing or malformed entry yields an empty board; corruption is
    /// logged and never surfaced to the caller.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<ScoreBoard>(&json) {
                Ok(board) => {
                    log::info!("Loaded {} leaderboard entries", board.len());
                    board
                }
                Err(err) => {
                    log::warn!("Discarding malformed leaderboard: {err}");
                    Self::new()
                }
            },
            None => {
                log::info!("No saved leaderboard, starting fresh");
                Self::new()
            }
        }
    }

    /// Write the full board back to storage.
    pub fn save(&self, store: &dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
            log::info!("Leaderboard saved ({} entries)", self.len());
        }
    }

    /// Record a finished round: the stored score for `username` becomes the
    /// maximum of the existing best and `score`. Returns the new best.
    pub fn record(&mut self, username: &str, score: u64) -> u64 {
        let best = self
            .entries
            .entry(username.to_string())
            .and_modify(|b| *b = (*b).max(score))
            .or_insert(score);
        *best
    }

    /// Seed a freshly registered username at score 0. No-op if present.
    pub fn seed(&mut self, username: &str) {
        self.entries.entry(username.to_string()).or_insert(0);
    }

    /// Best score recorded for `username`, if any.
    pub fn best(&self, username: &str) -> Option<u64> {
        self.entries.get(username).copied()
    }

    /// Whether `username` has ever been seen.
    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }

    /// The `n` highest entries, sorted descending by score.
    ///
    /// Ties keep the map's iteration order (stable sort over an already
    /// alphabetically ordered map).
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(user, score)| (user.as_str(), *score))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn record_keeps_maximum() {
        let mut board = ScoreBoard::new();
        board.record("alice", 7);
        board.record("alice", 3);
        assert_eq!(board.best("alice"), Some(7));

        board.record("alice", 12);
        assert_eq!(board.best("alice"), Some(12));
    }

    #[test]
    fn top_is_sorted_and_capped() {
        let mut board = ScoreBoard::new();
        board.record("alice", 7);
        board.record("bob", 12);
        board.record("carol", 3);
        board.record("dave", 12);

        let top = board.top(3);
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        // Tie between bob and dave breaks alphabetically, stably
        assert_eq!(top[0], ("bob", 12));
        assert_eq!(top[1], ("dave", 12));
        assert_eq!(top[2], ("alice", 7));

        assert_eq!(board.top(10).len(), 4);
    }

    #[test]
    fn seed_does_not_clobber_existing_best() {
        let mut board = ScoreBoard::new();
        board.record("alice", 9);
        board.seed("alice");
        assert_eq!(board.best("alice"), Some(9));

        board.seed("bob");
        assert_eq!(board.best("bob"), Some(0));
    }

    #[test]
    fn load_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(ScoreBoard::load(&store).is_empty());
    }

    #[test]
    fn load_malformed_is_empty() {
        let store = MemoryStore::new();
        store.set(ScoreBoard::STORAGE_KEY, "not json");
        assert!(ScoreBoard::load(&store).is_empty());
    }

    #[test]
    fn save_then_load_preserves_entries() {
        let store = MemoryStore::new();
        let mut board = ScoreBoard::new();
        board.record("alice", 7);
        board.record("bob", 5);
        board.save(&store);

        let loaded = ScoreBoard::load(&store);
        assert_eq!(loaded, board);
    }

    #[test]
    fn persisted_layout_is_a_flat_object() {
        let mut board = ScoreBoard::new();
        board.record("alice", 7);
        assert_eq!(
            serde_json::to_string(&board).unwrap(),
            r#"{"alice":7}"#
        );
    }

    proptest! {
        #[test]
        fn stored_score_is_running_maximum(updates in prop::collection::vec((0u8..4, 0u64..1000), 0..64)) {
            let users = ["alice", "bob", "carol", "dave"];
            let mut board = ScoreBoard::new();
            let mut expected: std::collections::HashMap<&str, u64> = Default::default();

            for (user_idx, score) in updates {
                let user = users[user_idx as usize];
                board.record(user, score);
                let max = expected.entry(user).or_insert(0);
                *max = (*max).max(score);
            }

            for (user, max) in expected {
                prop_assert_eq!(board.best(user), Some(max));
            }
        }
    }
}
