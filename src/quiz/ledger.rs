//! Personal best and leaderboard reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Durable home of the personal best.
pub trait HighScoreStore {
    /// The stored high score, `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<u32>>;
    fn save(&self, score: u32) -> Result<()>;
}

/// A finished game as reported to a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub score: u32,
    pub elapsed: Duration,
    pub performer_name: String,
}

/// Fire-and-forget sink for finished games. Failures stay inside the
/// implementation.
pub trait Leaderboard {
    fn submit(&self, entry: LeaderboardEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u32,
    pub total_rounds: usize,
    pub is_new_high_score: bool,
    /// Best score after this game was recorded.
    pub high_score: u32,
}

pub struct ScoreLedger {
    store: Box<dyn HighScoreStore>,
    high_score: u32,
    leaderboard: Option<Box<dyn Leaderboard>>,
    player_id: String,
}

impl ScoreLedger {
    /// Read the stored best once. An unreadable store counts as no best yet.
    pub fn open(store: Box<dyn HighScoreStore>, player_id: impl Into<String>) -> Self {
        let high_score = match store.load() {
            Ok(v) => v.unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "could not read high score, starting from 0");
                0
            }
        };
        Self {
            store,
            high_score,
            leaderboard: None,
            player_id: player_id.into(),
        }
    }

    pub fn with_leaderboard(mut self, leaderboard: Box<dyn Leaderboard>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Compare `score` with the best so far and persist it when strictly greater.
    pub fn record_final_score(&mut self, score: u32, total_rounds: usize) -> ScoreReport {
        let is_new_high_score = score > self.high_score;
        if is_new_high_score {
            self.high_score = score;
            match self.store.save(score) {
                Ok(()) => tracing::info!(score, total_rounds, "new high score"),
                Err(e) => tracing::warn!(score, error = %e, "could not persist high score"),
            }
        }
        ScoreReport {
            score,
            total_rounds,
            is_new_high_score,
            high_score: self.high_score,
        }
    }

    /// Hand a finished game to the leaderboard, if one is configured.
    pub fn submit(&self, score: u32, elapsed: Duration, performer_name: &str) {
        if let Some(leaderboard) = &self.leaderboard {
            leaderboard.submit(LeaderboardEntry {
                player_id: self.player_id.clone(),
                score,
                elapsed,
                performer_name: performer_name.to_string(),
            });
        }
    }
}
