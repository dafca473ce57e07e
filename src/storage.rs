//! File-backed stores for the personal best and the leaderboard.

mod high_score;
mod leaderboard;

pub use high_score::FileHighScoreStore;
pub use leaderboard::JsonLinesLeaderboard;
