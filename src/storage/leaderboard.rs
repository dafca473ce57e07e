use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{QuizError, Result};
use crate::quiz::{Leaderboard, LeaderboardEntry};

/// Leaderboard that appends one JSON object per finished game.
#[derive(Debug, Clone)]
pub struct JsonLinesLeaderboard {
    path: PathBuf,
}

impl JsonLinesLeaderboard {
    pub const FILE_NAME: &'static str = "leaderboard.jsonl";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    fn append(&self, entry: &LeaderboardEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line =
            serde_json::to_string(entry).map_err(|e| QuizError::Format(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Every entry recorded so far; unreadable lines are skipped.
    #[cfg(test)]
    pub fn entries(&self) -> Result<Vec<LeaderboardEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }
}

impl Leaderboard for JsonLinesLeaderboard {
    fn submit(&self, entry: LeaderboardEntry) {
        if let Err(e) = self.append(&entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "leaderboard submit failed");
        }
    }
}
