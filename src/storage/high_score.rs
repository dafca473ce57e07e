use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::quiz::HighScoreStore;

/// On-disk shape: a single integer under a fixed key.
#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// High score kept in a small TOML file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub const FILE_NAME: &'static str = "highscore.toml";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/highscore.toml`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<Option<u32>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: HighScoreFile =
            toml::from_str(&text).map_err(|e| QuizError::Format(e.to_string()))?;
        Ok(Some(file.high_score))
    }

    fn save(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(&HighScoreFile { high_score: score })
            .map_err(|e| QuizError::Format(e.to_string()))?;

        // Write next to the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
