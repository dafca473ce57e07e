use std::path::PathBuf;

use serde::Deserialize;

use crate::quiz::{DEFAULT_CHOICES_PER_ROUND, DEFAULT_ROUND_COUNT};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/earshot/config.toml` or `~/.config/earshot/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `EARSHOT__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameSettings,
    pub prefetch: PrefetchSettings,
    pub audio: AudioSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub player: PlayerSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Maximum number of rounds per game.
    pub rounds: usize,
    /// Choices shown per round, including the correct one.
    pub choices: usize,
    /// Countdown length of a round, in ticks.
    pub round_ticks: u32,
    /// Wall-clock length of one tick (milliseconds).
    pub tick_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUND_COUNT,
            choices: DEFAULT_CHOICES_PER_ROUND,
            round_ticks: 10,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrefetchSettings {
    /// Number of rounds (current one included) whose previews are loaded ahead.
    pub window: usize,
}

impl Default for PrefetchSettings {
    fn default() -> Self {
        Self { window: 3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How much of each track is played as the preview (seconds).
    pub preview_seconds: u64,
    /// Playback volume, 1.0 is unchanged.
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            preview_seconds: 30,
            volume: 1.0,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Use the top-level folder name as performer when a file has no artist tag.
    ///
    /// Matches the common `Music/<Artist>/<Album>/<Track>` layout.
    pub folder_as_performer: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            folder_as_performer: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the high score, leaderboard and log live.
    /// Defaults to `$XDG_DATA_HOME/earshot` or `~/.local/share/earshot`.
    pub data_dir: Option<PathBuf>,
    /// Append finished games to `leaderboard.jsonl` in the data dir.
    pub leaderboard: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            leaderboard: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Name recorded with leaderboard entries.
    pub name: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        let name = std::env::var("USER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "player".to_string());
        Self { name }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file. Defaults to `earshot.log` in the data dir.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Name that track ~ ".to_string(),
        }
    }
}
