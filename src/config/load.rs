use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `EARSHOT__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("EARSHOT")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.game.rounds == 0 {
            return Err("game.rounds must be >= 1".to_string());
        }
        // Answers are picked with the 1-9 keys.
        if !(2..=9).contains(&self.game.choices) {
            return Err("game.choices must be between 2 and 9".to_string());
        }
        if self.game.round_ticks == 0 {
            return Err("game.round_ticks must be >= 1".to_string());
        }
        if self.game.tick_ms == 0 {
            return Err("game.tick_ms must be >= 1".to_string());
        }
        if self.prefetch.window == 0 {
            return Err("prefetch.window must be >= 1".to_string());
        }
        if !(0.0..=2.0).contains(&self.audio.volume) {
            return Err("audio.volume must be between 0.0 and 2.0".to_string());
        }
        Ok(())
    }

    /// Directory holding the high score, leaderboard and default log file.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(default_data_dir)
    }
}

/// Resolve the config path from `EARSHOT_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("EARSHOT_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/earshot/config.toml`
/// or `~/.config/earshot/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("earshot").join("config.toml"))
}

/// Compute the default data dir `$XDG_DATA_HOME/earshot`, or
/// `~/.local/share/earshot` when `XDG_DATA_HOME` is not set.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("earshot"))
}
