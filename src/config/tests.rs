use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_earshot_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("EARSHOT_CONFIG_PATH", "/tmp/earshot-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/earshot-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("earshot")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("earshot")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/share/earshot")
    );

    let _g3 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");
    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-data/earshot")
    );
}

#[test]
fn explicit_data_dir_wins_over_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");

    let mut s = Settings::default();
    s.storage.data_dir = Some("/srv/earshot".into());
    assert_eq!(s.data_dir().unwrap(), std::path::PathBuf::from("/srv/earshot"));
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.game.rounds, 10);
    assert_eq!(s.game.choices, 4);
    assert_eq!(s.game.round_ticks, 10);
    assert_eq!(s.prefetch.window, 3);
}

#[test]
fn validate_rejects_degenerate_games() {
    let mut s = Settings::default();
    s.game.choices = 1;
    assert!(s.validate().unwrap_err().contains("game.choices"));
    s.game.choices = 10;
    assert!(s.validate().unwrap_err().contains("game.choices"));

    let mut s = Settings::default();
    s.game.rounds = 0;
    assert!(s.validate().unwrap_err().contains("game.rounds"));

    let mut s = Settings::default();
    s.prefetch.window = 0;
    assert!(s.validate().unwrap_err().contains("prefetch.window"));

    let mut s = Settings::default();
    s.audio.volume = 3.5;
    assert!(s.validate().unwrap_err().contains("audio.volume"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[game]
rounds = 5
choices = 3
round_ticks = 15
tick_ms = 500

[prefetch]
window = 2

[audio]
preview_seconds = 12
volume = 0.5
quit_fade_out_ms = 0

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
folder_as_performer = false

[storage]
data_dir = "/tmp/earshot-data"
leaderboard = false

[player]
name = "ana"

[logging]
level = "debug"

[ui]
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("EARSHOT_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("EARSHOT__GAME__ROUNDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.game.rounds, 5);
    assert_eq!(s.game.choices, 3);
    assert_eq!(s.game.round_ticks, 15);
    assert_eq!(s.game.tick_ms, 500);
    assert_eq!(s.prefetch.window, 2);
    assert_eq!(s.audio.preview_seconds, 12);
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert!(!s.library.folder_as_performer);
    assert_eq!(
        s.storage.data_dir,
        Some(std::path::PathBuf::from("/tmp/earshot-data"))
    );
    assert!(!s.storage.leaderboard);
    assert_eq!(s.player.name, "ana");
    assert_eq!(s.logging.level, "debug");
    assert_eq!(s.ui.header_text, "hello");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[game]
rounds = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("EARSHOT_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("EARSHOT__GAME__ROUNDS", "3");

    let s = Settings::load().unwrap();
    assert_eq!(s.game.rounds, 3);
}
