use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("earshot: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; a broken file should not keep the game from starting.
            eprintln!("earshot: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
