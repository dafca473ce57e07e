use std::env;
use std::path::Path;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, LoadEvent};
use crate::catalog::LocalCatalog;
use crate::logging;
use crate::quiz::RoundSetBuilder;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Some(path) = logging::init(&settings) {
        tracing::info!(log = %path.display(), "earshot starting");
    }

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let catalog = LocalCatalog::scan(Path::new(&dir), &settings.library);
    tracing::info!(dir = %dir, performers = catalog.performers().len(), "library scanned");

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let (load_tx, load_rx) = mpsc::channel::<LoadEvent>();
    let mut controller = startup::build_controller(&settings, &audio_player, load_tx);
    let builder = RoundSetBuilder::new(settings.game.rounds, settings.game.choices);

    let mut app = App::new();
    if catalog.is_empty() {
        app.show_notice(format!("No playable tracks found under {dir}"));
    }
    app.set_library_dir(dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut game = event_loop::Game {
            catalog: &catalog,
            controller: &mut controller,
            builder: &builder,
        };
        let mut state = event_loop::EventLoopState::new();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut game,
            &audio_player,
            &load_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("earshot stopped");
    run_result
}
