use std::sync::mpsc::Sender;

use crate::audio::{AudioPlayer, LoadEvent, ThreadedLoader};
use crate::config;
use crate::quiz::{HighScoreStore, PrefetchBuffer, ScoreLedger, SessionController};
use crate::storage::{FileHighScoreStore, JsonLinesLeaderboard};

/// Wire the session controller to the audio thread, the preview loaders and
/// the score files under the data directory.
pub fn build_controller(
    settings: &config::Settings,
    audio_player: &AudioPlayer,
    load_events: Sender<LoadEvent>,
) -> SessionController {
    let prefetch = PrefetchBuffer::new(
        Box::new(ThreadedLoader::new(load_events)),
        settings.prefetch.window,
    );
    let ledger = build_ledger(settings);

    SessionController::new(
        prefetch,
        Box::new(audio_player.handle()),
        ledger,
        settings.game.round_ticks,
    )
}

fn build_ledger(settings: &config::Settings) -> ScoreLedger {
    let player = settings.player.name.clone();
    let Some(dir) = settings.data_dir() else {
        tracing::warn!("no data directory, high scores will not be kept");
        return ScoreLedger::open(Box::new(NoStore), player);
    };

    let store = FileHighScoreStore::in_dir(&dir);
    tracing::debug!(path = %store.path().display(), "high score file");
    let ledger = ScoreLedger::open(Box::new(store), player);
    if settings.storage.leaderboard {
        ledger.with_leaderboard(Box::new(JsonLinesLeaderboard::in_dir(&dir)))
    } else {
        ledger
    }
}

/// Used when there is nowhere to write: every game starts from 0.
struct NoStore;

impl HighScoreStore for NoStore {
    fn load(&self) -> crate::error::Result<Option<u32>> {
        Ok(None)
    }

    fn save(&self, _score: u32) -> crate::error::Result<()> {
        Ok(())
    }
}
