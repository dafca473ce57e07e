use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Screen};
use crate::audio::{AudioPlayer, LoadEvent};
use crate::catalog::{CatalogGateway, Performer};
use crate::config;
use crate::quiz::{Phase, RoundResult, RoundSetBuilder, SessionController, build_round_set};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    rng: StdRng,
    /// Round the countdown clock is anchored to and when its last tick fell.
    tick_anchor: Option<(usize, Instant)>,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            tick_anchor: None,
            pending_gg: false,
        }
    }

    /// Feed wall-clock time into the round countdown, one `tick()` per
    /// elapsed `tick` interval. The clock restarts whenever a new round is up.
    fn advance_clock(&mut self, game: &mut Game<'_>, app: &mut App, tick: Duration, now: Instant) {
        let state = game.controller.state();
        if state.phase() != Phase::Playing {
            self.tick_anchor = None;
            return;
        }
        let index = state.round_index();
        let anchor = match self.tick_anchor {
            Some((i, at)) if i == index => at,
            _ => {
                self.tick_anchor = Some((index, now));
                return;
            }
        };
        if now.duration_since(anchor) < tick {
            return;
        }
        self.tick_anchor = Some((index, anchor + tick));
        if let Some(result) = game.controller.tick() {
            record_result(app, result);
        }
    }
}

/// What the event loop drives: the catalog to pick from and the session
/// controller playing the game.
pub struct Game<'a> {
    pub catalog: &'a dyn CatalogGateway,
    pub controller: &'a mut SessionController,
    pub builder: &'a RoundSetBuilder,
}

impl Game<'_> {
    /// Re-query the catalog for the performer listing: trending when the
    /// filter is empty, a search otherwise.
    fn refresh_listing(&self, app: &mut App) {
        let query = app.filter_query.trim();
        let listed = if query.is_empty() {
            self.catalog.trending_performers()
        } else {
            self.catalog.search_performers(query)
        };
        match listed {
            Ok(performers) => app.set_performers(performers),
            Err(e) => {
                tracing::warn!(error = %e, "performer listing failed");
                app.set_performers(Vec::new());
                app.show_notice(e.to_string());
            }
        }
    }

    /// Build a game for `performer` and load it into the controller. On an
    /// unusable catalog the player stays on the listing with a message.
    fn load_game(&mut self, app: &mut App, performer: Performer, rng: &mut StdRng) {
        match build_round_set(self.catalog, &performer, self.builder, rng) {
            Ok(rounds) => {
                tracing::info!(performer = %performer.name, rounds = rounds.len(), "game loaded");
                app.open_game(performer);
                self.controller.start(rounds);
            }
            Err(e) => {
                tracing::info!(performer = %performer.name, error = %e, "no game");
                app.show_notice(format!("{}: {e}", performer.name));
            }
        }
    }

    fn open_selected(&mut self, app: &mut App, rng: &mut StdRng) {
        if let Some(performer) = app.selected_performer().cloned() {
            self.load_game(app, performer, rng);
        }
    }

    /// Same performer, freshly shuffled rounds.
    fn play_again(&mut self, app: &mut App, rng: &mut StdRng) {
        if let Some(performer) = app.current_performer.clone() {
            self.load_game(app, performer, rng);
        }
    }

    fn begin(&mut self, app: &mut App) {
        app.clear_notice();
        if let Err(e) = self.controller.begin() {
            tracing::warn!(error = %e, "could not begin");
            app.show_notice(e.to_string());
        }
    }

    /// Answer the running round with the choice in `slot` (0-based).
    fn answer_slot(&mut self, app: &mut App, slot: usize) {
        let Some(round) = self.controller.current_round() else {
            return;
        };
        let Some(choice) = round.choices.get(slot) else {
            return;
        };
        let choice_id = choice.id.clone();
        let round_index = self.controller.state().round_index();
        if let Some(result) = self.controller.answer(round_index, &choice_id) {
            record_result(app, result);
        }
    }

    fn leave(&mut self, app: &mut App) {
        self.controller.abandon();
        app.back_to_performers();
    }
}

fn record_result(app: &mut App, result: RoundResult) {
    if let Some(report) = result.finished {
        tracing::info!(
            score = report.score,
            total = report.total_rounds,
            high_score = report.high_score,
            new_best = report.is_new_high_score,
            "game finished"
        );
    }
    app.record_result(result);
}

/// Main terminal event loop: handles input, the round clock, finished preview
/// loads and UI drawing. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    game: &mut Game<'_>,
    audio_player: &AudioPlayer,
    load_rx: &mpsc::Receiver<LoadEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.game.tick_ms.max(1));

    loop {
        if app.listing_dirty {
            game.refresh_listing(app);
        }

        while let Ok(LoadEvent { uri, result }) = load_rx.try_recv() {
            game.controller.on_preview_loaded(&uri, result);
        }

        state.advance_clock(game, app, tick, Instant::now());

        terminal.draw(|f| ui::draw(f, app, &*game.controller, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, game, state) {
                    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the player asked to quit.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    game: &mut Game<'_>,
    state: &mut EventLoopState,
) -> bool {
    match app.screen {
        Screen::Performers => handle_listing_key(key, app, game, state),
        Screen::Game => handle_game_key(key, app, game, state),
    }
}

fn handle_listing_key(
    key: KeyEvent,
    app: &mut App,
    game: &mut Game<'_>,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.next()
            }
            KeyCode::Char('k') | KeyCode::Char('p')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.prev()
            }
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            KeyCode::Enter => {
                if app.performers.is_empty() {
                    return false;
                }
                app.exit_filter_mode();
                game.open_selected(app, &mut state.rng);
            }
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            app.clear_notice();
            app.enter_filter_mode();
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Esc => {
            if app.filter_query.is_empty() {
                app.clear_notice();
            } else {
                app.clear_filter();
            }
        }
        KeyCode::Enter => {
            app.clear_notice();
            game.open_selected(app, &mut state.rng);
        }
        _ => {}
    }
    false
}

fn handle_game_key(
    key: KeyEvent,
    app: &mut App,
    game: &mut Game<'_>,
    state: &mut EventLoopState,
) -> bool {
    state.pending_gg = false;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => {
            state.tick_anchor = None;
            game.leave(app);
        }
        _ => match game.controller.state().phase() {
            Phase::Ready => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    state.tick_anchor = None;
                    game.begin(app);
                }
            }
            Phase::Playing => {
                if let KeyCode::Char(c) = key.code {
                    if let Some(n) = c.to_digit(10).filter(|n| *n >= 1) {
                        game.answer_slot(app, n as usize - 1);
                    }
                }
            }
            Phase::Finished => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => game.play_again(app, &mut state.rng),
                _ => {}
            },
            // Abandoned underneath us; nothing to show any more.
            Phase::Idle => app.back_to_performers(),
        },
    }
    false
}
