//! Application model types: `App` and `Screen`.
//!
//! The `App` struct holds what the UI shows around a game: the performer
//! listing with its filter, the results of the rounds played so far and any
//! message for the player. The game itself lives in the session controller.

use crate::catalog::Performer;
use crate::quiz::RoundResult;

/// Which screen the UI shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    /// Pick a performer.
    #[default]
    Performers,
    /// A game for the chosen performer (ready, running or finished).
    Game,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub performers: Vec<Performer>,
    pub selected: usize,

    pub filter_mode: bool,
    pub filter_query: String,
    /// The performer listing must be refreshed from the catalog.
    pub listing_dirty: bool,

    pub screen: Screen,
    /// Message shown to the player until the next action.
    pub notice: Option<String>,
    pub current_performer: Option<Performer>,
    /// Rounds resolved in the current game, in order.
    pub results: Vec<RoundResult>,
    pub library_dir: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            listing_dirty: true,
            ..Self::default()
        }
    }

    /// Record the music directory the catalog was built from.
    pub fn set_library_dir(&mut self, dir: String) {
        self.library_dir = Some(dir);
    }

    /// Replace the performer listing, keeping the selection on the same
    /// performer when it is still listed.
    pub fn set_performers(&mut self, performers: Vec<Performer>) {
        let keep = self.selected_performer().map(|p| p.id.clone());
        self.performers = performers;
        self.selected = keep
            .and_then(|id| self.performers.iter().position(|p| p.id == id))
            .unwrap_or(0);
        self.listing_dirty = false;
    }

    pub fn selected_performer(&self) -> Option<&Performer> {
        self.performers.get(self.selected)
    }

    pub fn mark_listing_dirty(&mut self) {
        self.listing_dirty = true;
    }

    /// Move selection to the next performer, wrapping to the first.
    pub fn next(&mut self) {
        if !self.performers.is_empty() {
            self.selected = (self.selected + 1) % self.performers.len();
        }
    }

    /// Move selection to the previous performer, wrapping to the last.
    pub fn prev(&mut self) {
        if !self.performers.is_empty() {
            self.selected = match self.selected {
                0 => self.performers.len() - 1,
                s => s - 1,
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.performers.len().saturating_sub(1);
    }

    /// Enter filter mode: typed characters narrow the performer listing.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }
    /// Exit filter mode, keeping the current query.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and go back to the full listing.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.mark_listing_dirty();
    }
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.mark_listing_dirty();
    }
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.mark_listing_dirty();
    }

    /// Switch to the game screen for `performer`.
    pub fn open_game(&mut self, performer: Performer) {
        self.current_performer = Some(performer);
        self.results.clear();
        self.notice = None;
        self.screen = Screen::Game;
    }

    /// Forget the game and return to the performer listing.
    pub fn back_to_performers(&mut self) {
        self.current_performer = None;
        self.results.clear();
        self.screen = Screen::Performers;
    }

    pub fn record_result(&mut self, result: RoundResult) {
        self.results.push(result);
    }

    /// The most recently resolved round.
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.results.last()
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.correct).count()
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
