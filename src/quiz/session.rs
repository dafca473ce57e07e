//! The game state machine.
//!
//! `SessionState` is a plain value moved through pure transitions.
//! `SessionController` pairs it with the side effects of a running game: the
//! round countdown, preview playback, prefetching and score keeping.

use std::time::Instant;

use crate::catalog::TrackId;
use crate::error::{QuizError, Result};

use super::ledger::{ScoreLedger, ScoreReport};
use super::model::{Round, RoundSet};
use super::prefetch::{PrefetchBuffer, PreviewData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No game loaded.
    #[default]
    Idle,
    /// A round set is loaded and waits for `begin`.
    Ready,
    /// A round is running.
    Playing,
    /// All rounds resolved; the score is final.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    phase: Phase,
    round_index: usize,
    score: u32,
    started_at: Option<Instant>,
}

impl SessionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// A new game replaces whatever was there.
    pub fn start(self) -> Self {
        Self {
            phase: Phase::Ready,
            ..Self::default()
        }
    }

    pub fn begin(self, total_rounds: usize, now: Instant) -> Result<Self> {
        if self.phase != Phase::Ready {
            return Err(QuizError::InvalidTransition {
                phase: self.phase,
                action: "begin",
            });
        }
        if total_rounds == 0 {
            return Err(QuizError::EmptySession);
        }
        Ok(Self {
            phase: Phase::Playing,
            round_index: 0,
            score: 0,
            started_at: Some(now),
        })
    }

    /// Score the active round and move to the next one, or finish after the last.
    pub fn resolve(self, correct: bool, total_rounds: usize) -> Result<Self> {
        if self.phase != Phase::Playing {
            return Err(QuizError::InvalidTransition {
                phase: self.phase,
                action: "resolve a round",
            });
        }
        let score = self.score + u32::from(correct);
        if self.round_index + 1 >= total_rounds {
            Ok(Self {
                phase: Phase::Finished,
                score,
                ..self
            })
        } else {
            Ok(Self {
                round_index: self.round_index + 1,
                score,
                ..self
            })
        }
    }

    pub fn abandon(self) -> Self {
        Self::idle()
    }
}

/// What the audio side should play for a round.
#[derive(Debug, Clone)]
pub enum PreviewSource {
    /// Prefetched bytes.
    Buffered { uri: String, data: PreviewData },
    /// Not prefetched in time; the player fetches it itself.
    OnDemand { uri: String },
}

impl PreviewSource {
    pub fn uri(&self) -> &str {
        match self {
            Self::Buffered { uri, .. } | Self::OnDemand { uri } => uri,
        }
    }
}

/// Plays round previews. Errors are the player's to log; a round runs on
/// without audio.
pub trait PreviewPlayer {
    /// Replace whatever is playing with `source`, from the start.
    fn play(&mut self, source: PreviewSource);
    fn stop(&mut self);
}

/// Countdown of the active round. It only ever fires for the round it was
/// started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Countdown {
    round_index: usize,
    remaining: u32,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round_index: usize,
    pub correct_track_id: TrackId,
    pub correct_title: String,
    /// `None` when the countdown ran out.
    pub chosen: Option<TrackId>,
    pub correct: bool,
    /// Set when this was the last round.
    pub finished: Option<ScoreReport>,
}

pub struct SessionController {
    state: SessionState,
    rounds: Option<RoundSet>,
    countdown: Option<Countdown>,
    round_ticks: u32,
    prefetch: PrefetchBuffer,
    player: Box<dyn PreviewPlayer>,
    ledger: ScoreLedger,
    last_report: Option<ScoreReport>,
}

impl SessionController {
    pub fn new(
        prefetch: PrefetchBuffer,
        player: Box<dyn PreviewPlayer>,
        ledger: ScoreLedger,
        round_ticks: u32,
    ) -> Self {
        Self {
            state: SessionState::idle(),
            rounds: None,
            countdown: None,
            round_ticks: round_ticks.max(1),
            prefetch,
            player,
            ledger,
            last_report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn rounds(&self) -> Option<&RoundSet> {
        self.rounds.as_ref()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.as_ref().map_or(0, RoundSet::len)
    }

    /// The round being played, only while `Playing`.
    pub fn current_round(&self) -> Option<&Round> {
        if self.state.phase() != Phase::Playing {
            return None;
        }
        self.rounds.as_ref()?.get(self.state.round_index())
    }

    /// Ticks left on the active countdown.
    pub fn remaining_ticks(&self) -> Option<u32> {
        self.countdown.map(|c| c.remaining)
    }

    pub fn round_ticks(&self) -> u32 {
        self.round_ticks
    }

    pub fn high_score(&self) -> u32 {
        self.ledger.high_score()
    }

    /// Report of the last finished game, until a new one starts.
    pub fn last_report(&self) -> Option<ScoreReport> {
        self.last_report
    }

    pub fn is_preview_ready(&self, index: usize) -> bool {
        self.rounds
            .as_ref()
            .is_some_and(|rounds| self.prefetch.is_ready(index, rounds))
    }

    /// Load a new game. Any running round is cancelled first.
    pub fn start(&mut self, rounds: RoundSet) {
        self.retire_round();
        self.prefetch.clear();
        self.state = self.state.start();
        self.last_report = None;
        self.prefetch.on_round_index_changed(0, &rounds);
        tracing::debug!(performer = rounds.performer(), rounds = rounds.len(), "session ready");
        self.rounds = Some(rounds);
    }

    /// Start the first round. On error the controller stays where it was.
    pub fn begin(&mut self) -> Result<()> {
        self.state = self.state.begin(self.round_count(), Instant::now())?;
        self.enter_round();
        Ok(())
    }

    /// Answer round `round_index` with `choice_id`.
    ///
    /// Ignored unless that round is the one running and still unresolved.
    pub fn answer(&mut self, round_index: usize, choice_id: &TrackId) -> Option<RoundResult> {
        if !self.accepting(round_index) {
            tracing::debug!(round_index, "answer ignored");
            return None;
        }
        let correct = self.current_round()?.is_correct(choice_id);
        self.resolve(Some(choice_id.clone()), correct)
    }

    /// Resolve the running round as unanswered.
    pub fn timeout(&mut self) -> Option<RoundResult> {
        if !self.accepting(self.state.round_index()) {
            return None;
        }
        self.resolve(None, false)
    }

    /// Advance the countdown by one tick, timing the round out when it hits zero.
    pub fn tick(&mut self) -> Option<RoundResult> {
        let countdown = self.countdown.as_mut()?;
        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return None;
        }
        let round_index = countdown.round_index;
        if !self.accepting(round_index) {
            self.countdown = None;
            return None;
        }
        self.resolve(None, false)
    }

    /// Drop the game and go back to `Idle`.
    pub fn abandon(&mut self) {
        self.retire_round();
        self.prefetch.clear();
        self.rounds = None;
        self.state = self.state.abandon();
        tracing::debug!("session abandoned");
    }

    /// Feed a finished preview load into the prefetch buffer.
    pub fn on_preview_loaded(&mut self, uri: &str, result: Result<PreviewData>) {
        self.prefetch.on_loaded(uri, result);
    }

    fn accepting(&self, round_index: usize) -> bool {
        self.state.phase() == Phase::Playing
            && self.state.round_index() == round_index
            && self.countdown.is_some_and(|c| c.round_index == round_index)
    }

    fn resolve(&mut self, chosen: Option<TrackId>, correct: bool) -> Option<RoundResult> {
        let round = self.current_round()?.clone();
        let round_index = self.state.round_index();
        self.retire_round();

        self.state = match self.state.resolve(correct, self.round_count()) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, "round could not be resolved");
                return None;
            }
        };
        tracing::debug!(round_index, correct, score = self.state.score(), "round resolved");

        let mut result = RoundResult {
            round_index,
            correct_track_id: round.correct_track_id,
            correct_title: round.correct_title,
            chosen,
            correct,
            finished: None,
        };
        if self.state.phase() == Phase::Finished {
            result.finished = Some(self.finish());
        } else {
            self.enter_round();
        }
        Some(result)
    }

    fn enter_round(&mut self) {
        self.retire_round();

        let index = self.state.round_index();
        let Some(rounds) = self.rounds.as_ref() else {
            return;
        };
        let Some(round) = rounds.get(index) else {
            return;
        };

        self.prefetch.on_round_index_changed(index, rounds);
        let uri = round.preview_uri.clone();
        let source = match self.prefetch.ready(&uri) {
            Some(data) => PreviewSource::Buffered { uri, data },
            None => {
                tracing::debug!(index, uri = %uri, "preview not prefetched, loading on demand");
                PreviewSource::OnDemand { uri }
            }
        };

        self.countdown = Some(Countdown {
            round_index: index,
            remaining: self.round_ticks,
        });
        self.player.play(source);
    }

    /// Cancel the active countdown and its playback.
    fn retire_round(&mut self) {
        if self.countdown.take().is_some() {
            self.player.stop();
        }
    }

    fn finish(&mut self) -> ScoreReport {
        let score = self.state.score();
        let report = self.ledger.record_final_score(score, self.round_count());
        let elapsed = self
            .state
            .started_at()
            .map(|t| t.elapsed())
            .unwrap_or_default();
        if let Some(rounds) = &self.rounds {
            self.ledger.submit(score, elapsed, rounds.performer());
        }
        self.prefetch.clear();
        self.last_report = Some(report);
        tracing::info!(score, total = report.total_rounds, "game finished");
        report
    }
}
