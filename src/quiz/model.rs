//! Round types handed from the builder to the session.

use crate::catalog::{Track, TrackId};

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: TrackId,
    pub title: String,
}

impl From<&Track> for Choice {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.trim().to_string(),
        }
    }
}

/// One multiple-choice question: a preview and the titles to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub correct_track_id: TrackId,
    pub preview_uri: String,
    pub correct_title: String,
    pub choices: Vec<Choice>,
}

impl Round {
    pub fn is_correct(&self, choice_id: &TrackId) -> bool {
        &self.correct_track_id == choice_id
    }
}

/// The rounds of one game, fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSet {
    performer: String,
    rounds: Vec<Round>,
}

impl RoundSet {
    pub fn new(performer: impl Into<String>, rounds: Vec<Round>) -> Self {
        Self {
            performer: performer.into(),
            rounds,
        }
    }

    /// Name of the performer this game was built for.
    pub fn performer(&self) -> &str {
        &self.performer
    }

    pub fn get(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }
}
