//! Turning a performer's tracks into a set of rounds.
//!
//! Everything here is pure: the random source is passed in so a seeded rng
//! reproduces the same game.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{CatalogGateway, Performer, Track};
use crate::error::{QuizError, Result};

use super::model::{Choice, Round, RoundSet};

pub const DEFAULT_ROUND_COUNT: usize = 10;
pub const DEFAULT_CHOICES_PER_ROUND: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSetBuilder {
    round_count: usize,
    choices_per_round: usize,
}

impl Default for RoundSetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_COUNT, DEFAULT_CHOICES_PER_ROUND)
    }
}

impl RoundSetBuilder {
    /// Both counts are clamped to at least 1.
    pub fn new(round_count: usize, choices_per_round: usize) -> Self {
        Self {
            round_count: round_count.max(1),
            choices_per_round: choices_per_round.max(1),
        }
    }

    /// Build up to `round_count` rounds from the playable part of `tracks`.
    ///
    /// Short catalogs give fewer rounds and fewer choices; the only failure is
    /// a catalog with nothing playable at all.
    pub fn build<R: Rng + ?Sized>(
        &self,
        performer: &str,
        tracks: &[Track],
        rng: &mut R,
    ) -> Result<RoundSet> {
        let mut pool = playable_pool(tracks);
        if pool.is_empty() {
            return Err(QuizError::InsufficientCatalog);
        }

        // `SliceRandom::shuffle` is a Fisher-Yates shuffle.
        pool.shuffle(&mut *rng);

        let decoy_count = self.choices_per_round - 1;
        let mut rounds: Vec<Round> = Vec::with_capacity(self.round_count.min(pool.len()));
        for answer in pool.iter().take(self.round_count) {
            let others: Vec<&Track> = pool.iter().copied().filter(|t| t.id != answer.id).collect();

            let mut choices: Vec<Choice> = std::iter::once(*answer)
                .chain(others.choose_multiple(&mut *rng, decoy_count).copied())
                .map(Choice::from)
                .collect();
            choices.shuffle(&mut *rng);

            rounds.push(Round {
                correct_track_id: answer.id.clone(),
                // Playable tracks always carry a preview uri.
                preview_uri: answer.preview_uri.clone().unwrap_or_default(),
                correct_title: answer.title.trim().to_string(),
                choices,
            });
        }

        tracing::debug!(
            performer,
            pool = pool.len(),
            rounds = rounds.len(),
            "round set built"
        );
        Ok(RoundSet::new(performer, rounds))
    }
}

/// Playable tracks in catalog order, first occurrence of each id and of each
/// title only.
///
/// Titles compare trimmed and case-folded: a live and a studio "Creep" would
/// otherwise sit side by side in one round with only one of them scored right.
fn playable_pool(tracks: &[Track]) -> Vec<&Track> {
    let mut seen_ids = HashSet::new();
    let mut seen_titles = HashSet::new();
    tracks
        .iter()
        .filter(|t| t.is_playable())
        .filter(|t| seen_ids.insert(t.id.clone()))
        .filter(|t| seen_titles.insert(t.title.trim().to_lowercase()))
        .collect()
}

/// Fetch `performer`'s tracks and build a game from them.
///
/// A failing gateway counts as an empty catalog, so the player sees
/// `InsufficientCatalog` rather than a transport error.
pub fn build_round_set<G, R>(
    gateway: &G,
    performer: &Performer,
    builder: &RoundSetBuilder,
    rng: &mut R,
) -> Result<RoundSet>
where
    G: CatalogGateway + ?Sized,
    R: Rng + ?Sized,
{
    let tracks = gateway.top_tracks(&performer.id).unwrap_or_else(|e| {
        tracing::warn!(performer = %performer.name, error = %e, "catalog lookup failed");
        Vec::new()
    });
    builder.build(&performer.name, &tracks, rng)
}
