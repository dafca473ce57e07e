use std::collections::HashMap;
use std::path::Path;

use crate::config::LibrarySettings;
use crate::error::Result;

use super::gateway::CatalogGateway;
use super::model::{Performer, Track, performer_id};
use super::scan::scan;

/// Catalog backed by a scanned music directory.
///
/// Tracks without a performer (no artist tag and no folder to fall back on)
/// are not reachable through any performer and never enter a game.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    performers: Vec<Performer>,
    tracks: HashMap<String, Vec<Track>>,
}

impl LocalCatalog {
    /// Scan `dir` and index the result by performer.
    pub fn scan(dir: &Path, settings: &LibrarySettings) -> Self {
        Self::from_tracks(scan(dir, settings))
    }

    /// Group `tracks` by performer, keeping their relative order.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut grouped: HashMap<String, Vec<Track>> = HashMap::new();

        for track in tracks {
            let Some(name) = track.artist.as_deref().map(str::trim).filter(|s| !s.is_empty())
            else {
                continue;
            };
            let id = performer_id(name);
            // First spelling seen wins as the display name.
            names.entry(id.clone()).or_insert_with(|| name.to_string());
            grouped.entry(id).or_default().push(track);
        }

        let mut performers: Vec<Performer> = grouped
            .iter()
            .map(|(id, tracks)| Performer {
                id: id.clone(),
                name: names.get(id).cloned().unwrap_or_else(|| id.clone()),
                track_count: tracks.len(),
            })
            .collect();
        performers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        tracing::info!(performers = performers.len(), "catalog indexed");
        Self {
            performers,
            tracks: grouped,
        }
    }

    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
    }
}

impl CatalogGateway for LocalCatalog {
    fn top_tracks(&self, performer_id: &str) -> Result<Vec<Track>> {
        Ok(self.tracks.get(performer_id).cloned().unwrap_or_default())
    }

    fn search_performers(&self, query: &str) -> Result<Vec<Performer>> {
        let query = query.trim();
        Ok(self
            .performers
            .iter()
            .filter(|p| fuzzy_match_positions(&p.name, query).is_some())
            .cloned()
            .collect())
    }

    fn trending_performers(&self) -> Result<Vec<Performer>> {
        let mut performers = self.performers.clone();
        // Stable sort keeps the alphabetical order among equal counts.
        performers.sort_by(|a, b| b.track_count.cmp(&a.track_count));
        Ok(performers)
    }
}

/// Fuzzy/subsequence match: return the character positions in `name`
/// that match `query`, or `None` if not matched.
pub fn fuzzy_match_positions(name: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut name_iter = name.chars().enumerate();

    for qc in query.chars() {
        let qc_low = qc.to_lowercase().next().unwrap_or(qc);
        loop {
            match name_iter.next() {
                Some((ni, nc)) if nc.to_lowercase().next().unwrap_or(nc) == qc_low => {
                    positions.push(ni);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}
