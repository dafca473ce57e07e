use crate::error::Result;

use super::model::{Performer, Track};

/// Source of performers and their tracks.
///
/// Implementations report failures as `QuizError::GatewayUnavailable`; the
/// game layer treats those as an empty catalog.
pub trait CatalogGateway {
    /// The performer's tracks, most representative first.
    fn top_tracks(&self, performer_id: &str) -> Result<Vec<Track>>;

    /// Performers whose name matches `query`.
    fn search_performers(&self, query: &str) -> Result<Vec<Performer>>;

    /// Performers worth suggesting before the player has searched.
    fn trending_performers(&self) -> Result<Vec<Performer>>;
}
