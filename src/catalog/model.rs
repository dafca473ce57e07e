use std::fmt;

/// Opaque track identifier as handed out by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Where the audio preview can be fetched from. Absent when the catalog
    /// has nothing playable for this track.
    pub preview_uri: Option<String>,
    pub artist: Option<String>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>, preview_uri: Option<String>) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            preview_uri,
            artist: None,
        }
    }

    /// A track can be used in a game only with a title and a preview to play.
    pub fn is_playable(&self) -> bool {
        !self.title.trim().is_empty()
            && self
                .preview_uri
                .as_deref()
                .is_some_and(|uri| !uri.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performer {
    pub id: String,
    pub name: String,
    pub track_count: usize,
}

/// Normalize a performer name into the id used for lookups.
pub fn performer_id(name: &str) -> String {
    name.trim().to_lowercase()
}
