//! Loading previews for upcoming rounds before they are needed.
//!
//! Prefetching is best-effort: a failed or late load only means the round
//! falls back to fetching its preview on demand.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::QuizError;

use super::model::RoundSet;

/// Raw bytes of a loaded preview.
pub type PreviewData = Arc<[u8]>;

/// Starts a load for a preview uri.
///
/// `request` must not block; the outcome is delivered later through
/// `PrefetchBuffer::on_loaded`.
pub trait PreviewLoader {
    fn request(&self, uri: &str);
}

#[derive(Debug, Clone)]
enum Slot {
    Loading,
    Ready(PreviewData),
    Failed,
}

pub struct PrefetchBuffer {
    loader: Box<dyn PreviewLoader>,
    window: usize,
    slots: HashMap<String, Slot>,
}

impl PrefetchBuffer {
    /// `window` counts the current round, so 3 loads the current round and the
    /// next two. Clamped to at least 1.
    pub fn new(loader: Box<dyn PreviewLoader>, window: usize) -> Self {
        Self {
            loader,
            window: window.max(1),
            slots: HashMap::new(),
        }
    }

    /// Make sure the previews of rounds `index..index + window` are requested.
    ///
    /// Previews already loading, loaded or failed are left alone. Previews of
    /// rounds that fell out of the window are dropped.
    pub fn on_round_index_changed(&mut self, index: usize, rounds: &RoundSet) {
        let wanted: Vec<&str> = (index..index.saturating_add(self.window))
            .filter_map(|i| rounds.get(i))
            .map(|r| r.preview_uri.as_str())
            .collect();

        self.slots.retain(|uri, _| wanted.contains(&uri.as_str()));

        for uri in wanted {
            if self.slots.contains_key(uri) {
                continue;
            }
            tracing::trace!(uri, "prefetch requested");
            self.slots.insert(uri.to_string(), Slot::Loading);
            self.loader.request(uri);
        }
    }

    /// Record the outcome of a load started by this buffer.
    ///
    /// Results for uris no longer in the window are discarded.
    pub fn on_loaded(&mut self, uri: &str, result: Result<PreviewData, QuizError>) {
        let Some(slot) = self.slots.get_mut(uri) else {
            tracing::trace!(uri, "discarding load outside the window");
            return;
        };
        *slot = match result {
            Ok(data) => Slot::Ready(data),
            Err(e) => {
                tracing::debug!(uri, error = %e, "prefetch failed, round will load on demand");
                Slot::Failed
            }
        };
    }

    /// The loaded preview for `uri`, if it is ready.
    pub fn ready(&self, uri: &str) -> Option<PreviewData> {
        match self.slots.get(uri) {
            Some(Slot::Ready(data)) => Some(data.clone()),
            _ => None,
        }
    }

    pub fn is_ready(&self, index: usize, rounds: &RoundSet) -> bool {
        rounds
            .get(index)
            .is_some_and(|r| self.ready(&r.preview_uri).is_some())
    }

    /// Number of previews currently held or in flight.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
