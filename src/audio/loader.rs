use std::sync::mpsc::Sender;
use std::thread;

use crate::quiz::PreviewLoader;

use super::sink::read_preview;
use super::types::LoadEvent;

/// Loads previews on short-lived worker threads and reports each outcome as a
/// `LoadEvent` on `events`.
#[derive(Clone)]
pub struct ThreadedLoader {
    events: Sender<LoadEvent>,
}

impl ThreadedLoader {
    pub fn new(events: Sender<LoadEvent>) -> Self {
        Self { events }
    }
}

impl PreviewLoader for ThreadedLoader {
    fn request(&self, uri: &str) {
        let uri = uri.to_string();
        let events = self.events.clone();
        let spawned = thread::Builder::new()
            .name("preview-loader".into())
            .spawn(move || {
                let result = read_preview(&uri);
                // The game may have quit in the meantime; nobody is left to tell.
                let _ = events.send(LoadEvent { uri, result });
            });
        if let Err(e) = spawned {
            tracing::debug!(error = %e, "could not spawn preview loader");
        }
    }
}
