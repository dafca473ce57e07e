//! Utilities for creating `rodio` sinks from round previews.
//!
//! The helpers here fetch the preview bytes (unless they were prefetched),
//! decode them and prepare a paused `Sink` limited to the preview length.

use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::QuizError;
use crate::quiz::{PreviewData, PreviewSource};

/// Read the preview at `uri` into memory.
pub(crate) fn read_preview(uri: &str) -> Result<PreviewData, QuizError> {
    let bytes = fs::read(uri).map_err(|e| QuizError::load_failure(uri, e))?;
    if bytes.is_empty() {
        return Err(QuizError::load_failure(uri, "empty file"));
    }
    Ok(Arc::from(bytes))
}

/// Create a paused `Sink` playing at most `length` of `source` at `volume`.
pub(super) fn create_preview_sink(
    stream: &OutputStream,
    source: &PreviewSource,
    length: Duration,
    volume: f32,
) -> Result<Sink, QuizError> {
    let data = match source {
        PreviewSource::Buffered { data, .. } => data.clone(),
        PreviewSource::OnDemand { uri } => read_preview(uri)?,
    };

    let decoded = Decoder::new(Cursor::new(data))
        .map_err(|e| QuizError::load_failure(source.uri(), e))?
        .take_duration(length);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(decoded);
    sink.pause();
    Ok(sink)
}
