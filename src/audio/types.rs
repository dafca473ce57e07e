//! Audio-related small types.
//!
//! Commands understood by the audio thread and the events preview loads
//! report back to the game loop.

use crate::error::QuizError;
use crate::quiz::{PreviewData, PreviewSource};

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current preview with `source`, from the start.
    Play(PreviewSource),
    /// Stop playback immediately.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Outcome of a preview load, delivered to the game loop.
#[derive(Debug)]
pub struct LoadEvent {
    pub uri: String,
    pub result: Result<PreviewData, QuizError>,
}
