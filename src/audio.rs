//! Preview playback and loading.
//!
//! Playback runs on a dedicated thread fed with `AudioCmd`s; previews are
//! read on worker threads and reported back to the game loop as `LoadEvent`s.

mod loader;
mod player;
mod sink;
mod thread;
mod types;

pub use loader::ThreadedLoader;
pub use player::{AudioHandle, AudioPlayer};
pub use types::{AudioCmd, LoadEvent};

#[cfg(test)]
mod tests;
