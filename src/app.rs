//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the performer listing,
//! the active screen and the results of the game in progress.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
