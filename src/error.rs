//! Error types shared by the quiz engine and its collaborators.

use crate::quiz::Phase;

/// Errors produced while building or playing a game.
///
/// Only `InsufficientCatalog` and `EmptySession` are meant to reach the
/// player; everything else is logged and absorbed where it happens.
#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    /// The performer has no playable tracks.
    #[error("not enough playable tracks, try another performer")]
    InsufficientCatalog,

    /// `begin` was called on a round set with no rounds.
    #[error("this game has no rounds, pick a performer again")]
    EmptySession,

    /// A preview could not be fetched or decoded.
    #[error("failed to load preview {uri}: {reason}")]
    ResourceLoadFailure { uri: String, reason: String },

    /// The catalog could not be queried.
    #[error("catalog unavailable: {0}")]
    GatewayUnavailable(String),

    /// A session transition was requested in a phase that does not allow it.
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition { phase: Phase, action: &'static str },

    /// IO error from the storage files.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A storage file exists but could not be parsed or written.
    #[error("format error: {0}")]
    Format(String),
}

impl QuizError {
    pub fn load_failure(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceLoadFailure {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
