//! The quiz engine: building rounds from a catalog and running a timed game
//! over them.

mod ledger;
mod model;
mod prefetch;
mod rounds;
mod session;

pub use ledger::{HighScoreStore, Leaderboard, LeaderboardEntry, ScoreLedger, ScoreReport};
pub use model::{Choice, Round, RoundSet};
pub use prefetch::{PrefetchBuffer, PreviewData, PreviewLoader};
pub use rounds::{
    DEFAULT_CHOICES_PER_ROUND, DEFAULT_ROUND_COUNT, RoundSetBuilder, build_round_set,
};
pub use session::{
    Phase, PreviewPlayer, PreviewSource, RoundResult, SessionController, SessionState,
};
