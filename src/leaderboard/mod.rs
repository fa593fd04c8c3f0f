//! Best-effort leaderboard submission
//!
//! Final scores are handed to a background task so the game loop never waits
//! on the board. Authentication and submission failures are logged and
//! otherwise ignored.

pub mod handle;
pub mod local;

pub use handle::LeaderboardHandle;
pub use local::LocalLeaderboard;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board the game submits to
pub const LEADERBOARD_ID: &str = "classic_snake_leaderboard";

/// One submitted result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: String,
    pub score: u32,
    pub achieved_at: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn new(player: impl Into<String>, score: u32) -> Self {
        Self {
            player: player.into(),
            score,
            achieved_at: Utc::now(),
        }
    }
}

/// A score service. Calls may block; they run off the game loop.
pub trait Leaderboard: Send + 'static {
    /// Establish the player's identity; submissions are skipped until this
    /// has succeeded once
    fn authenticate(&mut self) -> Result<()>;

    fn submit(&mut self, entry: &ScoreEntry) -> Result<()>;
}
