//! High score persistence
//!
//! The game keeps exactly one persisted value: the best score ever reached,
//! stored under [`HIGH_SCORE_KEY`]. Stores are injected into the session so
//! tests can run against memory instead of the user's data directory.

pub mod high_score;

pub use high_score::{JsonScoreStore, MemoryScoreStore};

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Identifier the high score is stored under
pub const HIGH_SCORE_KEY: &str = "HighScore";

/// Get/set access to the persisted high score
pub trait HighScoreStore: Send {
    /// Read the stored high score; a store that was never written yields 0
    fn load(&self) -> Result<u32>;

    fn save(&mut self, score: u32) -> Result<()>;
}

/// Write `data` next to `path` and rename it into place
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {:?} into place", tmp))?;
    Ok(())
}
