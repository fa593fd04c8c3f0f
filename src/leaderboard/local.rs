use super::{LEADERBOARD_ID, Leaderboard, ScoreEntry};
use crate::storage::write_atomic;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf};

/// Number of entries a local board keeps
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardFile {
    id: String,
    entries: Vec<ScoreEntry>,
}

/// Top-N board stored as JSON on disk
#[derive(Debug, Clone)]
pub struct LocalLeaderboard {
    path: PathBuf,
    player: String,
    capacity: usize,
    authenticated: bool,
}

impl LocalLeaderboard {
    pub fn new(path: impl Into<PathBuf>, player: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            player: player.into(),
            capacity: DEFAULT_CAPACITY,
            authenticated: false,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Entries sorted best first
    pub fn entries(&self) -> Result<Vec<ScoreEntry>> {
        Ok(self.read_board()?.entries)
    }

    fn read_board(&self) -> Result<BoardFile> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(BoardFile {
                    id: LEADERBOARD_ID.to_string(),
                    entries: Vec::new(),
                });
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read leaderboard {:?}", self.path));
            }
        };

        let board: BoardFile = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse leaderboard {:?}", self.path))?;
        if board.id != LEADERBOARD_ID {
            bail!("{:?} holds leaderboard {:?}, expected {:?}", self.path, board.id, LEADERBOARD_ID);
        }
        Ok(board)
    }
}

impl Leaderboard for LocalLeaderboard {
    fn authenticate(&mut self) -> Result<()> {
        if self.player.trim().is_empty() {
            bail!("player name is empty");
        }
        // Surface unreadable boards at sign-in rather than on every submit
        self.read_board()?;
        self.authenticated = true;
        Ok(())
    }

    fn submit(&mut self, entry: &ScoreEntry) -> Result<()> {
        if !self.authenticated {
            bail!("not authenticated");
        }

        let mut board = self.read_board()?;
        board.entries.push(entry.clone());
        // Stable sort: earlier entries win ties
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(self.capacity);

        let json = serde_json::to_vec_pretty(&board).context("Failed to serialize leaderboard")?;
        write_atomic(&self.path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn board(temp_dir: &TempDir) -> LocalLeaderboard {
        LocalLeaderboard::new(temp_dir.path().join("leaderboard.json"), "tester")
    }

    #[test]
    fn test_submit_requires_authentication() {
        let temp_dir = TempDir::new().unwrap();
        let mut board = board(&temp_dir);
        assert!(board.submit(&ScoreEntry::new("tester", 3)).is_err());

        board.authenticate().unwrap();
        board.submit(&ScoreEntry::new("tester", 3)).unwrap();
        assert_eq!(board.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_player_fails_authentication() {
        let temp_dir = TempDir::new().unwrap();
        let mut board = LocalLeaderboard::new(temp_dir.path().join("lb.json"), "  ");
        assert!(board.authenticate().is_err());
    }

    #[test]
    fn test_entries_sorted_and_capped() {
        let temp_dir = TempDir::new().unwrap();
        let mut board = board(&temp_dir).with_capacity(3);
        board.authenticate().unwrap();

        for score in [4, 9, 1, 7, 9] {
            board.submit(&ScoreEntry::new("tester", score)).unwrap();
        }

        let scores: Vec<u32> = board.entries().unwrap().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 9, 7]);
    }

    #[test]
    fn test_foreign_board_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leaderboard.json");
        fs::write(&path, r#"{"id": "other", "entries": []}"#).unwrap();

        let mut board = LocalLeaderboard::new(&path, "tester");
        assert!(board.authenticate().is_err());
    }
}
