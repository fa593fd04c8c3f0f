//! Application settings: file values, then command-line overrides

use crate::game::GameConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Settings read from `classic_snake.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    /// Ring the terminal bell when food is eaten
    pub sound: bool,
    /// Submit final scores to the local leaderboard
    pub leaderboard: bool,
    pub player: String,
    /// Where scores, the leaderboard and the log live; defaults to the
    /// platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            sound: true,
            leaderboard: true,
            player: "player".to_string(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load settings from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                toml::from_str(&text).with_context(|| format!("Failed to parse config {:?}", path))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("Failed to read config {:?}", path)),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.player.trim().is_empty() {
            return Err("player name must not be empty".to_string());
        }
        Ok(())
    }

    /// Resolve the data directory, creating it if needed
    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("com", "classic-snake", "ClassicSnake")
                .context("could not resolve project directories")?
                .data_local_dir()
                .to_path_buf(),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        Ok(dir)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "classic-snake", "ClassicSnake")
            .map(|dirs| dirs.config_dir().join("classic_snake.toml"))
    }
}
