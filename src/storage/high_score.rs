use super::{HIGH_SCORE_KEY, HighScoreStore, write_atomic};
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// High score kept in a small JSON key/value file
///
/// The file is an object of integer values; keys other than
/// [`HIGH_SCORE_KEY`] are preserved on save.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(&self) -> Result<BTreeMap<String, u32>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse scores in {:?}", self.path)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read scores from {:?}", self.path))
            }
        }
    }
}

impl HighScoreStore for JsonScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self
            .read_values()?
            .get(HIGH_SCORE_KEY)
            .copied()
            .unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        // A corrupt file is replaced rather than blocking the save
        let mut values = self.read_values().unwrap_or_default();
        values.insert(HIGH_SCORE_KEY.to_string(), score);
        let json = serde_json::to_vec_pretty(&values).context("Failed to serialize scores")?;
        write_atomic(&self.path, &json)
    }
}

/// Process-local store, used when persistence is disabled and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: u32,
}

impl MemoryScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.value = score;
        Ok(())
    }
}
