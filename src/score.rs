use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "arcade-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Failure reading or writing the durable high score.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("score file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable home of the best score. The engine reads it once and writes only improvements.
pub trait HighScoreStore {
    fn read_high_score(&mut self) -> Result<u32, StoreError>;

    fn write_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// High score kept as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`scores_path`].
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    /// Returns `Ok(0)` when the score file does not yet exist (first run).
    fn read_high_score(&mut self) -> Result<u32, StoreError> {
        load_high_score_from_path(&self.path)
    }

    /// Creates parent directories when needed.
    fn write_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        save_high_score_to_path(&self.path, score)
    }
}

fn load_high_score_from_path(path: &Path) -> Result<u32, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let file = serde_json::from_str::<ScoreFile>(&raw)?;
    Ok(file.high_score)
}

fn save_high_score_to_path(path: &Path, score: u32) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = ScoreFile { high_score: score };
    let json = serde_json::to_string_pretty(&payload)?;

    fs::write(path, json)?;
    Ok(())
}

/// Process-local store for `--no-persist` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
    writes: Vec<u32>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            writes: Vec::new(),
        }
    }

    /// Every value written, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[u32] {
        &self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn read_high_score(&mut self) -> Result<u32, StoreError> {
        Ok(self.high_score)
    }

    fn write_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.high_score = score;
        self.writes.push(score);
        Ok(())
    }
}
