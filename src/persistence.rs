//! Persistence layer for LinkChain

use crate::blockchain::{Block, BlockRecord};
use crate::error::ChainError;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

const TEMP_SUFFIX: &str = "tmp";

/// Abstraction for persistence backends. `save_blocks` replaces whatever the
/// backend held; `load_blocks` returns `Ok(None)` when nothing has been stored.
pub trait Persistence: Send + Sync {
    fn save_blocks(&self, blocks: &[Block]) -> Result<(), ChainError>;
    fn load_blocks(&self) -> Result<Option<Vec<Block>>, ChainError>;
    /// Human-readable name of the backend, used in log messages.
    fn describe(&self) -> String;
}

/// Stores the chain as a pretty-printed JSON array of block records.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn write_records(&self, temp_path: &Path, records: &[BlockRecord]) -> Result<(), ChainError> {
        let mut bytes = serde_json::to_vec_pretty(records)?;
        bytes.push(b'\n');

        let file = File::create(temp_path).map_err(|e| ChainError::persistence(temp_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .map_err(|e| ChainError::persistence(temp_path, e))?;

        let file = writer
            .into_inner()
            .map_err(|e| ChainError::persistence(temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| ChainError::persistence(temp_path, e))?;
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn save_blocks(&self, blocks: &[Block]) -> Result<(), ChainError> {
        let records: Vec<BlockRecord> = blocks.iter().map(Block::to_record).collect();

        // Write next to the destination, then rename over it.
        let temp_path = self.temp_path();
        let result = self
            .write_records(&temp_path, &records)
            .and_then(|()| {
                fs::rename(&temp_path, &self.path)
                    .map_err(|e| ChainError::persistence(&self.path, e))
            });

        if result.is_err() {
            if let Err(e) = fs::remove_file(&temp_path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", temp_path.display(), e);
                }
            }
        }
        result
    }

    fn load_blocks(&self) -> Result<Option<Vec<Block>>, ChainError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| ChainError::persistence(&self.path, e))?;
        let values: Vec<Value> = serde_json::from_str(&contents)?;

        let blocks = values
            .iter()
            .enumerate()
            .map(|(position, value)| {
                Block::from_value(value).map_err(|e| match e {
                    ChainError::MalformedRecord(msg) => {
                        ChainError::MalformedRecord(format!("record {}: {}", position, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(blocks))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Simple in-memory persistence implementation useful for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    pub blocks: Arc<Mutex<Option<Vec<Block>>>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for InMemoryPersistence {
    fn save_blocks(&self, blocks: &[Block]) -> Result<(), ChainError> {
        let mut stored = self.blocks.lock().map_err(|_| {
            ChainError::persistence("<memory>", std::io::Error::other("mutex poisoned"))
        })?;
        *stored = Some(blocks.to_vec());
        Ok(())
    }

    fn load_blocks(&self) -> Result<Option<Vec<Block>>, ChainError> {
        let stored = self.blocks.lock().map_err(|_| {
            ChainError::persistence("<memory>", std::io::Error::other("mutex poisoned"))
        })?;
        Ok(stored.clone())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
