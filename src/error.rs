//! Error types for LinkChain

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Cannot append to an empty chain")]
    EmptyChain,

    #[error("Malformed block record: {0}")]
    MalformedRecord(String),

    #[error("Persistence error at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(String),

    #[error("Invalid block linkage at index {index}")]
    InvalidBlockLinkage { index: u64 },

    #[error("Stored hash does not match block contents at index {index}")]
    HashMismatch { index: u64 },

    #[error("Invalid block index. Expected {expected}, but got {found}")]
    IndexGap { expected: u64, found: u64 },

    #[error("Block index overflow after index {index}")]
    IndexOverflow { index: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChainError {
    /// Wraps an I/O failure together with the path it happened on.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChainError::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_names_path() {
        let err = ChainError::persistence(
            "/no/such/dir/chain.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/no/such/dir/chain.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_index_gap_message() {
        let err = ChainError::IndexGap {
            expected: 3,
            found: 5,
        };
        assert_eq!(err.to_string(), "Invalid block index. Expected 3, but got 5");
    }
}
