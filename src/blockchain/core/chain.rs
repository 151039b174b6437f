use crate::blockchain::core::block::{Block, BlockRecord};
use crate::blockchain::core::validation::verify_blocks;
use crate::crypto::{canonical_block_input, sha256_hex};
use crate::error::ChainError;
use crate::persistence::{JsonFileStore, Persistence};
use std::path::Path;
use tracing::{debug, info, warn};

pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const GENESIS_DATA: &str = "Genesis Block";

/// Current time as fractional seconds since the Unix epoch (microsecond precision).
pub fn now_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// What a call to [`Blockchain::load`] did. Loading never fails; when the
/// source is unusable the current chain is kept and the reason is reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { blocks: usize },
    NotFound,
    Rejected { reason: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Create a chain holding only a freshly timestamped genesis block.
    pub fn new() -> Self {
        Blockchain {
            blocks: vec![Self::create_genesis_block()],
        }
    }

    /// Wrap an existing sequence of blocks as-is. No linkage checks are made;
    /// see [`Blockchain::verify`].
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Blockchain { blocks }
    }

    fn create_genesis_block() -> Block {
        // One clock read feeds both the digest and the stored field.
        let timestamp = now_timestamp();
        let hash = Self::compute_hash(0, GENESIS_PREVIOUS_HASH, timestamp, GENESIS_DATA);
        Block::new(0, GENESIS_PREVIOUS_HASH, timestamp, GENESIS_DATA, hash)
    }

    /// Digest of a block's fields, as lowercase hex SHA-256 over
    /// [`canonical_block_input`].
    pub fn compute_hash(index: u64, previous_hash: &str, timestamp: f64, data: &str) -> String {
        sha256_hex(canonical_block_input(index, previous_hash, timestamp, data).as_bytes())
    }

    /// Append a block carrying `data`, linked to the current tip. Nothing is persisted.
    pub fn append(&mut self, data: impl Into<String>) -> Result<&Block, ChainError> {
        let previous = self.blocks.last().ok_or(ChainError::EmptyChain)?;

        let data = data.into();
        let index = previous
            .index()
            .checked_add(1)
            .ok_or(ChainError::IndexOverflow {
                index: previous.index(),
            })?;
        let previous_hash = previous.hash().to_string();
        let timestamp = now_timestamp();
        let hash = Self::compute_hash(index, &previous_hash, timestamp, &data);

        debug!("Appending block {} ({})", index, hash);
        self.blocks
            .push(Block::new(index, previous_hash, timestamp, data, hash));
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Records of every block, genesis first. Each call starts over from the beginning.
    pub fn enumerate(&self) -> impl Iterator<Item = BlockRecord> + '_ {
        self.blocks.iter().map(Block::to_record)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write the whole chain to `destination` as a JSON array of records,
    /// replacing whatever was there.
    pub fn save(&self, destination: impl AsRef<Path>) -> Result<(), ChainError> {
        self.save_to(&JsonFileStore::new(destination.as_ref()))
    }

    pub fn save_to(&self, store: &dyn Persistence) -> Result<(), ChainError> {
        store.save_blocks(&self.blocks)?;
        info!("Saved {} blocks to {}", self.blocks.len(), store.describe());
        Ok(())
    }

    /// Replace the chain with the one stored at `source`.
    ///
    /// A missing, unreadable or malformed file leaves the current chain
    /// untouched; the condition is logged and returned as a [`LoadOutcome`].
    /// Loaded blocks are not checked for linkage.
    pub fn load(&mut self, source: impl AsRef<Path>) -> LoadOutcome {
        self.load_from(&JsonFileStore::new(source.as_ref()))
    }

    pub fn load_from(&mut self, store: &dyn Persistence) -> LoadOutcome {
        match store.load_blocks() {
            Ok(Some(blocks)) if blocks.is_empty() => {
                warn!(
                    "{} holds no blocks. Keeping the current chain.",
                    store.describe()
                );
                LoadOutcome::Rejected {
                    reason: "no blocks in source".to_string(),
                }
            }
            Ok(Some(blocks)) => {
                let count = blocks.len();
                self.blocks = blocks;
                info!("Loaded {} blocks from {}", count, store.describe());
                LoadOutcome::Loaded { blocks: count }
            }
            Ok(None) => {
                warn!(
                    "{} not found. Starting from a new chain.",
                    store.describe()
                );
                LoadOutcome::NotFound
            }
            Err(e) => {
                warn!(
                    "Failed to load chain from {}: {}. Keeping the current chain.",
                    store.describe(),
                    e
                );
                LoadOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Recompute every digest and check genesis shape, index continuity and
    /// hash linkage. Returns the first problem found.
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_blocks(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryPersistence;

    #[test]
    fn test_genesis_block() {
        let chain = Blockchain::new();
        assert_eq!(chain.len(), 1);

        let genesis = chain.get(0).unwrap();
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.previous_hash(), GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.data(), GENESIS_DATA);
        assert_eq!(
            genesis.hash(),
            Blockchain::compute_hash(0, "0", genesis.timestamp(), "Genesis Block")
        );
    }

    #[test]
    fn test_append_two_blocks() {
        let mut chain = Blockchain::new();
        chain.append("A").unwrap();
        chain.append("B").unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.get(1).unwrap().data(), "A");
        assert_eq!(chain.get(2).unwrap().previous_hash(), chain.get(1).unwrap().hash());
        assert_eq!(chain.get(2).unwrap().index(), 2);
    }

    #[test]
    fn test_linkage_holds_after_every_append() {
        let mut chain = Blockchain::new();
        for i in 0..20 {
            chain.append(format!("entry {}", i)).unwrap();
            for pair in chain.blocks().windows(2) {
                assert_eq!(pair[1].previous_hash(), pair[0].hash());
                assert_eq!(pair[1].index(), pair[0].index() + 1);
            }
        }
        assert!(chain.verify().is_ok());
    }

    #[test]
    fn test_append_accepts_empty_data() {
        let mut chain = Blockchain::new();
        let block = chain.append("").unwrap();
        assert_eq!(block.data(), "");
        assert_eq!(
            block.hash(),
            Blockchain::compute_hash(1, block.previous_hash(), block.timestamp(), "")
        );
    }

    #[test]
    fn test_append_on_empty_chain_fails() {
        let mut chain = Blockchain::from_blocks(Vec::new());
        assert!(matches!(chain.append("x"), Err(ChainError::EmptyChain)));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_append_after_max_index_fails() {
        let tip = Block::new(u64::MAX, "0", 1.0, "tip", "aa");
        let mut chain = Blockchain::from_blocks(vec![tip.clone()]);

        assert!(matches!(
            chain.append("y"),
            Err(ChainError::IndexOverflow { index: u64::MAX })
        ));
        assert_eq!(chain.blocks(), &[tip]);
    }

    #[test]
    fn test_compute_hash_deterministic() {
        let a = Blockchain::compute_hash(1, "prev", 1_700_000_000.5, "data");
        let b = Blockchain::compute_hash(1, "prev", 1_700_000_000.5, "data");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_compute_hash_sensitive_to_every_field() {
        let base = Blockchain::compute_hash(1, "prev", 1_700_000_000.5, "data");
        assert_ne!(base, Blockchain::compute_hash(2, "prev", 1_700_000_000.5, "data"));
        assert_ne!(base, Blockchain::compute_hash(1, "prev2", 1_700_000_000.5, "data"));
        assert_ne!(base, Blockchain::compute_hash(1, "prev", 1_700_000_000.25, "data"));
        assert_ne!(base, Blockchain::compute_hash(1, "prev", 1_700_000_000.5, "Data"));
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let mut chain = Blockchain::new();
        chain.append("A").unwrap();

        let first: Vec<_> = chain.enumerate().collect();
        let second: Vec<_> = chain.enumerate().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0]["data"], "Genesis Block");
        assert_eq!(first[1]["data"], "A");
    }

    #[test]
    fn test_load_from_replaces_chain() {
        let mut original = Blockchain::new();
        original.append("A").unwrap();
        original.append("B").unwrap();

        let store = InMemoryPersistence::new();
        original.save_to(&store).unwrap();

        let mut fresh = Blockchain::new();
        let outcome = fresh.load_from(&store);
        assert_eq!(outcome, LoadOutcome::Loaded { blocks: 3 });
        assert_eq!(fresh, original);
    }

    #[test]
    fn test_load_from_empty_store_keeps_chain() {
        let mut chain = Blockchain::new();
        let before = chain.clone();

        assert_eq!(chain.load_from(&InMemoryPersistence::new()), LoadOutcome::NotFound);
        assert_eq!(chain, before);
    }

    #[test]
    fn test_load_from_zero_blocks_is_rejected() {
        let store = InMemoryPersistence::new();
        Blockchain::from_blocks(Vec::new()).save_to(&store).unwrap();

        let mut chain = Blockchain::new();
        let before = chain.clone();
        assert!(matches!(chain.load_from(&store), LoadOutcome::Rejected { .. }));
        assert_eq!(chain, before);
    }
}
