use crate::blockchain::core::block::Block;
use crate::blockchain::core::chain::{Blockchain, GENESIS_PREVIOUS_HASH};
use crate::error::ChainError;

/// Checks a sequence of blocks the way a freshly built chain would look:
/// a genesis block at index 0 with the sentinel previous hash, consecutive
/// indices, each `previous_hash` equal to its predecessor's hash, and every
/// stored hash equal to the recomputed digest.
pub fn verify_blocks(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks
        .first()
        .ok_or_else(|| ChainError::InvalidGenesis("chain is empty".to_string()))?;

    if genesis.index() != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "expected index 0, but got {}",
            genesis.index()
        )));
    }
    if genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
        return Err(ChainError::InvalidGenesis(format!(
            "expected previous hash '{}', but got '{}'",
            GENESIS_PREVIOUS_HASH,
            genesis.previous_hash()
        )));
    }
    verify_hash(genesis)?;

    for pair in blocks.windows(2) {
        let (previous, block) = (&pair[0], &pair[1]);

        let expected = previous
            .index()
            .checked_add(1)
            .ok_or(ChainError::IndexOverflow {
                index: previous.index(),
            })?;
        if block.index() != expected {
            return Err(ChainError::IndexGap {
                expected,
                found: block.index(),
            });
        }
        if block.previous_hash() != previous.hash() {
            return Err(ChainError::InvalidBlockLinkage {
                index: block.index(),
            });
        }
        verify_hash(block)?;
    }
    Ok(())
}

fn verify_hash(block: &Block) -> Result<(), ChainError> {
    let recomputed = Blockchain::compute_hash(
        block.index(),
        block.previous_hash(),
        block.timestamp(),
        block.data(),
    );
    if recomputed != block.hash() {
        return Err(ChainError::HashMismatch {
            index: block.index(),
        });
    }
    Ok(())
}
