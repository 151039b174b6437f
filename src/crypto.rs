//! Hashing primitives for LinkChain

use sha2::{Digest, Sha256};

/// Separator placed between fields of the canonical hash input.
pub const FIELD_SEPARATOR: char = '|';

/// Number of fractional digits used when rendering a timestamp for hashing.
pub const TIMESTAMP_PRECISION: usize = 6;

/// Builds the canonical text that a block digest is computed over.
///
/// Layout: `index|previous_hash|timestamp|data`, with the index in base 10
/// and the timestamp in fixed-point notation with [`TIMESTAMP_PRECISION`]
/// fractional digits. `data` comes last, so a separator inside it cannot
/// shift any other field.
pub fn canonical_block_input(index: u64, previous_hash: &str, timestamp: f64, data: &str) -> String {
    format!(
        "{index}{sep}{previous_hash}{sep}{timestamp:.prec$}{sep}{data}",
        sep = FIELD_SEPARATOR,
        prec = TIMESTAMP_PRECISION,
    )
}

/// SHA-256 of `bytes`, as 64 lowercase hex characters.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_input_layout() {
        let s = canonical_block_input(7, "abc", 1_700_000_000.5, "hello|world");
        assert_eq!(s, "7|abc|1700000000.500000|hello|world");
    }

    #[test]
    fn test_canonical_input_integral_timestamp() {
        let s = canonical_block_input(0, "0", 12.0, "Genesis Block");
        assert_eq!(s, "0|0|12.000000|Genesis Block");
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
