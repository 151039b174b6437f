// Thin re-export module: implementation is in `blockchain/core.rs`, split
// into the block value type, chain management, and verification.

pub mod core;
pub use self::core::*;
