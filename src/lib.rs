//! LinkChain - an append-only chain of records, each linked to its
//! predecessor by a SHA-256 digest and persisted to a JSON file.
//!
//! # Architecture
//!
//! ## Core Chain
//! - [`blockchain`] - Block values, chain management and opt-in verification
//! - [`crypto`] - Canonical hash input and SHA-256 digests
//!
//! ## Storage
//! - [`persistence`] - Persistence backends (JSON file, in-memory)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - CLI utilities

#![forbid(unsafe_code)]

// ============================================================================
// Core Chain
// ============================================================================
pub mod blockchain;
pub mod crypto;

// ============================================================================
// Storage
// ============================================================================
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use blockchain::{Block, BlockRecord, Blockchain, LoadOutcome};
pub use error::{ChainError, Result};
