//! Shared helpers for the command-line driver.

use crate::blockchain::{Block, Blockchain, LoadOutcome};
use crate::config::Config;
use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Build a chain and replace it with the one stored at the configured path, if any.
pub fn load_blockchain_from_config(config: &Config) -> (Blockchain, LoadOutcome) {
    let mut chain = Blockchain::new();
    let outcome = chain.load(&config.storage.path);
    (chain, outcome)
}

/// Render seconds since the epoch as `DD-MM-YYYY HH:MM:SS` in local time.
/// Display only; never hashed or persisted.
pub fn format_timestamp(timestamp: f64) -> String {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1_000_000_000.0) as u32;
    match DateTime::from_timestamp(secs as i64, nanos.min(999_999_999)) {
        Some(utc) => utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

/// One-line explanation of a load result, for the user.
pub fn describe_load_outcome(outcome: &LoadOutcome, path: &str) -> String {
    match outcome {
        LoadOutcome::Loaded { blocks } => format!("Loaded {} blocks from {}", blocks, path),
        LoadOutcome::NotFound => format!("{} not found. Starting a new chain.", path),
        LoadOutcome::Rejected { reason } => {
            format!("Could not use {} ({}). Starting a new chain.", path, reason)
        }
    }
}

pub fn chain_table(blocks: &[Block]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Index").fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new("Data").fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new("Timestamp").fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new("Hash").fg(Color::Cyan).add_attribute(Attribute::Bold),
        ]);

    for block in blocks {
        table.add_row(vec![
            Cell::new(format!("#{}", block.index())).fg(Color::White),
            Cell::new(block.data()).fg(Color::Green),
            Cell::new(format_timestamp(block.timestamp())).fg(Color::Grey),
            Cell::new(block.hash()).fg(Color::Yellow),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_matches_local_time() {
        let ts = 1_700_000_000.75;
        let expected = Local
            .timestamp_opt(1_700_000_000, 750_000_000)
            .unwrap()
            .format("%d-%m-%Y %H:%M:%S")
            .to_string();
        assert_eq!(format_timestamp(ts), expected);
    }

    #[test]
    fn test_format_timestamp_shape() {
        let s = format_timestamp(0.0);
        assert_eq!(s.len(), 19);
        assert_eq!(&s[2..3], "-");
        assert_eq!(&s[5..6], "-");
        assert_eq!(&s[13..14], ":");
        assert_eq!(&s[16..17], ":");
    }

    #[test]
    fn test_chain_table_lists_every_block() {
        let mut chain = Blockchain::new();
        chain.append("hello").unwrap();

        let mut table = chain_table(chain.blocks());
        table.set_width(400);
        let rendered = table.to_string();
        assert!(rendered.contains("Genesis Block"));
        assert!(rendered.contains("hello"));
        assert!(rendered.contains("#1"));
    }

    #[test]
    fn test_load_from_config_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = dir.path().join("chain.json").display().to_string();

        let (chain, outcome) = load_blockchain_from_config(&config);
        assert_eq!(outcome, LoadOutcome::NotFound);
        assert_eq!(chain.len(), 1);
        assert!(describe_load_outcome(&outcome, &config.storage.path).contains("not found"));
    }
}
