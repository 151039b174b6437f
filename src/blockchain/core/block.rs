use crate::error::ChainError;
use serde_json::{Map, Value};

/// Flat key-value form of a [`Block`], as written to and read from disk.
pub type BlockRecord = Map<String, Value>;

pub const FIELD_INDEX: &str = "index";
pub const FIELD_PREVIOUS_HASH: &str = "previous_hash";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_DATA: &str = "data";
pub const FIELD_HASH: &str = "hash";

/// One link in the chain.
///
/// A block is a plain value: it stores the digest it was given and never
/// computes one itself. Hashing policy lives in
/// [`Blockchain::compute_hash`](super::chain::Blockchain::compute_hash).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    index: u64,
    previous_hash: String,
    timestamp: f64,
    data: String,
    hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        timestamp: f64,
        data: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Block {
            index,
            previous_hash: previous_hash.into(),
            timestamp,
            data: data.into(),
            hash: hash.into(),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Seconds since the Unix epoch, fractional part retained.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn to_record(&self) -> BlockRecord {
        let mut record = Map::with_capacity(5);
        record.insert(FIELD_INDEX.to_string(), Value::from(self.index));
        record.insert(
            FIELD_PREVIOUS_HASH.to_string(),
            Value::from(self.previous_hash.clone()),
        );
        record.insert(FIELD_TIMESTAMP.to_string(), Value::from(self.timestamp));
        record.insert(FIELD_DATA.to_string(), Value::from(self.data.clone()));
        record.insert(FIELD_HASH.to_string(), Value::from(self.hash.clone()));
        record
    }

    /// Rebuilds a block from its record, checking that all five fields are
    /// present and correctly typed.
    pub fn from_record(record: &BlockRecord) -> Result<Self, ChainError> {
        let index = field(record, FIELD_INDEX)?.as_u64().ok_or_else(|| {
            ChainError::MalformedRecord(format!(
                "field '{}' must be a non-negative integer",
                FIELD_INDEX
            ))
        })?;
        let timestamp = field(record, FIELD_TIMESTAMP)?.as_f64().ok_or_else(|| {
            ChainError::MalformedRecord(format!("field '{}' must be a number", FIELD_TIMESTAMP))
        })?;

        Ok(Block {
            index,
            previous_hash: string_field(record, FIELD_PREVIOUS_HASH)?,
            timestamp,
            data: string_field(record, FIELD_DATA)?,
            hash: string_field(record, FIELD_HASH)?,
        })
    }

    /// Same as [`Block::from_record`], for a value not yet known to be an object.
    pub fn from_value(value: &Value) -> Result<Self, ChainError> {
        match value {
            Value::Object(record) => Block::from_record(record),
            other => Err(ChainError::MalformedRecord(format!(
                "expected an object, found {}",
                json_kind(other)
            ))),
        }
    }
}

fn field<'a>(record: &'a BlockRecord, name: &str) -> Result<&'a Value, ChainError> {
    record
        .get(name)
        .ok_or_else(|| ChainError::MalformedRecord(format!("missing field '{}'", name)))
}

fn string_field(record: &BlockRecord, name: &str) -> Result<String, ChainError> {
    field(record, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChainError::MalformedRecord(format!("field '{}' must be a string", name)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
