//! Wire-level types exchanged with a Redis/Valkey store.
//!
//! These types represent the parsed results of scan and read commands and
//! the batched write commands the merge engine replays into the destination.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur when parsing store replies.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unknown storage type: {0}")]
    UnknownType(String),
    #[error("Invalid scan reply: {0}")]
    InvalidScanReply(String),
}

/// Storage type of a key as reported by the TYPE command.
///
/// `None` means the key no longer exists - an expected race between SCAN and
/// the batched reads, not an error. It still occupies a slot in every
/// pipelined round trip so replies stay positionally aligned with the key
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Hash,
    List,
    Set,
    ZSet,
    None,
}

impl FromStr for TypeTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(TypeTag::String),
            "hash" => Ok(TypeTag::Hash),
            "list" => Ok(TypeTag::List),
            "set" => Ok(TypeTag::Set),
            "zset" => Ok(TypeTag::ZSet),
            "none" => Ok(TypeTag::None),
            other => Err(ParseError::UnknownType(other.to_string())),
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::String => write!(f, "string"),
            TypeTag::Hash => write!(f, "hash"),
            TypeTag::List => write!(f, "list"),
            TypeTag::Set => write!(f, "set"),
            TypeTag::ZSet => write!(f, "zset"),
            TypeTag::None => write!(f, "none"),
        }
    }
}

/// One page of a cursor-driven keyspace scan.
///
/// A cursor equal to [`SCAN_CURSOR_START`](crate::merge::SCAN_CURSOR_START)
/// returned after at least one request means the scan is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor to resume the scan from.
    pub cursor: String,
    /// Keys returned by this step. The store may return more or fewer keys
    /// than the count hint, and may repeat keys across pages.
    pub keys: Vec<String>,
}

/// Value representation of a key, shaped by its [`TypeTag`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Scalar string value.
    Text(String),
    /// Hash field-value mapping.
    Fields(HashMap<String, String>),
    /// List elements in LRANGE order.
    Elements(Vec<String>),
    /// Set members.
    Members(Vec<String>),
    /// Sorted-set members with scores, in rank order.
    Scored(Vec<(String, f64)>),
}

/// A single destination write queued into the pipeline buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCommand {
    /// SET key value.
    Set { key: String, value: String },
    /// HSET key field value [field value ...].
    HSetAll {
        key: String,
        fields: HashMap<String, String>,
    },
    /// RPUSH key element [element ...]. Appending preserves source list
    /// order; a prepend here would reverse it.
    RPush { key: String, elements: Vec<String> },
    /// SADD key member [member ...].
    SAdd { key: String, members: Vec<String> },
    /// ZADD key score member [score member ...].
    ZAdd {
        key: String,
        members: Vec<(String, f64)>,
    },
    /// EXPIRE key seconds, issued right after the value write for keys that
    /// keep a long-lived TTL.
    Expire { key: String, seconds: i64 },
}

impl WriteCommand {
    /// The destination key this command touches.
    pub fn key(&self) -> &str {
        match self {
            WriteCommand::Set { key, .. }
            | WriteCommand::HSetAll { key, .. }
            | WriteCommand::RPush { key, .. }
            | WriteCommand::SAdd { key, .. }
            | WriteCommand::ZAdd { key, .. }
            | WriteCommand::Expire { key, .. } => key,
        }
    }
}
