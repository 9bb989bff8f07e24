//! Error types for the merge engine.

use thiserror::Error;

use crate::client::StoreError;

/// Error type for merge operations.
///
/// Every variant is fatal for the running pass. Store errors are not
/// retried: resuming from an arbitrary cursor offset without a checkpoint
/// would double-process or skip keys. Expected races (a key vanishing
/// between scan and read) never surface here - they decode to `none` type
/// tags or absent values and are counted instead.
#[derive(Error, Debug)]
pub enum MergeError {
    /// Read or write round trip against a store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A resolved type and its value disagree, or a reply violated the
    /// positional contract. Carries the offending key for diagnosis.
    #[error("Contract violation for key '{key}': {detail}")]
    Contract { key: String, detail: String },

    /// A pipelined round trip returned a reply count different from its
    /// request count, so replies can no longer be correlated to keys.
    #[error("Misaligned batch: {stage} returned {actual} replies for {expected} keys")]
    Misaligned {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
