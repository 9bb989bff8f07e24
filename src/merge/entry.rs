//! Typed entries and the TTL retention policy.

use crate::client::{StoreValue, TypeTag};

/// Remaining TTL above which a key keeps its expiry on the destination.
/// Shorter-lived keys are not worth migrating; they would vanish on their
/// own before the cutover matters.
pub const TTL_KEEP_FLOOR_SECS: i64 = 86_400;

/// The store's "no expiry set" TTL sentinel.
pub const TTL_NO_EXPIRY: i64 = -1;

/// Retention decision for one key, derived from its remaining TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Migrate the key and set this expiry (seconds) on the destination.
    Keep(i64),
    /// Migrate the key with no expiry.
    Persist,
    /// Do not migrate: the key is expired or expires too soon.
    Expire,
}

impl Retention {
    /// Classify a raw remaining TTL in seconds.
    ///
    /// Pure function of its input: `t > 86400` keeps the TTL, `t == -1`
    /// (no expiry) persists, everything else - zero, `-2` (missing key),
    /// other negatives, or a small positive remainder - expires.
    pub fn classify(ttl_secs: i64) -> Self {
        if ttl_secs > TTL_KEEP_FLOOR_SECS {
            Retention::Keep(ttl_secs)
        } else if ttl_secs == TTL_NO_EXPIRY {
            Retention::Persist
        } else {
            Retention::Expire
        }
    }
}

/// One key reconstructed from a source store.
///
/// Composed once per pass from the positionally aligned TYPE, TTL, and value
/// replies of a batch; immutable afterwards; consumed exactly once by the
/// write path or discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The key.
    pub key: String,
    /// Storage type resolved for the key.
    pub tag: TypeTag,
    /// The fetched value, or `None` if the key vanished between type
    /// resolution and the value fetch. Absent values are never written.
    pub value: Option<StoreValue>,
    /// Retention decision from the key's remaining TTL.
    pub retention: Retention,
}
