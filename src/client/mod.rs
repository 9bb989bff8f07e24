//! Store access layer for Redis/Valkey instances.
//!
//! This module wraps the `fred` client with a type-safe API for the batched,
//! pipelined operations the merge engine needs: a cursor-driven keyspace
//! scan, per-batch TYPE/TTL/value round trips, and batched write application.
//!
//! ## Architecture
//!
//! - `store`: the fred-backed client (connection setup, pipelined batch ops)
//! - `types`: parsed wire types (type tags, scan pages, values, write
//!   commands)
//! - [`StoreOps`]: the scan+pipeline contract as a trait, so the merge engine
//!   runs unchanged against a live store or an in-memory test double
//!
//! Replies of a pipelined round trip come back in submission order; every
//! batched operation here returns results positionally aligned with its
//! input key list.

pub mod store;
pub mod types;

pub use store::{StoreClient, StoreConfig, StoreError};
pub use types::{ParseError, ScanPage, StoreValue, TypeTag, WriteCommand};

/// Batched, pipelined operations against one store.
///
/// Every method is a single network round trip. The slice-returning methods
/// guarantee one reply per input key, in input order; callers may rely on
/// positional alignment.
#[allow(async_fn_in_trait)]
pub trait StoreOps {
    /// One SCAN step from `cursor` with a count hint. The store may return
    /// more or fewer keys than requested.
    async fn scan_page(&self, cursor: &str, count: u32) -> Result<ScanPage, StoreError>;

    /// Pipelined TYPE per key.
    async fn key_types(&self, keys: &[String]) -> Result<Vec<TypeTag>, StoreError>;

    /// Pipelined TTL per key. `-1` means no expiry, `-2` means the key does
    /// not exist.
    async fn key_ttls(&self, keys: &[String]) -> Result<Vec<i64>, StoreError>;

    /// Pipelined value fetch per key, the fetch command selected by the
    /// key's type tag. Vanished keys decode to `None`; keys tagged
    /// [`TypeTag::None`] are fetched with GET purely to keep their pipeline
    /// slot occupied and always decode to `None`.
    async fn fetch_values(
        &self,
        requests: &[(String, TypeTag)],
    ) -> Result<Vec<Option<StoreValue>>, StoreError>;

    /// Apply a buffered batch of writes as one pipelined round trip.
    async fn apply_writes(&self, commands: &[WriteCommand]) -> Result<(), StoreError>;
}
