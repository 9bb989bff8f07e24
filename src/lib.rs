//! valkey-merge - consolidates the keyspaces of one or more Redis/Valkey
//! instances into a single destination store.
//!
//! The merge engine reads each source with a cursor-driven, pipelined batch
//! pipeline (SCAN, then TYPE, TTL, and a type-appropriate value fetch per
//! batch), classifies every key under a TTL retention policy, deduplicates
//! keys that collide across sources (first writer wins), and replays the
//! surviving entries into the destination through a buffered write pipeline.
//!
//! Crate layout:
//! - [`client`]: the store access layer - a `fred` client wrapper plus the
//!   [`client::StoreOps`] trait that the merge engine is generic over.
//! - [`config`]: run configuration (ordered sources, destination, batch
//!   sizing) loaded from TOML.
//! - [`merge`]: the merge engine itself - scanner, batch reader, dedup
//!   coordinator, pipeline writer, and the orchestrator driving one pass
//!   per source.

pub mod client;
pub mod config;
pub mod merge;

pub use client::{StoreClient, StoreConfig, StoreOps};
pub use config::MergeConfig;
pub use merge::{Counters, MergeError, MergeOrchestrator};
