// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Functional tests for the merge engine.
//!
//! These tests run full merge passes against an in-memory store double
//! WITHOUT requiring live Redis/Valkey instances, exercising the production
//! scanner/reader/coordinator/writer/orchestrator end to end.
//!
//! ```bash
//! # Run all functional tests
//! cargo test --test functional
//!
//! # Run specific test
//! cargo test --test functional test_end_to_end_single_source
//! ```
//!
//! ## Test Categories
//!
//! - **Merge tests**: end-to-end single-source and multi-source scenarios,
//!   dedup and retention counters, list order, flush cadence, failure paths
//! - **Retention properties**: property-based tests of the TTL
//!   classification rule

mod merge_tests;
mod retention_props;

pub use memory_store::MemoryStore;
