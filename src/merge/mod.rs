//! The merge engine.
//!
//! One merge run drives a full source-to-destination pass per configured
//! source, in configured order, against one shared destination:
//!
//! 1. [`scanner`] walks the source keyspace with a resumable SCAN cursor,
//!    yielding bounded key batches.
//! 2. [`reader`] resolves each batch through three pipelined round trips
//!    (TYPE, TTL, type-appropriate value fetch) and zips the replies into
//!    typed [`entry::Entry`] records immediately - parallel reply arrays
//!    never cross a component boundary.
//! 3. [`coordinator`] applies the retention policy and the run-wide dedup
//!    set: expired keys and keys already written from an earlier source are
//!    skipped and counted; everything else is forwarded exactly once.
//! 4. [`writer`] encodes forwarded entries into type-dispatched write
//!    commands, buffers them, and flushes the pipeline at the configured
//!    threshold and at the end of each pass.
//! 5. [`orchestrator`] sequences the above and reports counters.
//!
//! Any store error aborts the run: without a cursor checkpoint, resuming
//! mid-pass would silently double-process or skip keys.

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod orchestrator;
pub mod reader;
pub mod scanner;
pub mod writer;

pub use coordinator::{Acceptance, Counters, MergeContext};
pub use entry::{Entry, Retention, TTL_KEEP_FLOOR_SECS, TTL_NO_EXPIRY};
pub use error::{MergeError, Result};
pub use orchestrator::MergeOrchestrator;
pub use reader::read_batch;
pub use scanner::{KeyspaceScanner, SCAN_CURSOR_START};
pub use writer::TypedPipelineWriter;
