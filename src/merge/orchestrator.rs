//! Drives one source-to-destination pass per configured source.

use std::time::Instant;

use tracing::info;

use crate::client::StoreOps;

use super::coordinator::{Acceptance, Counters, MergeContext};
use super::error::Result;
use super::reader::read_batch;
use super::scanner::KeyspaceScanner;
use super::writer::TypedPipelineWriter;

/// Sequences scanner, batch reader, dedup coordinator, and pipeline writer,
/// one full pass per source, all into one shared destination.
///
/// The orchestrator owns the [`MergeContext`] for the lifetime of a
/// multi-source run, so the dedup set and counters span every pass. Batches
/// are processed strictly one at a time: a batch's three read round trips
/// and its writes complete before the next scan step, bounding live memory
/// to one batch of entries.
pub struct MergeOrchestrator<'a, D: StoreOps> {
    dest: &'a D,
    ctx: MergeContext,
    scan_count: u32,
    flush_threshold: usize,
}

impl<'a, D: StoreOps> MergeOrchestrator<'a, D> {
    /// Create an orchestrator writing into `dest`.
    pub fn new(dest: &'a D, scan_count: u32, flush_threshold: usize) -> Self {
        Self {
            dest,
            ctx: MergeContext::new(),
            scan_count,
            flush_threshold,
        }
    }

    /// Run one full pass over a source.
    ///
    /// Sources must be merged in configured order: the run-wide dedup set
    /// makes the first source holding a key its winner. Any error aborts
    /// the run with the destination partially populated; there is no
    /// checkpoint to resume from.
    pub async fn merge_source<S: StoreOps>(&mut self, label: &str, source: &S) -> Result<()> {
        let pass_start = Instant::now();
        let mut scanner = KeyspaceScanner::new(source, self.scan_count);
        let mut writer = TypedPipelineWriter::new(self.dest, self.flush_threshold);
        let mut pass_scanned: u64 = 0;

        info!(source = %label, "starting merge pass");

        while let Some(keys) = scanner.next_batch().await? {
            let batch_start = Instant::now();
            let batch_len = keys.len() as u64;
            self.ctx.counters.scanned += batch_len;
            pass_scanned += batch_len;

            let entries = read_batch(source, keys).await?;
            for entry in &entries {
                match self.ctx.accept(entry) {
                    Acceptance::Forward => {
                        if writer.write(entry).await? {
                            self.ctx.counters.merged += 1;
                        }
                    }
                    Acceptance::SkipExpired | Acceptance::SkipDuplicate => {}
                }
            }

            info!(
                source = %label,
                keys = batch_len,
                scanned = pass_scanned,
                elapsed_ms = batch_start.elapsed().as_millis() as u64,
                "batch processed"
            );
        }

        writer.finish().await?;

        let counters = self.ctx.counters;
        info!(
            source = %label,
            pass_scanned,
            pass_elapsed_ms = pass_start.elapsed().as_millis() as u64,
            total_scanned = counters.scanned,
            total_merged = counters.merged,
            total_expired_skipped = counters.expired_skipped,
            total_duplicate_skipped = counters.duplicate_skipped,
            "source pass complete"
        );

        Ok(())
    }

    /// Running totals for the run so far.
    pub fn counters(&self) -> Counters {
        self.ctx.counters
    }

    /// Consume the orchestrator, returning the final totals.
    pub fn into_counters(self) -> Counters {
        self.ctx.counters
    }
}
