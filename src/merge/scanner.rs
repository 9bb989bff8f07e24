//! Cursor-driven keyspace scanning.

use crate::client::StoreOps;

use super::error::Result;

/// The reserved cursor token denoting start-of-keyspace. A scan step
/// returning this cursor (after at least one request) means the full
/// keyspace has been enumerated.
pub const SCAN_CURSOR_START: &str = "0";

/// Iterates the full keyspace of one source via a resumable SCAN cursor,
/// yielding bounded key batches.
///
/// The loop is a do-while: the first request is always issued, and the scan
/// terminates only once the store hands the start cursor back. The store may
/// return more or fewer keys than the count hint (including empty batches
/// mid-scan), and keys may be observed more than once within a pass - the
/// dedup set downstream absorbs repeats.
pub struct KeyspaceScanner<'a, S: StoreOps> {
    store: &'a S,
    count: u32,
    cursor: String,
    started: bool,
}

impl<'a, S: StoreOps> KeyspaceScanner<'a, S> {
    /// Create a scanner over one source for a single pass.
    pub fn new(store: &'a S, count: u32) -> Self {
        Self {
            store,
            count,
            cursor: SCAN_CURSOR_START.to_string(),
            started: false,
        }
    }

    /// Fetch the next key batch, or `None` once the scan has completed.
    ///
    /// Store errors are fatal for the pass; a partial scan is never resumed.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<String>>> {
        if self.started && self.cursor == SCAN_CURSOR_START {
            return Ok(None);
        }

        let page = self.store.scan_page(&self.cursor, self.count).await?;
        self.started = true;
        self.cursor = page.cursor;
        Ok(Some(page.keys))
    }
}
