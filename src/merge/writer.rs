//! Type-dispatched, buffered destination writes.

use crate::client::{StoreOps, StoreValue, TypeTag, WriteCommand};

use super::entry::{Entry, Retention};
use super::error::{MergeError, Result};

/// Buffers destination writes and flushes them as pipelined round trips.
///
/// Each forwarded entry is encoded into its type-specific write command,
/// followed in the same batch by an EXPIRE when the entry keeps a TTL. The
/// buffer is flushed once the number of processed entries since the last
/// flush reaches the configured threshold, and unconditionally by
/// [`finish`](Self::finish) at the end of a pass. A malformed entry aborts
/// the pass: once a pipeline is submitted it is all-or-nothing anyway.
pub struct TypedPipelineWriter<'a, S: StoreOps> {
    dest: &'a S,
    buffer: Vec<WriteCommand>,
    processed_since_flush: usize,
    flush_threshold: usize,
}

impl<'a, S: StoreOps> TypedPipelineWriter<'a, S> {
    /// Create a writer for one pass against the destination.
    pub fn new(dest: &'a S, flush_threshold: usize) -> Self {
        Self {
            dest,
            buffer: Vec::new(),
            processed_since_flush: 0,
            flush_threshold,
        }
    }

    /// Process one forwarded entry. Returns `true` if the entry was encoded
    /// into destination writes, `false` if it carried an absent value and
    /// wrote nothing.
    pub async fn write(&mut self, entry: &Entry) -> Result<bool> {
        let written = match encode_entry(entry)? {
            Some(commands) => {
                self.buffer.extend(commands);
                true
            }
            None => false,
        };

        self.processed_since_flush += 1;
        if self.processed_since_flush >= self.flush_threshold {
            self.flush().await?;
        }

        Ok(written)
    }

    /// Apply everything buffered in one pipelined round trip.
    pub async fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.dest.apply_writes(&self.buffer).await?;
            self.buffer.clear();
        }
        self.processed_since_flush = 0;
        Ok(())
    }

    /// Drain the remainder at the end of a pass.
    pub async fn finish(&mut self) -> Result<()> {
        self.flush().await
    }
}

/// Encode one entry into its destination write commands.
///
/// Dispatch is by type tag; the value shape must match the tag or the pass
/// aborts. List elements are appended (RPUSH) in their LRANGE order, so the
/// destination list reads back in the same order as the source - a prepend
/// would reverse it. Absent values encode to nothing.
fn encode_entry(entry: &Entry) -> Result<Option<Vec<WriteCommand>>> {
    let Some(value) = &entry.value else {
        return Ok(None);
    };

    let write = match (entry.tag, value) {
        (TypeTag::String, StoreValue::Text(text)) => WriteCommand::Set {
            key: entry.key.clone(),
            value: text.clone(),
        },
        (TypeTag::Hash, StoreValue::Fields(fields)) => WriteCommand::HSetAll {
            key: entry.key.clone(),
            fields: fields.clone(),
        },
        (TypeTag::List, StoreValue::Elements(elements)) => WriteCommand::RPush {
            key: entry.key.clone(),
            elements: elements.clone(),
        },
        (TypeTag::Set, StoreValue::Members(members)) => WriteCommand::SAdd {
            key: entry.key.clone(),
            members: members.clone(),
        },
        (TypeTag::ZSet, StoreValue::Scored(members)) => WriteCommand::ZAdd {
            key: entry.key.clone(),
            members: members.clone(),
        },
        (TypeTag::None, _) => return Ok(None),
        (tag, value) => {
            return Err(MergeError::Contract {
                key: entry.key.clone(),
                detail: format!("type {tag} carries mismatched value {value:?}"),
            });
        }
    };

    let mut commands = vec![write];
    if let Retention::Keep(ttl) = entry.retention {
        commands.push(WriteCommand::Expire {
            key: entry.key.clone(),
            seconds: ttl,
        });
    }

    Ok(Some(commands))
}
