//! Batch reconstruction of typed entries.
//!
//! For one key batch, three pipelined round trips run over the identical
//! ordered key list: TYPE per key, TTL per key, then a type-appropriate
//! value fetch per key. Replies correlate to keys purely by position, so
//! each round trip is length-checked and its replies are zipped with the
//! keys immediately.

use tracing::debug;

use crate::client::{StoreOps, TypeTag};

use super::entry::{Entry, Retention};
use super::error::{MergeError, Result};

/// Resolve one scanned key batch into typed entries.
///
/// Keys whose type resolves to `none` (expired between scan and read) are
/// reported at debug level and carried through every round trip to keep the
/// pipeline slots aligned; their TTL of `-2` classifies them as `Expire`, so
/// they are skip-counted downstream rather than written.
pub async fn read_batch<S: StoreOps>(store: &S, keys: Vec<String>) -> Result<Vec<Entry>> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let tags = store.key_types(&keys).await?;
    ensure_aligned("TYPE", keys.len(), tags.len())?;

    let vanished = tags.iter().filter(|tag| **tag == TypeTag::None).count();
    if vanished > 0 {
        debug!(vanished, "keys expired between scan and type resolution");
    }

    let ttls = store.key_ttls(&keys).await?;
    ensure_aligned("TTL", keys.len(), ttls.len())?;

    let requests: Vec<(String, TypeTag)> = keys.into_iter().zip(tags).collect();
    let values = store.fetch_values(&requests).await?;
    ensure_aligned("value fetch", requests.len(), values.len())?;

    let entries = requests
        .into_iter()
        .zip(ttls)
        .zip(values)
        .map(|(((key, tag), ttl), value)| Entry {
            key,
            tag,
            value: if tag == TypeTag::None { None } else { value },
            retention: Retention::classify(ttl),
        })
        .collect();

    Ok(entries)
}

fn ensure_aligned(stage: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MergeError::Misaligned {
            stage,
            expected,
            actual,
        })
    }
}
