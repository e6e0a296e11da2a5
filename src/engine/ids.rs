use std::collections::BTreeMap;

use crate::error::{ChirpyError, Result};

/// Returns the next id for `records` and raises `high_water` to it.
///
/// Ids start at 1 and only ever grow: the next id is one past the larger of the persisted
/// high-water mark and the highest live id, so an id freed by a deletion is never handed out
/// again. Taking the live maximum into account keeps files that predate the high-water mark
/// (where it reads as 0) from colliding with existing records.
///
/// # Errors
/// returns [`ChirpyError::Malformed`] once the id space is exhausted
pub(crate) fn allocate<V>(records: &BTreeMap<u64, V>, high_water: &mut u64) -> Result<u64> {
    let highest_live = records.keys().next_back().copied().unwrap_or(0);
    let id = (*high_water)
        .max(highest_live)
        .checked_add(1)
        .ok_or_else(|| ChirpyError::Malformed("no ids left to allocate".to_string()))?;
    *high_water = id;
    Ok(id)
}
