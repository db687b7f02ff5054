//! The cached gc and reserve sizes may not exceed the number of chunks.

use anyhow::Result;

use crate::localstore::{Index, Uint64Field};

/// Finding for `gc_size + reserve_size > chunk_count`, if violated.
pub fn counter_bound_violation(gc_size: u64, reserve_size: u64, chunk_count: u64) -> Option<String> {
    let sum = gc_size as u128 + reserve_size as u128;
    (sum > chunk_count as u128)
        .then(|| format!("gcSize+reserveSize({}) > chunkCount({})", sum, chunk_count))
}

/// Read both counters and the primary count and check the bound.
///
/// A failed read is reported as a critical finding instead of the bound.
pub fn check_counters(
    gc_size: &Uint64Field<'_>,
    reserve_size: &Uint64Field<'_>,
    primary: &Index<'_>,
) -> Vec<String> {
    let read = || -> Result<(u64, u64, u64)> {
        Ok((gc_size.get()?, reserve_size.get()?, primary.count()?))
    };

    match read() {
        Ok((gc, reserve, count)) => {
            tracing::debug!(gc_size = gc, reserve_size = reserve, chunk_count = count, "Counters read");
            counter_bound_violation(gc, reserve, count).into_iter().collect()
        }
        Err(e) => vec![format!("CRITICAL: failed checking counters: {:#}", e)],
    }
}
