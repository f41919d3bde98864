//! Read-only view of a recorded sequence

use crate::domain::cache::{LlmCache, LogicalKey, ReturnValue};
use crate::domain::DomainError;

/// Reads the values recorded for `key` straight from a wrapped cache
///
/// Walks positions from zero and stops at the first empty slot or after
/// `limit` values. No counter table is involved, so this never disturbs a
/// replay in progress.
pub async fn recorded_sequence(
    cache: &dyn LlmCache,
    key: &LogicalKey,
    limit: usize,
) -> Result<Vec<ReturnValue>, DomainError> {
    let mut values = Vec::new();

    for position in 0..limit as u64 {
        let physical = key.at(position);
        match cache
            .lookup(physical.prompt(), physical.llm_string())
            .await?
        {
            Some(value) => values.push(value),
            None => break,
        }
    }

    Ok(values)
}
