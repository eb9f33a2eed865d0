//! Unbounded fan-out: one task per sequence.
//!
//! Sorting is CPU work, so each task runs on the runtime's blocking pool
//! rather than on a reactor thread. Tasks deliver their sorted copy through
//! their join handle and the joining task stores it at the task's index;
//! no two tasks share an index, so the container needs no lock.

use super::{ExecutionError, ExecutionMode, ExecutionResult, Executor};
use crate::sort::{sort_sequence, Batch, Sequence, SortedBatch};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans out one blocking task per sequence and joins them all before
/// returning.
///
/// There is no cap on the number of tasks in flight; use
/// [`PooledExecutor`](super::PooledExecutor) for very large batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrentExecutor;

#[async_trait]
impl Executor for ConcurrentExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Concurrent
    }

    async fn execute(&self, batch: Arc<Batch>) -> ExecutionResult<SortedBatch> {
        fan_out(batch, sort_sequence).await
    }
}

pub(super) async fn fan_out(
    batch: Arc<Batch>,
    sort_fn: fn(&[i64]) -> Sequence,
) -> ExecutionResult<SortedBatch> {
    let total = batch.len();
    let mut slots: Vec<Option<Sequence>> = vec![None; total];

    debug!("Fanning out {} sort tasks", total);

    let mut tasks = FuturesUnordered::new();
    for index in 0..total {
        let batch = batch.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let sequence = batch.get(index).unwrap_or_default();
            sort_fn(sequence)
        });
        tasks.push(async move { (index, handle.await) });
    }

    // Join barrier: drain every task, whatever order they finish in.
    let mut first_failure = None;
    while let Some((index, joined)) = tasks.next().await {
        match joined {
            Ok(sorted) => slots[index] = Some(sorted),
            Err(e) => {
                warn!("Sort task for sequence {} failed: {}", index, e);
                if first_failure.is_none() {
                    first_failure = Some(ExecutionError::TaskFailed {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    if let Some(err) = first_failure {
        return Err(err);
    }

    collect_slots(slots)
}

/// Turn per-index slots into the final output, failing on any empty slot.
pub(super) fn collect_slots(slots: Vec<Option<Sequence>>) -> ExecutionResult<SortedBatch> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(ExecutionError::MissingOutput { index }))
        .collect::<ExecutionResult<Vec<_>>>()
        .map(SortedBatch::from_sequences)
}
