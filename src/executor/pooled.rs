//! Bounded fan-out: a fixed number of workers drain a shared queue of
//! sequence indices.

use super::concurrent::collect_slots;
use super::{ExecutionError, ExecutionMode, ExecutionResult, Executor};
use crate::sort::{sort_sequence, Batch, Sequence, SortedBatch};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Sorts a batch with at most `workers` blocking tasks in flight.
///
/// Produces the same output as the other executors; only the amount of
/// parallelism differs.
#[derive(Debug, Clone, Copy)]
pub struct PooledExecutor {
    workers: NonZeroUsize,
}

impl PooledExecutor {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }
}

#[async_trait]
impl Executor for PooledExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Pooled
    }

    async fn execute(&self, batch: Arc<Batch>) -> ExecutionResult<SortedBatch> {
        drain_with_workers(batch, self.workers, sort_sequence).await
    }
}

async fn drain_with_workers(
    batch: Arc<Batch>,
    workers: NonZeroUsize,
    sort_fn: fn(&[i64]) -> Sequence,
) -> ExecutionResult<SortedBatch> {
    let total = batch.len();
    let worker_count = workers.get().min(total);
    let mut slots: Vec<Option<Sequence>> = vec![None; total];

    debug!(
        "Sorting {} sequences on {} pool workers (max: {})",
        total, worker_count, workers
    );

    let queue = Arc::new(Mutex::new((0..total).collect::<VecDeque<usize>>()));

    let handles = (0..worker_count).map(|worker| {
        let batch = batch.clone();
        let queue = queue.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let mut done = Vec::new();
            loop {
                // The queue holds plain indices, so a poisoned lock is still usable.
                let next = queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                let Some(index) = next else {
                    break;
                };
                let sequence = batch.get(index).unwrap_or_default();
                done.push((index, sort_fn(sequence)));
            }
            done
        });
        async move { (worker, handle.await) }
    });

    let mut first_failure = None;
    for (worker, joined) in join_all(handles).await {
        match joined {
            Ok(done) => {
                for (index, sorted) in done {
                    slots[index] = Some(sorted);
                }
            }
            Err(e) => {
                warn!("Pool worker {} failed: {}", worker, e);
                if first_failure.is_none() {
                    first_failure = Some(ExecutionError::WorkerFailed {
                        worker,
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
