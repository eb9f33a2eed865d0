use super::{ExecutionMode, ExecutionResult, Executor};
use crate::sort::{sort_sequence, Batch, SortedBatch};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Sorts each sequence in index order on the caller's task. This is the
/// correctness baseline the other executors are measured against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    /// Synchronous core, usable outside a runtime.
    pub fn sort_batch(&self, batch: &Batch) -> SortedBatch {
        let mut sorted = Vec::with_capacity(batch.len());
        for sequence in batch.sequences() {
            sorted.push(sort_sequence(sequence));
        }
        SortedBatch::from_sequences(sorted)
    }
}

#[async_trait]
impl Executor for SequentialExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    /// Sorts inline on the calling task and never yields. The whole batch
    /// is sorted within a single poll, so a large batch holds the runtime
    /// worker thread that polls it until it is done. Use the concurrent or
    /// pooled executor to keep sorting off the async workers.
    async fn execute(&self, batch: Arc<Batch>) -> ExecutionResult<SortedBatch> {
        debug!("Sorting {} sequences sequentially", batch.len());
        Ok(self.sort_batch(&batch))
    }
}
