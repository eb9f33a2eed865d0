//! Execution strategies that turn a [`Batch`] into a [`SortedBatch`].
//!
//! Every executor honours the same contract: the output has one entry per
//! input sequence, at the same index, and is element-wise equal to what
//! [`SequentialExecutor`] produces. They differ only in how the work is
//! scheduled:
//!
//! - [`SequentialExecutor`] sorts in index order on the caller's task
//! - [`ConcurrentExecutor`] fans out one blocking task per sequence
//! - [`PooledExecutor`] drains a shared queue with a fixed number of workers
//!
//! [`timing::run_timed`] wraps any of them with a monotonic stopwatch.

mod concurrent;
mod error;
mod pooled;
mod sequential;
pub mod timing;

pub use concurrent::ConcurrentExecutor;
pub use error::{ExecutionError, ExecutionResult};
pub use pooled::PooledExecutor;
pub use sequential::SequentialExecutor;
pub use timing::{run_timed, Timed};

use crate::sort::{Batch, SortedBatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// A strategy for sorting every sequence of a batch.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Which strategy this is, for logging and routing.
    fn mode(&self) -> ExecutionMode;

    /// Sort every sequence of `batch`.
    ///
    /// Returns only once all work for the batch has finished; no partial
    /// result is ever observable.
    async fn execute(&self, batch: Arc<Batch>) -> ExecutionResult<SortedBatch>;
}

/// Selectable execution strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Sequential,
    Concurrent,
    Pooled,
}

impl ExecutionMode {
    pub const ALL: [ExecutionMode; 3] = [
        ExecutionMode::Sequential,
        ExecutionMode::Concurrent,
        ExecutionMode::Pooled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Concurrent => "concurrent",
            ExecutionMode::Pooled => "pooled",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the executor for `mode`. `pool_workers` only matters for
/// [`ExecutionMode::Pooled`].
pub fn create_executor(mode: ExecutionMode, pool_workers: NonZeroUsize) -> Arc<dyn Executor> {
    match mode {
        ExecutionMode::Sequential => Arc::new(SequentialExecutor),
        ExecutionMode::Concurrent => Arc::new(ConcurrentExecutor),
        ExecutionMode::Pooled => Arc::new(PooledExecutor::new(pool_workers)),
    }
}
