//! Monotonic stopwatch around executor invocations.

use super::{ExecutionResult, Executor};
use crate::sort::{Batch, SortedBatch};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A value paired with how long it took to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Elapsed time in whole nanoseconds, saturating at `u64::MAX`.
    pub fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Await `future`, measuring the wall-clock time between the first poll
/// and completion.
pub async fn timed<F: Future>(future: F) -> Timed<F::Output> {
    let start = Instant::now();
    let value = future.await;
    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

/// Run `executor` on `batch` and attach the executor's own running time.
///
/// Only the executor call is measured; decoding and encoding happen
/// outside.
pub async fn run_timed(
    executor: &dyn Executor,
    batch: Arc<Batch>,
) -> ExecutionResult<Timed<SortedBatch>> {
    let mode = executor.mode();
    let Timed { value, elapsed } = timed(executor.execute(batch)).await;
    let sorted = value?;
    debug!(
        "{} executor sorted {} sequences in {:?}",
        mode,
        sorted.len(),
        elapsed
    );
    Ok(Timed {
        value: sorted,
        elapsed,
    })
}
