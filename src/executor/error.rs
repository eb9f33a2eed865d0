use thiserror::Error;

/// Failures observed while joining executor tasks.
///
/// Sorting integers cannot fail, so these only arise when a task or worker
/// never delivers its output (it panicked or the runtime shut down). A
/// failure fails the whole batch; sibling tasks still run to completion and
/// are joined before the error is returned.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("sort task for sequence {index} did not complete: {reason}")]
    TaskFailed { index: usize, reason: String },

    #[error("pool worker {worker} did not complete: {reason}")]
    WorkerFailed { worker: usize, reason: String },

    #[error("no sorted output was recorded for sequence {index}")]
    MissingOutput { index: usize },
}

pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
