//! Error types

use thiserror::Error;

/// Errors raised while preparing or dispatching a batch
#[derive(Debug, Error)]
pub enum BenchError {
    /// A task count, pool size, or thread count was out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The tokio runtime for lightweight tasks could not be built
    #[error("Failed to build lightweight runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The rayon pool for pooled tasks could not be built
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure of a task's delay step
///
/// Never surfaced past the task: it is logged and the task still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DelayError {
    /// The task's interrupt flag was raised before or during the delay
    #[error("delay interrupted")]
    Interrupted,
}
