#![warn(missing_docs)]
//! latchbench Core - Completion Barrier Harness
//!
//! This crate provides the measurement machinery behind latchbench:
//! - `Stopwatch` for start/stop wall-clock timing on a monotonic clock
//! - `CompletionLatch`, a count-down barrier shared by every task in a batch
//! - `Interrupt`, a per-task flag that aborts a task's delay step
//! - `BarrierRunner`, which dispatches N sleeping tasks under a `Strategy`
//!   (tokio tasks or a fixed rayon pool) and times the batch to completion

mod error;
mod interrupt;
mod latch;
mod measure;
mod runner;
mod task;

pub use error::{BenchError, DelayError};
pub use interrupt::Interrupt;
pub use latch::CompletionLatch;
pub use measure::{Stopwatch, millis};
pub use runner::{
    BarrierRunner, BatchOutcome, RunningBatch, Strategy, checked_task_count, default_pool_size,
    expected_floor,
};
pub use task::SleepTask;

/// Default per-task delay (1 second)
pub const DEFAULT_DELAY_MS: u64 = 1_000;
