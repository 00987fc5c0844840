#![warn(missing_docs)]
//! # latchbench
//!
//! Times a batch of N short-sleeping tasks from first dispatch until the last
//! one signals completion, under one of two execution strategies:
//! - **Lightweight**: one tokio task per unit of work; tasks suspend during
//!   their delay, so thousands share a handful of worker threads
//! - **Pooled**: every unit of work goes to a fixed-size rayon pool; tasks
//!   block their worker during the delay, so surplus tasks queue
//!
//! ## Quick Start
//!
//! ```ignore
//! use latchbench::{BarrierRunner, Strategy};
//! use std::time::Duration;
//!
//! let runner = BarrierRunner::new(Duration::from_millis(1000));
//! let outcome = runner.run(10_000, Strategy::Pooled { size: 15 })?;
//! println!("{} ms", outcome.elapsed.as_millis());
//! ```
//!
//! ## Interrupting a task
//!
//! ```ignore
//! let batch = runner.spawn(100, Strategy::Lightweight)?;
//! batch.interrupt(42);
//! let outcome = batch.wait(); // still releases
//! ```

// Re-export core types
pub use latchbench_core::{
    BarrierRunner, BatchOutcome, BenchError, CompletionLatch, DEFAULT_DELAY_MS, DelayError,
    Interrupt, RunningBatch, SleepTask, Stopwatch, Strategy, checked_task_count,
    default_pool_size, expected_floor,
};

// Re-export report types
pub use latchbench_report::{BatchReport, OutputFormat, ReportMeta, SystemInfo};

/// Run the latchbench CLI.
///
/// ```ignore
/// fn main() {
///     latchbench::run().unwrap();
/// }
/// ```
pub use latchbench_cli::run;
