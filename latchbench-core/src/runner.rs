//! Completion Barrier Runner
//!
//! Dispatches N sleep tasks under a [`Strategy`] and times the batch until the
//! shared [`CompletionLatch`] releases.
//!
//! ## Data Flow
//!
//! ```text
//!  count, Strategy
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ build executor   │  tokio runtime or rayon pool (not timed)
//! └────────┬─────────┘
//!          │  stopwatch.start()
//!          ▼
//! ┌──────────────────┐
//! │ dispatch N tasks │  each: sleep(delay) → latch.count_down()
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ latch.wait()     │  no timeout
//! └────────┬─────────┘
//!          │  stopwatch.stop()
//!          ▼
//!     BatchOutcome
//! ```
//!
//! The pooled strategy has no bounded queue and no rejection policy: when N
//! exceeds the pool size, the surplus waits in rayon's injector queue.

use crate::error::BenchError;
use crate::interrupt::Interrupt;
use crate::latch::CompletionLatch;
use crate::measure::{Stopwatch, millis};
use crate::task::SleepTask;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How each task of a batch is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One tokio task per unit of work on a multi-thread runtime
    Lightweight,
    /// Each unit of work submitted to a fixed pool of `size` OS threads
    Pooled {
        /// Number of worker threads
        size: usize,
    },
}

impl Strategy {
    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Lightweight => "lightweight",
            Strategy::Pooled { .. } => "pooled",
        }
    }

    /// Pool size for the pooled strategy
    pub fn pool_size(&self) -> Option<usize> {
        match self {
            Strategy::Lightweight => None,
            Strategy::Pooled { size } => Some(*size),
        }
    }

    fn validate(&self) -> Result<(), BenchError> {
        if let Strategy::Pooled { size: 0 } = self {
            return Err(BenchError::InvalidArgument(
                "pool size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Lightweight => write!(f, "lightweight"),
            Strategy::Pooled { size } => write!(f, "pooled({})", size),
        }
    }
}

/// Default pool size: one less than the available parallelism, at least 1
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Convert a raw, possibly non-positive task count into a valid one
pub fn checked_task_count(raw: i64) -> Result<usize, BenchError> {
    if raw <= 0 {
        return Err(BenchError::InvalidArgument(format!(
            "task count must be positive, got {}",
            raw
        )));
    }
    usize::try_from(raw).map_err(|_| {
        BenchError::InvalidArgument(format!("task count {} does not fit this platform", raw))
    })
}

/// Lower bound on a batch's elapsed time.
///
/// Lightweight tasks all sleep concurrently, so the floor is one delay. A
/// pool of `size` workers runs `ceil(count / size)` waves of delays.
pub fn expected_floor(count: usize, strategy: Strategy, delay: Duration) -> Duration {
    let waves = match strategy {
        Strategy::Lightweight => 1,
        Strategy::Pooled { size } => count.div_ceil(size.max(1)),
    };
    delay.saturating_mul(u32::try_from(waves).unwrap_or(u32::MAX))
}

/// Execution backend for one batch
enum Executor {
    Lightweight(tokio::runtime::Runtime),
    Pooled(rayon::ThreadPool),
}

impl Executor {
    fn build(strategy: Strategy, worker_threads: Option<usize>) -> Result<Self, BenchError> {
        match strategy {
            Strategy::Lightweight => {
                let mut builder = tokio::runtime::Builder::new_multi_thread();
                builder.enable_time().thread_name("latchbench-lightweight");
                if let Some(threads) = worker_threads {
                    builder.worker_threads(threads);
                }
                Ok(Executor::Lightweight(builder.build()?))
            }
            Strategy::Pooled { size } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .thread_name(|i| format!("latchbench-pool-{}", i))
                    .build()?;
                Ok(Executor::Pooled(pool))
            }
        }
    }

    /// Release the executor's threads once the batch has completed.
    ///
    /// The tokio runtime is shut down in the background: dropping it in place
    /// would panic when the caller is itself inside an async context.
    fn shutdown(self) {
        match self {
            Executor::Lightweight(runtime) => runtime.shutdown_background(),
            Executor::Pooled(pool) => drop(pool),
        }
    }

    fn dispatch(&self, task: SleepTask) {
        match self {
            Executor::Lightweight(runtime) => {
                // Detached: completion is observed through the latch.
                let _ = runtime.spawn(task.run());
            }
            Executor::Pooled(pool) => pool.spawn(move || task.run_blocking()),
        }
    }
}

/// Result of one completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Strategy the batch ran under
    pub strategy: Strategy,
    /// Number of tasks dispatched
    pub tasks: usize,
    /// Per-task delay
    pub delay: Duration,
    /// Time from first dispatch until the latch released
    pub elapsed: Duration,
    /// Latch count after the wait returned
    pub remaining: usize,
}

impl BatchOutcome {
    /// Lower bound this batch could have finished in
    pub fn floor(&self) -> Duration {
        expected_floor(self.tasks, self.strategy, self.delay)
    }
}

/// Dispatches batches of sleep tasks and times them
#[derive(Debug, Clone)]
pub struct BarrierRunner {
    delay: Duration,
    worker_threads: Option<usize>,
}

impl BarrierRunner {
    /// Create a runner whose tasks each sleep for `delay`
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            worker_threads: None,
        }
    }

    /// Fix the tokio worker thread count for the lightweight strategy
    ///
    /// Defaults to tokio's choice (one per core).
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Per-task delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Dispatch `count` tasks, block until all complete, and report the time.
    pub fn run(&self, count: usize, strategy: Strategy) -> Result<BatchOutcome, BenchError> {
        Ok(self.spawn(count, strategy)?.wait())
    }

    /// Dispatch `count` tasks and return without waiting.
    ///
    /// The stopwatch is already running when this returns.
    pub fn spawn(&self, count: usize, strategy: Strategy) -> Result<RunningBatch, BenchError> {
        if count == 0 {
            return Err(BenchError::InvalidArgument(
                "task count must be positive, got 0".to_string(),
            ));
        }
        strategy.validate()?;
        if self.worker_threads == Some(0) {
            return Err(BenchError::InvalidArgument(
                "worker thread count must be at least 1".to_string(),
            ));
        }

        let executor = Executor::build(strategy, self.worker_threads)?;
        let latch = Arc::new(CompletionLatch::new(count));
        let interrupts: Arc<[Interrupt]> = (0..count).map(|_| Interrupt::new()).collect();

        info!(
            %strategy,
            tasks = count,
            delay_ms = millis(self.delay),
            "dispatching batch"
        );

        let stopwatch = Stopwatch::started();
        for id in 0..count {
            let task =
                SleepTask::new(id, self.delay, Arc::clone(&interrupts), Arc::clone(&latch));
            executor.dispatch(task);
        }

        Ok(RunningBatch {
            executor,
            latch,
            interrupts,
            stopwatch,
            strategy,
            delay: self.delay,
        })
    }
}

/// A dispatched batch whose tasks may still be running
pub struct RunningBatch {
    // Kept alive until the latch releases; dropped after the wait.
    executor: Executor,
    latch: Arc<CompletionLatch>,
    interrupts: Arc<[Interrupt]>,
    stopwatch: Stopwatch,
    strategy: Strategy,
    delay: Duration,
}

impl RunningBatch {
    /// Number of tasks in the batch
    pub fn tasks(&self) -> usize {
        self.latch.initial()
    }

    /// Tasks that have not yet counted down
    pub fn remaining(&self) -> usize {
        self.latch.count()
    }

    /// Interrupt task `index`'s delay. Returns `false` if out of range.
    pub fn interrupt(&self, index: usize) -> bool {
        match self.interrupts.get(index) {
            Some(flag) => {
                flag.raise();
                true
            }
            None => false,
        }
    }

    /// Block until every task has counted down.
    pub fn wait(self) -> BatchOutcome {
        self.latch.wait();
        self.finish()
    }

    /// Block until every task has counted down, calling `on_tick` with the
    /// number of completed tasks every `tick` while waiting.
    pub fn wait_with_progress(
        self,
        tick: Duration,
        mut on_tick: impl FnMut(usize),
    ) -> BatchOutcome {
        while !self.latch.wait_timeout(tick) {
            on_tick(self.latch.completed());
        }
        on_tick(self.latch.completed());
        self.finish()
    }

    fn finish(mut self) -> BatchOutcome {
        self.stopwatch.stop();
        let outcome = BatchOutcome {
            strategy: self.strategy,
            tasks: self.latch.initial(),
            delay: self.delay,
            elapsed: self.stopwatch.elapsed(),
            remaining: self.latch.count(),
        };
        info!(
            strategy = %outcome.strategy,
            elapsed_ms = millis(outcome.elapsed),
            "batch complete"
        );
        self.executor.shutdown();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_rejected() {
        let runner = BarrierRunner::new(Duration::from_millis(1));
        let err = runner.run(0, Strategy::Lightweight).unwrap_err();
        assert!(matches!(err, BenchError::InvalidArgument(_)));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let runner = BarrierRunner::new(Duration::from_millis(1));
        let err = runner.run(4, Strategy::Pooled { size: 0 }).unwrap_err();
        assert!(matches!(err, BenchError::InvalidArgument(_)));
    }

    #[test]
    fn test_zero_worker_threads_rejected() {
        let runner = BarrierRunner::new(Duration::from_millis(1)).with_worker_threads(0);
        let err = runner.run(4, Strategy::Lightweight).unwrap_err();
        assert!(matches!(err, BenchError::InvalidArgument(_)));
    }

    #[test]
    fn test_checked_task_count() {
        assert_eq!(checked_task_count(1).unwrap(), 1);
        assert_eq!(checked_task_count(10_000).unwrap(), 10_000);
        assert!(matches!(
            checked_task_count(0),
            Err(BenchError::InvalidArgument(_))
        ));
        assert!(matches!(
            checked_task_count(-5),
            Err(BenchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_expected_floor() {
        let delay = Duration::from_millis(1000);
        assert_eq!(expected_floor(10_000, Strategy::Lightweight, delay), delay);
        assert_eq!(
            expected_floor(10_000, Strategy::Pooled { size: 15 }, delay),
            Duration::from_millis(667_000)
        );
        assert_eq!(expected_floor(15, Strategy::Pooled { size: 15 }, delay), delay);
        assert_eq!(
            expected_floor(16, Strategy::Pooled { size: 15 }, delay),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_strategy_display_and_name() {
        assert_eq!(Strategy::Lightweight.to_string(), "lightweight");
        assert_eq!(Strategy::Pooled { size: 15 }.to_string(), "pooled(15)");
        assert_eq!(Strategy::Pooled { size: 3 }.name(), "pooled");
        assert_eq!(Strategy::Pooled { size: 3 }.pool_size(), Some(3));
        assert_eq!(Strategy::Lightweight.pool_size(), None);
    }

    #[test]
    fn test_default_pool_size_positive() {
        assert!(default_pool_size() >= 1);
    }

    #[test]
    fn test_run_single_task_each_strategy() {
        let delay = Duration::from_millis(10);
        let runner = BarrierRunner::new(delay).with_worker_threads(2);
        for strategy in [Strategy::Lightweight, Strategy::Pooled { size: 1 }] {
            let outcome = runner.run(1, strategy).unwrap();
            assert_eq!(outcome.remaining, 0);
            assert_eq!(outcome.tasks, 1);
            assert!(outcome.elapsed >= delay, "{}: {:?}", strategy, outcome.elapsed);
        }
    }

    #[test]
    fn test_interrupt_out_of_range() {
        let runner = BarrierRunner::new(Duration::from_millis(5));
        let batch = runner.spawn(2, Strategy::Pooled { size: 2 }).unwrap();
        assert_eq!(batch.tasks(), 2);
        assert!(!batch.interrupt(2));
        assert!(batch.interrupt(1));
        assert_eq!(batch.wait().remaining, 0);
    }

    #[tokio::test]
    async fn test_run_inside_async_context() {
        let runner = BarrierRunner::new(Duration::from_millis(5)).with_worker_threads(1);
        for strategy in [Strategy::Lightweight, Strategy::Pooled { size: 2 }] {
            let outcome = runner.run(2, strategy).unwrap();
            assert_eq!(outcome.remaining, 0, "{}", strategy);
            assert!(outcome.elapsed >= Duration::from_millis(5));
        }
    }

    #[test]
    fn test_wait_with_progress_reports_completion() {
        let runner = BarrierRunner::new(Duration::from_millis(30));
        let batch = runner.spawn(4, Strategy::Pooled { size: 2 }).unwrap();
        let mut last = 0;
        let outcome = batch.wait_with_progress(Duration::from_millis(5), |done| {
            assert!(done >= last);
            last = done;
        });
        assert_eq!(last, 4);
        assert_eq!(outcome.remaining, 0);
        assert!(outcome.elapsed >= Duration::from_millis(60));
    }
}
