//! Sleep Task
//!
//! The unit of work dispatched by the runner: sleep for a fixed delay, then
//! count the shared latch down exactly once.

use crate::error::DelayError;
use crate::interrupt::Interrupt;
use crate::latch::CompletionLatch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Counts the latch down when dropped, so the decrement happens exactly once
/// even if the task body unwinds.
struct CountDownOnDrop(Arc<CompletionLatch>);

impl Drop for CountDownOnDrop {
    fn drop(&mut self) {
        self.0.count_down();
    }
}

/// One benchmark task
pub struct SleepTask {
    id: usize,
    delay: Duration,
    interrupts: Arc<[Interrupt]>,
    latch: Arc<CompletionLatch>,
}

impl SleepTask {
    /// Create task `id`; its interrupt flag is `interrupts[id]`.
    pub fn new(
        id: usize,
        delay: Duration,
        interrupts: Arc<[Interrupt]>,
        latch: Arc<CompletionLatch>,
    ) -> Self {
        debug_assert!(id < interrupts.len());
        Self {
            id,
            delay,
            interrupts,
            latch,
        }
    }

    /// Run on the current OS thread, blocking it for the delay.
    pub fn run_blocking(self) {
        let _done = CountDownOnDrop(Arc::clone(&self.latch));
        self.log_start();
        let outcome = self.interrupts[self.id].sleep_blocking(self.delay);
        self.log_finish(outcome);
    }

    /// Run as an async task, suspending (not blocking) during the delay.
    pub async fn run(self) {
        let _done = CountDownOnDrop(Arc::clone(&self.latch));
        self.log_start();
        let outcome = self.interrupts[self.id].sleep(self.delay).await;
        self.log_finish(outcome);
    }

    fn log_start(&self) {
        let thread = std::thread::current();
        debug!(task = self.id, thread = thread.name().unwrap_or("unnamed"), "start");
    }

    fn log_finish(&self, outcome: Result<(), DelayError>) {
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("unnamed");
        match outcome {
            Ok(()) => debug!(task = self.id, thread, "stop"),
            Err(e) => warn!(task = self.id, thread, error = %e, "task delay failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn single(delay: Duration) -> (SleepTask, Arc<[Interrupt]>, Arc<CompletionLatch>) {
        let interrupts: Arc<[Interrupt]> = vec![Interrupt::new()].into();
        let latch = Arc::new(CompletionLatch::new(1));
        let task = SleepTask::new(0, delay, Arc::clone(&interrupts), Arc::clone(&latch));
        (task, interrupts, latch)
    }

    #[test]
    fn test_blocking_task_counts_down_after_delay() {
        let (task, _interrupts, latch) = single(Duration::from_millis(15));
        let start = Instant::now();
        task.run_blocking();
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_interrupted_blocking_task_still_counts_down() {
        let (task, interrupts, latch) = single(Duration::from_secs(30));
        interrupts[0].raise();
        task.run_blocking();
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_panicking_body_still_counts_down() {
        let latch = Arc::new(CompletionLatch::new(1));
        let guard_latch = Arc::clone(&latch);
        let result = std::panic::catch_unwind(move || {
            let _done = CountDownOnDrop(guard_latch);
            panic!("task body failed");
        });
        assert!(result.is_err());
        assert_eq!(latch.count(), 0);
    }

    #[tokio::test]
    async fn test_async_task_counts_down_after_delay() {
        let (task, _interrupts, latch) = single(Duration::from_millis(15));
        let start = Instant::now();
        task.run().await;
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert_eq!(latch.count(), 0);
    }

    #[tokio::test]
    async fn test_interrupted_async_task_still_counts_down() {
        let (task, interrupts, latch) = single(Duration::from_secs(30));
        interrupts[0].raise();
        task.run().await;
        assert_eq!(latch.count(), 0);
    }
}
