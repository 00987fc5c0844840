//! Interruptible Delays
//!
//! Each task owns an `Interrupt`. Raising it aborts the task's delay with
//! `DelayError::Interrupted`, both for blocking sleeps on pool threads and for
//! `tokio::time::sleep` on the lightweight runtime. The flag is consumed by
//! the delay that observes it.

use crate::error::DelayError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// Per-task interrupt flag
#[derive(Debug, Default)]
pub struct Interrupt {
    raised: AtomicBool,
    /// Held by blocking sleepers between checking the flag and parking
    lock: Mutex<()>,
    /// Wakes blocking sleepers
    wake: Condvar,
    /// Wakes async sleepers
    notify: Notify,
}

impl Interrupt {
    /// Create a lowered flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake any sleeper
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        // Taking the lock orders this wake after a blocking sleeper's flag check.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.wake.notify_all();
        self.notify.notify_waiters();
    }

    #[cfg(test)]
    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Block the current thread for `delay` unless interrupted.
    pub fn sleep_blocking(&self, delay: Duration) -> Result<(), DelayError> {
        let deadline = Instant::now() + delay;
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.take() {
                return Err(DelayError::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            guard = self
                .wake
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Suspend the current task for `delay` unless interrupted.
    pub async fn sleep(&self, delay: Duration) -> Result<(), DelayError> {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent raise is not lost.
        notified.as_mut().enable();

        if self.take() {
            return Err(DelayError::Interrupted);
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = notified => {
                self.take();
                Err(DelayError::Interrupted)
            }
        }
    }
}
