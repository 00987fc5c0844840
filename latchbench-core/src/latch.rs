//! Completion Latch
//!
//! A count-down barrier: initialized to N, decremented once per finished task,
//! and released when the count reaches zero.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Count-down barrier shared by every task of a batch
#[derive(Debug)]
pub struct CompletionLatch {
    initial: usize,
    count: Mutex<usize>,
    /// Signaled when the count reaches zero
    released: Condvar,
}

impl CompletionLatch {
    /// Create a latch that releases after `count` decrements
    pub fn new(count: usize) -> Self {
        Self {
            initial: count,
            count: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    // The count is only ever changed by a saturating decrement, so a guard
    // recovered from a poisoned lock still holds a valid value.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decrement the count, releasing waiters when it reaches zero.
    ///
    /// Returns the remaining count. Decrementing an already released latch
    /// leaves it at zero.
    pub fn count_down(&self) -> usize {
        let mut count = self.lock();
        if *count == 0 {
            tracing::warn!(initial = self.initial, "count_down on a released latch");
            return 0;
        }
        *count -= 1;
        if *count == 0 {
            self.released.notify_all();
        }
        *count
    }

    /// Current count
    pub fn count(&self) -> usize {
        *self.lock()
    }

    /// Count the latch was created with
    pub fn initial(&self) -> usize {
        self.initial
    }

    /// Number of decrements observed so far
    pub fn completed(&self) -> usize {
        self.initial - self.count()
    }

    /// Block until the count reaches zero. No timeout.
    pub fn wait(&self) {
        let mut count = self.lock();
        while *count > 0 {
            count = self
                .released
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the count reaches zero or `timeout` passes.
    ///
    /// Returns `true` if the latch is released.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.lock();
        while *count > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            count = self
                .released
                .wait_timeout(count, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_count_down_to_zero() {
        let latch = CompletionLatch::new(3);
        assert_eq!(latch.count_down(), 2);
        assert_eq!(latch.count_down(), 1);
        assert_eq!(latch.count_down(), 0);
        assert_eq!(latch.count(), 0);
        assert_eq!(latch.completed(), 3);
        // Already released: returns immediately
        latch.wait();
    }

    #[test]
    fn test_extra_count_down_saturates() {
        let latch = CompletionLatch::new(1);
        latch.count_down();
        assert_eq!(latch.count_down(), 0);
        assert_eq!(latch.count(), 0);
        assert_eq!(latch.completed(), 1);
    }

    #[test]
    fn test_wait_timeout_pending() {
        let latch = CompletionLatch::new(2);
        latch.count_down();
        assert!(!latch.wait_timeout(Duration::from_millis(20)));
        assert_eq!(latch.count(), 1);
    }

    #[test]
    fn test_wait_timeout_released() {
        let latch = Arc::new(CompletionLatch::new(1));
        let signaller = Arc::clone(&latch);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            signaller.count_down();
        });
        assert!(latch.wait_timeout(Duration::from_secs(10)));
        handle.join().unwrap();
    }

    /// The waiter must not return before every decrement has landed.
    #[test]
    fn test_concurrent_count_down_stress() {
        for n in [1usize, 10, 1000] {
            let latch = Arc::new(CompletionLatch::new(n));
            let finished = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let latch = Arc::clone(&latch);
                    let finished = Arc::clone(&finished);
                    thread::spawn(move || {
                        finished.fetch_add(1, Ordering::SeqCst);
                        latch.count_down();
                    })
                })
                .collect();

            latch.wait();
            assert_eq!(latch.count(), 0, "n = {}", n);
            assert_eq!(finished.load(Ordering::SeqCst), n, "n = {}", n);

            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(latch.count(), 0);
        }
    }
}
