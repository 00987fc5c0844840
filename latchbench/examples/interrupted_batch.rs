//! Interrupted Batch: one failing task does not stall the barrier
//!
//! Dispatches 100 one-second tasks on each strategy, interrupts task 42 right
//! away, and prints how long the batch took to release.
//!
//! Run with: cargo run --example interrupted_batch -p latchbench --release

use latchbench::{BarrierRunner, Strategy, default_pool_size};
use std::time::Duration;

const TASKS: usize = 100;

fn main() -> anyhow::Result<()> {
    let runner = BarrierRunner::new(Duration::from_secs(1));

    for strategy in [
        Strategy::Lightweight,
        Strategy::Pooled {
            size: default_pool_size(),
        },
    ] {
        let batch = runner.spawn(TASKS, strategy)?;
        batch.interrupt(42);
        let outcome = batch.wait();
        println!(
            "[{:>10}] {} tasks, 1 interrupted: released in {} ms (floor {} ms)",
            strategy.to_string(),
            outcome.tasks,
            outcome.elapsed.as_millis(),
            outcome.floor().as_millis()
        );
    }

    Ok(())
}
