//! Human Output
//!
//! One line per batch:
//!
//! ```text
//! lightweight: 10000 tasks x 1000 ms completed in 1043 ms (floor 1000 ms)
//! pooled(15): 10000 tasks x 1000 ms completed in 668214 ms (floor 667000 ms)
//! ```

use crate::report::BatchReport;

/// Format a report as one terminal line (no trailing newline)
pub fn format_human_line(report: &BatchReport) -> String {
    let label = match report.pool_size {
        Some(size) => format!("{}({})", report.strategy, size),
        None => report.strategy.clone(),
    };
    format!(
        "{}: {} tasks x {} ms completed in {} ms (floor {} ms)",
        label, report.tasks, report.delay_ms, report.elapsed_ms, report.floor_ms
    )
}

/// Summarize a lightweight vs pooled pair as one line
pub fn format_comparison_line(lightweight: &BatchReport, pooled: &BatchReport) -> String {
    let ratio = pooled.elapsed_ms as f64 / lightweight.elapsed_ms.max(1) as f64;
    format!(
        "pooled/lightweight: {:.2}x ({} ms vs {} ms)",
        ratio, pooled.elapsed_ms, lightweight.elapsed_ms
    )
}
