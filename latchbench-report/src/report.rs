//! Report Data Structures

use crate::millis;
use chrono::{DateTime, Utc};
use latchbench_core::BatchOutcome;
use serde::{Deserialize, Serialize};

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// latchbench version
    pub version: String,
    /// Report generation time
    pub timestamp: DateTime<Utc>,
    /// Host information
    pub system: SystemInfo,
}

/// Host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// Available parallelism
    pub cpu_cores: u32,
}

/// One batch run, flattened for output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Metadata
    pub meta: ReportMeta,
    /// "lightweight" or "pooled"
    pub strategy: String,
    /// Worker count for the pooled strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
    /// Tasks dispatched
    pub tasks: usize,
    /// Per-task delay in milliseconds
    pub delay_ms: u64,
    /// Measured wall-clock time in milliseconds
    pub elapsed_ms: u64,
    /// Lower bound for this strategy in milliseconds
    pub floor_ms: u64,
}

impl BatchReport {
    /// Build a report from an outcome
    pub fn new(outcome: &BatchOutcome, meta: ReportMeta) -> Self {
        Self {
            meta,
            strategy: outcome.strategy.name().to_string(),
            pool_size: outcome.strategy.pool_size(),
            tasks: outcome.tasks,
            delay_ms: millis(outcome.delay),
            elapsed_ms: millis(outcome.elapsed),
            floor_ms: millis(outcome.floor()),
        }
    }
}
