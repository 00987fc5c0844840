//! Run Configuration
//!
//! latchbench has no configuration file. Settings are layered as
//! built-in defaults → environment variables → command-line flags; clap
//! resolves the last two (`LATCHBENCH_*` variables back each global flag).

use crate::Cli;
use latchbench_core::{BarrierRunner, DEFAULT_DELAY_MS, default_pool_size};
use latchbench_report::OutputFormat;
use std::time::Duration;

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Per-task delay
    pub delay: Duration,
    /// Worker count for the pooled strategy
    pub pool_size: usize,
    /// tokio worker threads for the lightweight strategy (None = tokio default)
    pub worker_threads: Option<usize>,
    /// Output format
    pub format: OutputFormat,
    /// Draw a progress bar on stderr while waiting
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            pool_size: default_pool_size(),
            worker_threads: None,
            format: OutputFormat::Human,
            progress: false,
        }
    }
}

impl RunConfig {
    /// Layer CLI flags (and the environment variables behind them) over defaults
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let format = cli
            .format
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            delay: Self::parse_duration(&cli.delay)?,
            pool_size: cli.pool_size.unwrap_or(defaults.pool_size),
            worker_threads: cli.worker_threads.or(defaults.worker_threads),
            format,
            progress: cli.progress,
        })
    }

    /// Runner carrying this configuration's delay and thread settings
    pub fn runner(&self) -> BarrierRunner {
        let runner = BarrierRunner::new(self.delay);
        match self.worker_threads {
            Some(threads) => runner.with_worker_threads(threads),
            None => runner,
        }
    }

    /// Parse duration string (e.g., "1s", "500ms", "2m"); a bare number is seconds
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}
