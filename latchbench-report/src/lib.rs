#![warn(missing_docs)]
//! latchbench Report - Output Formats
//!
//! Turns a [`BatchOutcome`](latchbench_core::BatchOutcome) into output:
//! - Human (one line per run, for terminals)
//! - JSON (one compact object per run, machine-readable)

mod human;
mod json;
mod report;

pub use human::{format_comparison_line, format_human_line};
pub use json::generate_json_line;
pub use report::{BatchReport, ReportMeta, SystemInfo};

pub use latchbench_core::millis;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// Compact JSON, one object per line
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
