#![warn(missing_docs)]
//! latchbench CLI Library
//!
//! Command-line front end: parses the mode and task count, layers the run
//! configuration, initializes logging, runs the batch, and prints one report
//! line per batch on stdout.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     latchbench_cli::run().unwrap();
//! }
//! ```

mod config;
mod metadata;

pub use config::RunConfig;
pub use metadata::build_report_meta;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use latchbench_core::{BatchOutcome, Strategy, checked_task_count};
use latchbench_report::{
    BatchReport, OutputFormat, format_comparison_line, format_human_line, generate_json_line,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How often the progress bar polls the latch
const PROGRESS_TICK: Duration = Duration::from_millis(100);

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// latchbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "latchbench")]
#[command(
    author,
    version,
    about = "latchbench - time N sleeping tasks on lightweight tasks vs pooled threads"
)]
pub struct Cli {
    /// Benchmark mode
    #[command(subcommand)]
    pub command: Commands,

    /// Per-task delay (e.g. "1s", "250ms")
    #[arg(long, global = true, env = "LATCHBENCH_DELAY", default_value = "1s")]
    pub delay: String,

    /// Worker threads for the pooled strategy [default: available parallelism - 1]
    #[arg(long, global = true, env = "LATCHBENCH_POOL_SIZE")]
    pub pool_size: Option<usize>,

    /// tokio worker threads for the lightweight strategy [default: one per core]
    #[arg(long, global = true, env = "LATCHBENCH_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Output format: human, json
    #[arg(long, global = true, env = "LATCHBENCH_FORMAT", default_value = "human")]
    pub format: String,

    /// Show a progress bar on stderr while waiting for the batch
    #[arg(long, global = true)]
    pub progress: bool,

    /// Verbose output (per-task start/stop logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every task as its own tokio task
    Lightweight {
        /// Number of tasks
        #[arg(allow_negative_numbers = true)]
        tasks: i64,
    },
    /// Submit every task to a fixed-size thread pool
    Pooled {
        /// Number of tasks
        #[arg(allow_negative_numbers = true)]
        tasks: i64,
    },
    /// Run the lightweight batch, then the pooled batch, and compare them
    Compare {
        /// Number of tasks
        #[arg(allow_negative_numbers = true)]
        tasks: i64,
    },
}

/// Run the latchbench CLI with process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error for invalid arguments or an
/// executor that could not be built.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the latchbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = RunConfig::from_cli(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    for line in execute(&cli.command, &config)? {
        println!("{}", line);
    }
    Ok(())
}

/// Run the selected command and return its output lines.
pub fn execute(command: &Commands, config: &RunConfig) -> anyhow::Result<Vec<String>> {
    let pooled = Strategy::Pooled {
        size: config.pool_size,
    };

    match *command {
        Commands::Lightweight { tasks } => {
            let report = run_batch(config, checked_task_count(tasks)?, Strategy::Lightweight)?;
            Ok(vec![render(&report, config.format)?])
        }
        Commands::Pooled { tasks } => {
            let report = run_batch(config, checked_task_count(tasks)?, pooled)?;
            Ok(vec![render(&report, config.format)?])
        }
        Commands::Compare { tasks } => {
            let tasks = checked_task_count(tasks)?;
            let light = run_batch(config, tasks, Strategy::Lightweight)?;
            let pool = run_batch(config, tasks, pooled)?;

            let mut lines = vec![render(&light, config.format)?, render(&pool, config.format)?];
            if config.format == OutputFormat::Human {
                lines.push(format_comparison_line(&light, &pool));
            }
            Ok(lines)
        }
    }
}

fn run_batch(config: &RunConfig, tasks: usize, strategy: Strategy) -> anyhow::Result<BatchReport> {
    let batch = config.runner().spawn(tasks, strategy)?;

    let outcome: BatchOutcome = if config.progress {
        let pb = ProgressBar::new(tasks as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(strategy.to_string());
        let outcome = batch.wait_with_progress(PROGRESS_TICK, |done| pb.set_position(done as u64));
        pb.finish_and_clear();
        outcome
    } else {
        batch.wait()
    };

    Ok(BatchReport::new(&outcome, build_report_meta()))
}

fn render(report: &BatchReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Human => format_human_line(report),
        OutputFormat::Json => generate_json_line(report)?,
    })
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "latchbench=debug"
    } else {
        "latchbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Already installed when called more than once in a process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
