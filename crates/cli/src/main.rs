use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use frigg_core::output::OutputSink;
use frigg_core::project::{ProjectRunner, RunnerOptions};
use tracing_subscriber::EnvFilter;

mod commands;

/// frigg - Run the tasks in .frigg.yml locally
#[derive(Parser, Debug)]
#[command(name = "frigg")]
#[command(about = "Run the tasks in .frigg.yml locally")]
#[command(version)]
struct Cli {
    /// Stop at the first task that exits with a non-zero status
    #[arg(short = 'f', long = "failfast")]
    fail_fast: bool,

    /// Stream the output of every task live
    #[arg(short, long)]
    verbose: bool,

    /// Path to the project directory (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Run the configured setup tasks before the main tasks
    #[arg(short, long)]
    setup: bool,

    /// Kill and fail any task running longer than this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Show the tasks in execution order without running them
    #[arg(long)]
    plan: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            fail_fast: self.fail_fast,
            verbose: self.verbose,
            setup: self.setup,
            path: self.path.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // The only place the process exits; everything below returns an exit code.
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let runner = ProjectRunner::new(cli.runner_options(), OutputSink::stdout())
        .map_err(|e| anyhow::anyhow!("Failed to load project: {}", e))?;

    if cli.plan {
        commands::plan::execute(&runner)
    } else {
        commands::run::execute(&runner).await
    }
}

/// Diagnostics go to stderr, filtered by `FRIGG_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FRIGG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
