//! frigg Core Library
//!
//! This is the core library for the frigg local build runner. It reads the tasks
//! listed in a project's `.frigg.yml`, runs them one after another as shell
//! commands, and reports a build verdict suitable for CI gating.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`project`] - High-level interface tying configuration, execution and reporting together
//! - [`execution`] - Subprocess execution and task sequencing with fail-fast
//! - [`report`] - Result aggregation and build verdict
//! - [`coverage`] - Coverage report parsing
//! - [`configs`] - Configuration discovery and parsing
//! - [`output`] - Colored console output
//! - [`tasks`] - Task model
//! - [`results`] - Result types for task execution
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`ProjectRunner`]:
//!
//! ```rust,no_run
//! use frigg_core::output::OutputSink;
//! use frigg_core::project::{ProjectRunner, RunnerOptions};
//!
//! # async fn example() -> frigg_core::types::FriggResult<()> {
//! let runner = ProjectRunner::new(
//!     RunnerOptions {
//!         fail_fast: true,
//!         ..Default::default()
//!     },
//!     OutputSink::stdout(),
//! )?;
//!
//! let report = runner.run().await?;
//! println!("exit code {}", report.exit_code());
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod coverage;
pub mod execution;
pub mod output;
pub mod project;
pub mod report;
pub mod results;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use project::{ProjectRunner, RunnerOptions};
pub use types::{FriggError, FriggResult};
