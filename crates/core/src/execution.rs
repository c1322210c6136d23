//! Task execution module
//!
//! This module handles the actual execution of tasks: spawning each command as a
//! subprocess, timing it, and sequencing the task lists under the fail-fast policy.

pub mod command;
pub mod runner;
pub mod timing;

pub use command::ProcessExecutor;
pub use runner::{TaskRunner, TaskRunnerConfig};
pub use timing::timed;
