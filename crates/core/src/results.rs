//! Result types for task execution
//!
//! This module contains the per-task [`TaskResult`], the [`RunOutcome`] returned by
//! the task runner and the build-level [`BuildReport`] produced by aggregation.

use std::time::Duration;

/// Outcome of a single task invocation. Created once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub task: String,
    pub is_setup_task: bool,
    pub succeeded: bool,
    /// `None` when the process was killed, timed out or never started
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

impl TaskResult {
    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// What the task runner hands back to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every scheduled task ran.
    Completed {
        main: Vec<TaskResult>,
        setup: Vec<TaskResult>,
    },
    /// Fail-fast stopped the run. The last result in `main` (or in `setup`, when
    /// `main` is empty) is the failure that triggered it.
    Aborted {
        main: Vec<TaskResult>,
        setup: Vec<TaskResult>,
    },
}

impl RunOutcome {
    pub fn main_results(&self) -> &[TaskResult] {
        match self {
            RunOutcome::Completed { main, .. } | RunOutcome::Aborted { main, .. } => main,
        }
    }

    pub fn setup_results(&self) -> &[TaskResult] {
        match self {
            RunOutcome::Completed { setup, .. } | RunOutcome::Aborted { setup, .. } => setup,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }
}

/// Aggregate judgment over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildVerdict {
    pub failed_setup: usize,
    pub failed_main: usize,
    pub aborted: bool,
}

impl BuildVerdict {
    pub fn success(&self) -> bool {
        !self.aborted && self.failed_setup == 0 && self.failed_main == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Result of a complete build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub verdict: BuildVerdict,
    /// Sum of main task durations; setup time is excluded.
    pub total_runtime: Duration,
    pub coverage: Option<f64>,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.verdict.success()
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    pub fn total_runtime_seconds(&self) -> f64 {
        round2(self.total_runtime.as_secs_f64())
    }
}

/// Round to two decimal places, the precision used for every printed duration
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
