//! High-level task runner
//!
//! This module sequences the setup and main task lists through the
//! [`ProcessExecutor`], decides per task whether output streams live, and applies
//! the fail-fast policy.

use std::collections::HashSet;
use std::path::Path;

use crate::execution::command::ProcessExecutor;
use crate::output::OutputSink;
use crate::results::{RunOutcome, TaskResult};
use crate::tasks::Task;

/// Configuration for the task runner
#[derive(Debug, Clone, Default)]
pub struct TaskRunnerConfig {
    pub run_setup: bool,
    pub fail_fast: bool,
    pub verbose: bool,
    /// Commands that always stream their output live
    pub verbose_overrides: HashSet<String>,
}

/// Runs task lists one task at a time, in order
pub struct TaskRunner<'a> {
    executor: &'a ProcessExecutor,
    working_directory: &'a Path,
    sink: &'a OutputSink,
    config: TaskRunnerConfig,
}

impl<'a> TaskRunner<'a> {
    pub fn new(
        executor: &'a ProcessExecutor,
        working_directory: &'a Path,
        sink: &'a OutputSink,
        config: TaskRunnerConfig,
    ) -> Self {
        Self {
            executor,
            working_directory,
            sink,
            config,
        }
    }

    /// Run the setup tasks (when enabled) and then the main tasks.
    ///
    /// Setup and main results are collected separately. With fail-fast the first
    /// failure in either list stops the run and yields [`RunOutcome::Aborted`].
    pub async fn run(&self, tasks: &[Task], setup_tasks: &[Task]) -> RunOutcome {
        let mut setup = Vec::new();
        let mut main = Vec::new();

        if self.config.run_setup && !self.run_list(setup_tasks, &mut setup).await {
            return RunOutcome::Aborted { main, setup };
        }

        if !self.run_list(tasks, &mut main).await {
            return RunOutcome::Aborted { main, setup };
        }

        RunOutcome::Completed { main, setup }
    }

    /// Whether `task` streams its output to the terminal instead of being captured
    pub fn streams_live(&self, task: &Task) -> bool {
        self.config.verbose || self.config.verbose_overrides.contains(&task.command)
    }

    /// Returns false when fail-fast cut the list short.
    async fn run_list(&self, tasks: &[Task], results: &mut Vec<TaskResult>) -> bool {
        for task in tasks {
            let result = self.run_task(task).await;
            let failed = !result.succeeded;
            results.push(result);

            if failed && self.config.fail_fast {
                if let Some(result) = results.last() {
                    self.report_fail_fast(task, result);
                }
                return false;
            }
        }
        true
    }

    async fn run_task(&self, task: &Task) -> TaskResult {
        self.sink.task_started(task);
        let capture_output = !self.streams_live(task);
        self.executor
            .execute(task, self.working_directory, capture_output)
            .await
    }

    fn report_fail_fast(&self, task: &Task, result: &TaskResult) {
        tracing::info!(command = %result.task, "fail-fast triggered");
        // Output that streamed live was never captured and is already on screen.
        if !self.streams_live(task) {
            self.sink.section("Failures");
            self.sink.failure_details(result);
        }
        self.sink
            .error(format!("Stopping after '{}' failed (fail-fast)", result.task));
    }
}
