//! High-level project runner
//!
//! This module provides the [`ProjectRunner`], the primary interface for running a
//! project's tasks. It encapsulates:
//! - Resolving and checking the project directory
//! - Loading the `.frigg.yml` configuration
//! - Running setup and main tasks through the [`TaskRunner`]
//! - Aggregating results and reporting coverage
//!
//! ## Example
//!
//! ```rust,no_run
//! use frigg_core::output::OutputSink;
//! use frigg_core::project::{ProjectRunner, RunnerOptions};
//!
//! # async fn example() -> frigg_core::types::FriggResult<()> {
//! let runner = ProjectRunner::new(RunnerOptions::default(), OutputSink::stdout())?;
//! let report = runner.run().await?;
//! std::process::exit(report.exit_code());
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::configs::{load_project_config, FriggConfig};
use crate::coverage::CoverageReporter;
use crate::execution::{ProcessExecutor, TaskRunner, TaskRunnerConfig};
use crate::output::OutputSink;
use crate::report::ResultAggregator;
use crate::results::{BuildReport, RunOutcome};
use crate::tasks::{Task, TaskList};
use crate::types::{FriggError, FriggResult};

/// Options for a single invocation, usually taken from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerOptions {
    pub fail_fast: bool,
    pub verbose: bool,
    pub setup: bool,
    /// Project directory; the current directory when `None`
    pub path: Option<PathBuf>,
    /// Overrides `task_timeout` from the configuration
    pub timeout: Option<Duration>,
}

pub struct ProjectRunner {
    pub directory: PathBuf,
    pub config: FriggConfig,
    pub options: RunnerOptions,
    tasks: TaskList,
    executor: ProcessExecutor,
    sink: OutputSink,
}

impl ProjectRunner {
    /// Resolve the project directory and load its configuration.
    ///
    /// Fails before any task runs when the directory does not exist or holds no
    /// usable configuration.
    pub fn new(options: RunnerOptions, sink: OutputSink) -> FriggResult<Self> {
        let directory = match &options.path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };

        if !directory.is_dir() {
            return Err(FriggError::Path(format!(
                "Directory '{}' does not exist",
                directory.display()
            )));
        }

        let config = load_project_config(&directory)?;
        let tasks = TaskList::from_config(&config);
        let timeout = options
            .timeout
            .or(config.task_timeout.map(Duration::from_secs));

        Ok(Self {
            directory,
            config,
            options,
            tasks,
            executor: ProcessExecutor::with_timeout(timeout),
            sink,
        })
    }

    /// Tasks in the order a run would execute them
    pub fn plan(&self) -> Vec<&Task> {
        self.tasks.execution_order(self.options.setup)
    }

    /// Run all tasks and produce the build report.
    ///
    /// When fail-fast stops the run, results are not aggregated and coverage is
    /// not reported; the returned report is failing.
    pub async fn run(&self) -> FriggResult<BuildReport> {
        self.sink.welcome(env!("CARGO_PKG_VERSION"));

        let runner = TaskRunner::new(
            &self.executor,
            &self.directory,
            &self.sink,
            TaskRunnerConfig {
                run_setup: self.options.setup,
                fail_fast: self.options.fail_fast,
                verbose: self.options.verbose,
                verbose_overrides: self.config.verbose_tasks.clone(),
            },
        );

        let outcome = runner.run(&self.tasks.main, &self.tasks.setup).await;

        let (main, setup) = match &outcome {
            RunOutcome::Aborted { .. } => return Ok(BuildReport::from(&outcome)),
            RunOutcome::Completed { main, setup } => (main, setup),
        };

        let mut report =
            ResultAggregator::new(&self.sink, self.options.verbose).handle_results(main, setup);

        report.coverage = CoverageReporter::new(&self.sink)
            .report(self.config.coverage.as_ref(), &self.directory)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SharedBuffer;
    use std::path::Path;

    fn write_config(dir: &Path, yaml: &str) {
        std::fs::write(dir.join(".frigg.yml"), yaml).unwrap();
    }

    fn project(dir: &Path, options: RunnerOptions) -> (ProjectRunner, SharedBuffer) {
        let (sink, buffer) = OutputSink::buffered();
        let options = RunnerOptions {
            path: Some(dir.to_path_buf()),
            ..options
        };
        (ProjectRunner::new(options, sink).unwrap(), buffer)
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (sink, _) = OutputSink::buffered();
        let options = RunnerOptions {
            path: Some(temp_dir.path().join("nope")),
            ..Default::default()
        };
        let err = ProjectRunner::new(options, sink).err().unwrap();
        assert!(matches!(err, FriggError::Path(_)));
    }

    #[test]
    fn test_empty_directory_has_no_tasks() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (sink, buffer) = OutputSink::buffered();
        let options = RunnerOptions {
            path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = ProjectRunner::new(options, sink).err().unwrap();
        assert!(err.to_string().contains("No tasks found"));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_plan_lists_setup_tasks_when_enabled() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(
            temp_dir.path(),
            "setup_tasks: [make deps]\ntasks: [make, make test]\n",
        );

        let (runner, _) = project(
            temp_dir.path(),
            RunnerOptions {
                setup: true,
                ..Default::default()
            },
        );
        let plan: Vec<_> = runner.plan().iter().map(|t| t.command.clone()).collect();
        assert_eq!(plan, vec!["make deps", "make", "make test"]);

        let (runner, _) = project(temp_dir.path(), RunnerOptions::default());
        assert_eq!(runner.plan().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_task_fails_build() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(temp_dir.path(), "tasks:\n  - echo hello\n  - 'false'\n");

        let (runner, buffer) = project(temp_dir.path(), RunnerOptions::default());
        let report = runner.run().await.unwrap();

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.verdict.failed_main, 1);
        let output = buffer.contents();
        assert!(output.contains("Failures"));
        assert!(output.contains("Result"));
        assert!(output.contains("Total runtime"));
    }

    #[tokio::test]
    async fn test_passing_build() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(temp_dir.path(), "tasks: [echo hello, 'true']\n");

        let (runner, buffer) = project(temp_dir.path(), RunnerOptions::default());
        let report = runner.run().await.unwrap();

        assert!(report.success());
        assert_eq!(report.exit_code(), 0);
        assert!(!buffer.contents().contains("Failures"));
    }

    #[tokio::test]
    async fn test_fail_fast_skips_aggregation() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(temp_dir.path(), "tasks: ['false', touch ran]\n");

        let (runner, buffer) = project(
            temp_dir.path(),
            RunnerOptions {
                fail_fast: true,
                ..Default::default()
            },
        );
        let report = runner.run().await.unwrap();

        assert_eq!(report.exit_code(), 1);
        assert!(report.verdict.aborted);
        assert!(!temp_dir.path().join("ran").exists());
        assert!(!buffer.contents().contains("Total runtime"));
    }

    #[tokio::test]
    async fn test_missing_coverage_report_does_not_affect_verdict() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(
            temp_dir.path(),
            "tasks: ['true']\ncoverage:\n  path: missing.xml\n  parser: x\n",
        );

        let (runner, buffer) = project(temp_dir.path(), RunnerOptions::default());
        let report = runner.run().await.unwrap();

        assert!(report.success());
        assert!(report.coverage.is_none());
        assert!(!buffer.contents().contains("Coverage"));
    }

    #[tokio::test]
    async fn test_coverage_reported_after_tasks() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(
            temp_dir.path(),
            r#"tasks:
  - echo '<coverage line-rate="0.5"/>' > coverage.xml
coverage:
  path: coverage.xml
  parser: cobertura
"#,
        );

        let (runner, buffer) = project(temp_dir.path(), RunnerOptions::default());
        let report = runner.run().await.unwrap();

        assert_eq!(report.coverage, Some(50.0));
        assert!(buffer.contents().contains("Coverage 50.00%"));
    }

    #[tokio::test]
    async fn test_configured_timeout_fails_task() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_config(temp_dir.path(), "tasks: [sleep 5]\ntask_timeout: 1\n");

        let (runner, _) = project(
            temp_dir.path(),
            RunnerOptions {
                timeout: Some(Duration::from_millis(200)),
                ..Default::default()
            },
        );
        let report = runner.run().await.unwrap();

        assert_eq!(report.exit_code(), 1);
        assert!(report.total_runtime < Duration::from_secs(1));
    }
}
