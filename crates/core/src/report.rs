//! Result aggregation
//!
//! [`ResultAggregator`] turns the per-task results of a run into the printed
//! failure and result sections, the total runtime and the build verdict. It only
//! reads its inputs, so aggregating the same results twice gives the same report.

use std::time::Duration;

use crate::output::OutputSink;
use crate::results::{BuildReport, BuildVerdict, RunOutcome, TaskResult};

pub struct ResultAggregator<'a> {
    sink: &'a OutputSink,
    verbose: bool,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(sink: &'a OutputSink, verbose: bool) -> Self {
        Self { sink, verbose }
    }

    /// Print the failure and result sections and compute the build verdict.
    pub fn handle_results(
        &self,
        main_results: &[TaskResult],
        setup_results: &[TaskResult],
    ) -> BuildReport {
        let failed_main = failures(main_results);
        let failed_setup = failures(setup_results);

        if !self.verbose && (!failed_setup.is_empty() || !failed_main.is_empty()) {
            self.sink.section("Failures");
            for result in failed_setup.iter().chain(failed_main.iter()) {
                self.sink.failure_details(result);
            }
        }

        self.sink.section("Result");
        for result in setup_results.iter().chain(main_results.iter()) {
            self.sink.task_status(result);
        }

        let report = summarize(main_results, setup_results, false);
        self.sink.total_runtime(report.total_runtime_seconds());

        tracing::info!(
            failed_setup = report.verdict.failed_setup,
            failed_main = report.verdict.failed_main,
            "build {}",
            if report.success() { "succeeded" } else { "failed" }
        );
        report
    }
}

/// Failed results in their original order
pub fn failures(results: &[TaskResult]) -> Vec<&TaskResult> {
    results.iter().filter(|r| !r.succeeded).collect()
}

/// Compute the report for a set of results without printing anything.
pub fn summarize(
    main_results: &[TaskResult],
    setup_results: &[TaskResult],
    aborted: bool,
) -> BuildReport {
    let verdict = BuildVerdict {
        failed_setup: failures(setup_results).len(),
        failed_main: failures(main_results).len(),
        aborted,
    };
    let total_runtime: Duration = main_results.iter().map(|r| r.duration).sum();

    BuildReport {
        verdict,
        total_runtime,
        coverage: None,
    }
}

impl From<&RunOutcome> for BuildReport {
    fn from(outcome: &RunOutcome) -> Self {
        summarize(
            outcome.main_results(),
            outcome.setup_results(),
            outcome.is_aborted(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(task: &str, succeeded: bool, is_setup_task: bool, millis: u64) -> TaskResult {
        TaskResult {
            task: task.to_string(),
            is_setup_task,
            succeeded,
            exit_code: Some(if succeeded { 0 } else { 1 }),
            stdout: format!("{} stdout", task),
            stderr: format!("{} stderr", task),
            duration: Duration::from_millis(millis),
            timed_out: false,
        }
    }

    #[test]
    fn test_failures_preserve_order() {
        let results = vec![
            result("a", false, false, 1),
            result("b", true, false, 1),
            result("c", false, false, 1),
        ];
        let failed: Vec<_> = failures(&results).iter().map(|r| r.task.as_str()).collect();
        assert_eq!(failed, vec!["a", "c"]);
    }

    #[test]
    fn test_handle_results_exit_codes() {
        let (sink, _) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, false);

        let tox = result("tox", true, false, 1000);
        let flake8 = result("flake8", false, false, 2000);

        let report = aggregator.handle_results(&[tox.clone(), flake8.clone()], &[]);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.verdict.failed_main, 1);

        let report = aggregator.handle_results(&[tox], &[]);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_total_runtime_excludes_setup() {
        let (sink, buffer) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, false);

        let main = vec![
            result("make", true, false, 1234),
            result("make test", true, false, 1000),
        ];
        let setup = vec![result("make deps", true, true, 5000)];

        let report = aggregator.handle_results(&main, &setup);
        assert_eq!(report.total_runtime, Duration::from_millis(2234));
        assert_eq!(report.total_runtime_seconds(), 2.23);
        assert!(buffer.contents().contains("Total runtime: 2.23s"));
    }

    #[test]
    fn test_setup_failure_fails_the_build() {
        let (sink, _) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, false);

        let report = aggregator.handle_results(
            &[result("make test", true, false, 10)],
            &[result("make deps", false, true, 10)],
        );
        assert_eq!(report.verdict.failed_setup, 1);
        assert_eq!(report.verdict.failed_main, 0);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_failures_section_lists_setup_first() {
        let (sink, buffer) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, false);

        aggregator.handle_results(
            &[result("flake8", false, false, 10)],
            &[result("make deps", false, true, 10)],
        );

        let output = buffer.contents();
        let failures_at = output.find("Failures").unwrap();
        let result_at = output.find("Result").unwrap();
        let setup_at = output.find("make deps stdout").unwrap();
        let main_at = output.find("flake8 stdout").unwrap();
        assert!(failures_at < setup_at);
        assert!(setup_at < main_at);
        assert!(main_at < result_at);
        assert!(output.contains("make deps (0.01s) [setup]"));
    }

    #[test]
    fn test_verbose_skips_failures_section() {
        let (sink, buffer) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, true);

        let report = aggregator.handle_results(&[result("flake8", false, false, 10)], &[]);

        let output = buffer.contents();
        assert!(!output.contains("Failures"));
        assert!(!output.contains("flake8 stdout"));
        assert!(output.contains("Result"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let (sink, _) = OutputSink::buffered();
        let aggregator = ResultAggregator::new(&sink, false);
        let main = vec![
            result("echo hello", true, false, 10),
            result("false", false, false, 20),
        ];
        let setup = vec![result("make deps", true, true, 30)];

        let first = aggregator.handle_results(&main, &setup);
        let second = aggregator.handle_results(&main, &setup);
        assert_eq!(first, second);
        assert_eq!(failures(&main), failures(&main));
    }

    #[test]
    fn test_report_from_aborted_outcome() {
        let outcome = RunOutcome::Aborted {
            main: vec![result("false", false, false, 10)],
            setup: Vec::new(),
        };
        let report = BuildReport::from(&outcome);
        assert!(report.verdict.aborted);
        assert_eq!(report.exit_code(), 1);
    }
}
