//! Subprocess execution
//!
//! [`ProcessExecutor`] runs one task as a shell command in the project directory and
//! always turns the outcome into a [`TaskResult`], including when the process
//! cannot be spawned or exceeds its timeout.

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::execution::timing::timed;
use crate::results::TaskResult;
use crate::tasks::Task;

/// Runs single tasks as subprocesses
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

enum Invocation {
    Finished {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    TimedOut(Duration),
    Failed(io::Error),
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any task still running after `timeout` and report it as failed
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Execute `task` in `working_directory`.
    ///
    /// With `capture_output` the child's stdout and stderr are collected into the
    /// result; otherwise they are inherited from this process and stream live,
    /// leaving the captured fields empty. This never fails: spawn errors and
    /// timeouts become unsuccessful results.
    pub async fn execute(
        &self,
        task: &Task,
        working_directory: &Path,
        capture_output: bool,
    ) -> TaskResult {
        let (invocation, duration) =
            timed(self.invoke(&task.command, working_directory, capture_output)).await;

        let mut result = TaskResult {
            task: task.command.clone(),
            is_setup_task: task.is_setup_task(),
            succeeded: false,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration,
            timed_out: false,
        };

        match invocation {
            Invocation::Finished {
                status,
                stdout,
                stderr,
            } => {
                result.succeeded = status.success();
                result.exit_code = status.code();
                result.stdout = String::from_utf8_lossy(&stdout).into_owned();
                result.stderr = String::from_utf8_lossy(&stderr).into_owned();
            }
            Invocation::TimedOut(limit) => {
                tracing::warn!(command = %task.command, "task timed out after {:?}", limit);
                result.timed_out = true;
                result.stderr = format!(
                    "Command '{}' timed out after {}s",
                    task.command,
                    limit.as_secs_f64()
                );
            }
            Invocation::Failed(e) => {
                tracing::warn!(command = %task.command, "failed to execute task: {}", e);
                result.stderr = format!("Failed to execute command '{}': {}", task.command, e);
            }
        }

        tracing::debug!(
            command = %result.task,
            succeeded = result.succeeded,
            exit_code = ?result.exit_code,
            "task finished in {:.2}s",
            result.duration_seconds()
        );
        result
    }

    async fn invoke(&self, cmd: &str, working_directory: &Path, capture_output: bool) -> Invocation {
        let mut command = shell_command(cmd);
        command.current_dir(working_directory).kill_on_drop(true);

        // A task that can time out gets its own process group so everything it
        // started can be killed with it. Without a timeout the task stays in the
        // terminal's foreground group and keeps receiving Ctrl-C and terminal input.
        #[cfg(unix)]
        if self.timeout.is_some() {
            command.process_group(0);
        }

        if capture_output {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        } else {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        tracing::debug!(
            command = cmd,
            directory = %working_directory.display(),
            capture_output,
            "spawning task"
        );
        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return Invocation::Failed(e),
        };

        let pid = child.id();
        // Dropping the wait future on timeout also kills the child (kill_on_drop).
        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(output) => output,
                Err(_) => {
                    kill_process_group(pid);
                    return Invocation::TimedOut(limit);
                }
            },
            None => wait.await,
        };

        match output {
            Ok(output) => Invocation::Finished {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            },
            Err(e) => Invocation::Failed(e),
        }
    }
}

/// Kill the process group led by `pid`, taking any processes the shell started with it.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        tracing::warn!("Failed to kill process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

fn shell_command(cmd: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(cmd);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        command
    }
}
