//! Console output
//!
//! All user-facing text goes through an [`OutputSink`], a line-oriented colored
//! writer. It writes to stdout by default and to an in-memory buffer in tests.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use colored::*;

use crate::results::{round2, TaskResult};
use crate::tasks::Task;

pub struct OutputSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// A sink writing into a shared buffer, for inspecting output
    pub fn buffered() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(Box::new(buffer.clone())), buffer)
    }

    pub fn line(&self, text: impl Display) {
        if let Ok(mut writer) = self.writer.lock() {
            // Console output is best effort; a closed stdout must not abort the build.
            let _ = writeln!(writer, "{}", text);
            let _ = writer.flush();
        }
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn welcome(&self, version: &str) {
        self.line(format!("frigg {}", version).bold());
        self.newline();
    }

    pub fn section(&self, title: &str) {
        self.newline();
        self.line(title.bold().underline());
    }

    pub fn task_started(&self, task: &Task) {
        let marker = if task.is_setup_task() {
            format!(" {}", "[setup]".bright_black())
        } else {
            String::new()
        };
        self.line(format!("{} {}{}", "▶".cyan().bold(), task.command.bold(), marker));
    }

    /// `label (1.23s)`, green on success and red on failure
    pub fn task_status(&self, result: &TaskResult) {
        let label = task_label(result);
        if result.succeeded {
            self.line(format!("{} {}", "✓".green().bold(), label.green()));
        } else {
            self.line(format!("{} {}", "✗".red().bold(), label.red()));
        }
    }

    /// Header followed by the task's full stdout and then stderr
    pub fn failure_details(&self, result: &TaskResult) {
        self.line(task_label(result).red().bold());
        if !result.stdout.is_empty() {
            self.line(result.stdout.trim_end());
        }
        if !result.stderr.is_empty() {
            self.line(result.stderr.trim_end());
        }
        self.newline();
    }

    pub fn total_runtime(&self, seconds: f64) {
        self.newline();
        self.line(format!("Total runtime: {:.2}s", seconds).bold());
    }

    pub fn coverage(&self, percentage: f64) {
        self.line(format!("Coverage {:.2}%", percentage).blue());
    }

    pub fn error(&self, message: impl Display) {
        self.line(message.to_string().red());
    }
}

/// Printed name of a result: `command (N.NNs)` plus a setup marker
pub fn task_label(result: &TaskResult) -> String {
    let mut label = format!("{} ({:.2}s)", result.task, round2(result.duration_seconds()));
    if result.is_setup_task {
        label.push_str(" [setup]");
    }
    if result.timed_out {
        label.push_str(" [timed out]");
    }
    label
}

/// Cloneable in-memory writer backing [`OutputSink::buffered`]
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
