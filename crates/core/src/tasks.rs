//! Task model
//!
//! A task is a single shell command taken from the project configuration. It has
//! no identity beyond its command string and its position in the list, so the
//! same command may appear more than once and every occurrence runs.

use std::fmt;

use crate::configs::FriggConfig;

/// Whether a task belongs to the setup list or the main list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Setup,
    Main,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub command: String,
    pub kind: TaskKind,
}

impl Task {
    pub fn new(command: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            command: command.into(),
            kind,
        }
    }

    pub fn main(command: impl Into<String>) -> Self {
        Self::new(command, TaskKind::Main)
    }

    pub fn setup(command: impl Into<String>) -> Self {
        Self::new(command, TaskKind::Setup)
    }

    pub fn is_setup_task(&self) -> bool {
        self.kind == TaskKind::Setup
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Ordered task lists built from a project configuration
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    pub setup: Vec<Task>,
    pub main: Vec<Task>,
}

impl TaskList {
    pub fn from_config(config: &FriggConfig) -> Self {
        Self {
            setup: config.setup_tasks.iter().map(Task::setup).collect(),
            main: config.tasks.iter().map(Task::main).collect(),
        }
    }

    /// Tasks in the order they would execute
    pub fn execution_order(&self, run_setup: bool) -> Vec<&Task> {
        let setup: &[Task] = if run_setup { &self.setup } else { &[] };
        setup.iter().chain(self.main.iter()).collect()
    }
}
