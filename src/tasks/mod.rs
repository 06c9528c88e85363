//! Named tasks registered during configuration.

mod clean;

pub use clean::CleanTask;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::context::ServiceContext;
use crate::error::{BuildError, Result};

/// Name the clean task is registered under.
pub const CLEAN_TASK: &str = "clean";

/// An action the host can run by name.
pub trait Task: Send + Sync {
    /// One-line description shown by `buildtree tasks`.
    fn description(&self) -> String;

    /// Execute the task, returning a human-readable result line.
    ///
    /// # Errors
    ///
    /// Returns an error if the task's side effect fails.
    fn run(&self, ctx: &ServiceContext) -> Result<String>;
}

/// What a task run did and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    /// Task name.
    pub task: String,
    /// Result line returned by the task.
    pub detail: String,
    /// Clock reading before the task started.
    pub started_at: DateTime<Utc>,
    /// Clock reading after the task returned.
    pub finished_at: DateTime<Utc>,
}

/// Tasks in registration order.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Vec<(String, Box<dyn Task>)>,
}

impl TaskRegistry {
    /// Register `task` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateTask`] if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, task: Box<dyn Task>) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(BuildError::DuplicateTask(name));
        }
        self.tasks.push((name, task));
        Ok(())
    }

    /// Look up a task by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Task> {
        self.tasks.iter().find(|(n, _)| n == name).map(|(_, t)| t.as_ref())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|(n, _)| n.as_str())
    }

    /// Registered `(name, description)` pairs.
    #[must_use]
    pub fn describe(&self) -> Vec<(String, String)> {
        self.tasks.iter().map(|(n, t)| (n.clone(), t.description())).collect()
    }

    /// Run the task registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownTask`] for an unregistered name, or the
    /// task's own error.
    pub fn run(&self, name: &str, ctx: &ServiceContext) -> Result<TaskOutcome> {
        let task = self.get(name).ok_or_else(|| BuildError::UnknownTask {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })?;

        let started_at = ctx.clock.now();
        let detail = task.run(ctx)?;
        let finished_at = ctx.clock.now();
        info!(task = name, %detail, "task finished");

        Ok(TaskOutcome { task: name.to_string(), detail, started_at, finished_at })
    }
}
