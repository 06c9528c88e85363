//! `buildtree run <task>` and `buildtree clean`.

use crate::configure::ConfiguredBuild;
use crate::context::ServiceContext;

/// Run the task registered as `task` and print its result line.
///
/// # Errors
///
/// Returns an error string if the task is unknown or fails.
pub fn run(build: &ConfiguredBuild, ctx: &ServiceContext, task: &str) -> Result<(), String> {
    let outcome = build.run_task(task, ctx).map_err(|e| format!("task {task} failed: {e}"))?;
    let elapsed = outcome.finished_at - outcome.started_at;
    println!("{}: {} ({} ms)", outcome.task, outcome.detail, elapsed.num_milliseconds());
    Ok(())
}
