//! `buildtree tasks` command.

use crate::configure::ConfiguredBuild;

/// Execute the `tasks` command.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn run(build: &ConfiguredBuild) -> Result<(), String> {
    let tasks = build.tasks().describe();
    let width = tasks.iter().map(|(n, _)| n.len()).max().unwrap_or(4).max(4);
    for (name, description) in &tasks {
        println!("{name:<width$}  {description}");
    }
    Ok(())
}
