//! The `clean` task: delete the shared output root.

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use super::Task;
use crate::context::ServiceContext;
use crate::error::{BuildError, Result};
use crate::layout::normalize;

/// Deletes one directory fixed at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTask {
    target: PathBuf,
    root_location: PathBuf,
}

impl CleanTask {
    /// Bind the task to `target`. `root_location` is the root project's
    /// directory, which the target must never contain. Both paths are
    /// normalized lexically before they are compared.
    pub fn new(target: impl AsRef<Path>, root_location: impl AsRef<Path>) -> Self {
        Self { target: normalize(target.as_ref()), root_location: normalize(root_location.as_ref()) }
    }

    /// Directory this task deletes.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    fn check_target(&self) -> Result<()> {
        let has_name = self.target.components().any(|c| matches!(c, Component::Normal(_)));
        if !has_name {
            return Err(self.unsafe_target("target is a filesystem root or empty"));
        }
        if self.root_location.starts_with(&self.target) {
            return Err(self.unsafe_target(&format!(
                "target contains the root project at {}",
                self.root_location.display()
            )));
        }
        Ok(())
    }

    fn unsafe_target(&self, reason: &str) -> BuildError {
        BuildError::UnsafeCleanTarget { target: self.target.clone(), reason: reason.to_string() }
    }
}

impl Task for CleanTask {
    fn description(&self) -> String {
        format!("Deletes {}", self.target.display())
    }

    fn run(&self, ctx: &ServiceContext) -> Result<String> {
        self.check_target()?;

        let removed = ctx.fs.remove_dir_all(&self.target).map_err(|e| {
            warn!(dir = %self.target.display(), error = %e, "clean failed");
            BuildError::Filesystem { path: self.target.clone(), message: e.to_string() }
        })?;

        if removed {
            info!(dir = %self.target.display(), "output root removed");
            Ok(format!("removed {}", self.target.display()))
        } else {
            Ok(format!("nothing to clean at {}", self.target.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mem_context;

    #[test]
    fn deletes_target_and_everything_under_it() {
        let (ctx, fs) = mem_context();
        fs.add_file("/repo/project/build/app/outputs/app.apk", "apk");
        fs.add_file("/repo/project/android/app/src/Main.kt", "src");

        let task = CleanTask::new("/repo/project/build", "/repo/project/android");
        let detail = task.run(&ctx).unwrap();

        assert_eq!(detail, "removed /repo/project/build");
        assert!(!fs.exists_path("/repo/project/build"));
        assert!(fs.exists_path("/repo/project/android/app/src/Main.kt"));
    }

    #[test]
    fn absent_target_is_a_no_op() {
        let (ctx, _fs) = mem_context();
        let task = CleanTask::new("/repo/project/build", "/repo/project/android");
        assert_eq!(task.run(&ctx).unwrap(), "nothing to clean at /repo/project/build");
        assert_eq!(task.run(&ctx).unwrap(), "nothing to clean at /repo/project/build");
    }

    #[test]
    fn refuses_target_containing_root_project() {
        let (ctx, fs) = mem_context();
        fs.add_file("/repo/project/android/build.gradle.kts", "");

        let task = CleanTask::new("/repo/project", "/repo/project/android");
        let err = task.run(&ctx).unwrap_err();

        assert!(matches!(err, BuildError::UnsafeCleanTarget { .. }));
        assert!(fs.exists_path("/repo/project/android/build.gradle.kts"));
    }

    #[test]
    fn refuses_target_containing_unnormalized_root() {
        let (ctx, fs) = mem_context();
        fs.add_file("/a/c/src/Main.kt", "");

        let task = CleanTask::new("/a", "/x/../a/c");
        let err = task.run(&ctx).unwrap_err();

        assert!(matches!(err, BuildError::UnsafeCleanTarget { .. }));
        assert!(fs.exists_path("/a/c/src/Main.kt"));
    }

    #[test]
    fn refuses_filesystem_root() {
        let (ctx, _fs) = mem_context();
        let err = CleanTask::new("/", "/elsewhere").run(&ctx).unwrap_err();
        assert!(err.to_string().contains("filesystem root"));
    }

    #[test]
    fn filesystem_errors_surface_verbatim() {
        let (ctx, fs) = mem_context();
        fs.add_file("/repo/project/build/locked", "");
        fs.fail_removal("Permission denied (os error 13)");

        let err = CleanTask::new("/repo/project/build", "/repo/project/android").run(&ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "filesystem error on /repo/project/build: Permission denied (os error 13)"
        );
    }
}
