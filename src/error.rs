//! Error type for the configuration phase and task execution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring a build tree or running its tasks.
///
/// Any error returned from [`crate::configure::configure`] means no project
/// in the tree was rebound.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The manifest file exists but could not be read.
    #[error("failed to read manifest {path}: {message}")]
    ManifestRead {
        /// Manifest location.
        path: PathBuf,
        /// Underlying filesystem error.
        message: String,
    },

    /// The manifest is not valid YAML for the expected schema.
    #[error("failed to parse manifest {path}: {message}")]
    ManifestParse {
        /// Manifest location.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A project name is empty or contains a path separator.
    #[error("invalid project name {0:?}")]
    InvalidProjectName(String),

    /// Two members share the same name.
    #[error("duplicate project {0:?}")]
    DuplicateProject(String),

    /// A plugin id is missing from the catalog.
    #[error("unknown plugin {0:?}")]
    UnknownPlugin(String),

    /// The same plugin id is declared more than once at the root.
    #[error("plugin {id:?} declared twice (versions {first} and {second})")]
    DuplicatePlugin {
        /// Plugin id.
        id: String,
        /// Version of the earlier declaration.
        first: String,
        /// Version of the repeated declaration.
        second: String,
    },

    /// A plugin exists in the catalog but not at the requested version.
    #[error("plugin {id:?} has no version {version:?} (available: {available})")]
    UnknownPluginVersion {
        /// Plugin id.
        id: String,
        /// Requested version.
        version: String,
        /// Comma-separated catalog versions.
        available: String,
    },

    /// A capability rule names a plugin that is not declared at the root.
    #[error("capability rule for {capability:?} references undeclared plugin {id:?}")]
    UndeclaredPlugin {
        /// Capability tag owning the rule.
        capability: String,
        /// Plugin id referenced by the rule.
        id: String,
    },

    /// A task with this name is already registered.
    #[error("task {0:?} is already registered")]
    DuplicateTask(String),

    /// No task with this name is registered.
    #[error("no task named {name:?} (available: {available})")]
    UnknownTask {
        /// Requested task name.
        name: String,
        /// Comma-separated registered task names.
        available: String,
    },

    /// Deleting the target would remove files outside the build output.
    #[error("refusing to clean {target}: {reason}")]
    UnsafeCleanTarget {
        /// Directory the clean task is bound to.
        target: PathBuf,
        /// Why the target was rejected.
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("filesystem error on {path}: {message}")]
    Filesystem {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error, verbatim.
        message: String,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;
