//! Filesystem port for manifest reads and output-directory removal.

use std::path::Path;

/// Result type shared by fallible port methods.
pub type PortResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Provides the filesystem operations the build layer needs.
///
/// Abstracting the filesystem lets the clean task be exercised against an
/// in-memory tree or a recorded cassette instead of the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> PortResult<String>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Recursively removes a directory and everything beneath it.
    ///
    /// Returns `Ok(false)` without touching anything when the path is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> PortResult<bool>;
}
