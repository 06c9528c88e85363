//! Live filesystem adapter using `std::fs`.

use std::io::ErrorKind;
use std::path::Path;

use crate::ports::filesystem::{FileSystem, PortResult};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> PortResult<bool> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(true),
            // Another process may have removed it between our check and the call.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_dir_all_deletes_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("build");
        std::fs::create_dir_all(target.join("app/outputs")).unwrap();
        std::fs::write(target.join("app/outputs/app.apk"), "bytes").unwrap();

        let removed = LiveFileSystem.remove_dir_all(&target).unwrap();

        assert!(removed);
        assert!(!target.exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn remove_dir_all_on_missing_path_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let removed = LiveFileSystem.remove_dir_all(&tmp.path().join("absent")).unwrap();
        assert!(!removed);
    }

    #[test]
    fn read_to_string_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(LiveFileSystem.read_to_string(&tmp.path().join("nope.yaml")).is_err());
    }
}
