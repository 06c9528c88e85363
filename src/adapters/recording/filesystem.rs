//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::filesystem::{FileSystem, PortResult};

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

impl PathInput {
    fn of(path: &Path) -> Self {
        Self { path: path.display().to_string() }
    }
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let result = self.inner.read_to_string(path);
        record_result(&self.recorder, "fs", "read_to_string", &PathInput::of(path), &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        record_interaction(&self.recorder, "fs", "exists", &PathInput::of(path), &result);
        result
    }

    fn remove_dir_all(&self, path: &Path) -> PortResult<bool> {
        let result = self.inner.remove_dir_all(path);
        record_result(&self.recorder, "fs", "remove_dir_all", &PathInput::of(path), &result);
        result
    }
}
