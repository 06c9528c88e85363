//! In-memory ports shared by unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::adapters::live::clock::LiveClock;
use crate::context::ServiceContext;
use crate::ports::{FileSystem, IdGenerator, PortResult};

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    removal_error: Option<String>,
}

/// In-memory filesystem; clones share the same files.
#[derive(Clone, Default)]
pub(crate) struct MemFs {
    state: Arc<Mutex<State>>,
}

impl MemFs {
    pub(crate) fn add_file(&self, path: impl Into<PathBuf>, contents: &str) {
        self.state.lock().unwrap().files.insert(path.into(), contents.to_string());
    }

    pub(crate) fn exists_path(&self, path: impl AsRef<Path>) -> bool {
        self.exists(path.as_ref())
    }

    pub(crate) fn fail_removal(&self, message: &str) {
        self.state.lock().unwrap().removal_error = Some(message.to_string());
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.keys().any(|k| k.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> PortResult<bool> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.removal_error {
            return Err(message.clone().into());
        }
        let before = state.files.len();
        state.files.retain(|k, _| !k.starts_with(path));
        Ok(state.files.len() != before)
    }
}

/// Hands out `run-1`, `run-2`, ...
#[derive(Default)]
pub(crate) struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn generate_id(&self) -> String {
        format!("run-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// A context over a fresh [`MemFs`], returned alongside for inspection.
pub(crate) fn mem_context() -> (ServiceContext, MemFs) {
    let fs = MemFs::default();
    let ctx = ServiceContext {
        fs: Box::new(fs.clone()),
        clock: Box::new(LiveClock),
        id_gen: Box::new(SequentialIds::default()),
    };
    (ctx, fs)
}
