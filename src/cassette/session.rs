//! Recording session owning one recorder per port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Per-port recorders writing into one timestamped directory.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for id generator interactions.
    pub id_gen: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Start a session under `<base>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamped directory already exists or
    /// cannot be created.
    pub fn new(base: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = commit_hash();
        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), &commit)))
        };

        Ok(Self {
            fs: make_recorder("fs"),
            clock: make_recorder("clock"),
            id_gen: make_recorder("id_gen"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every port's cassette and return the session directory.
    ///
    /// All adapters holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.fs, "fs")?;
        finish_one(self.clock, "clock")?;
        finish_one(self.id_gen, "id_gen")?;

        Ok(self.output_dir)
    }
}

/// Current git commit, or `"unknown"` outside a repository.
fn commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        tracing::warn!("could not read git commit hash, recording as 'unknown'");
        "unknown".to_string()
    })
}
