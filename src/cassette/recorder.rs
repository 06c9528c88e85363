//! Accumulates interactions and writes them as a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions for one cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path` on [`finish`](Self::finish).
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Append an interaction, assigning the next sequence number.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Write the cassette YAML to disk and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_numbers_follow_call_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fs.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "fs-port", "deadbeef");
        assert!(recorder.is_empty());
        recorder.record("fs", "read_to_string", json!({"path": "/a"}), json!({"ok": ""}));
        recorder.record("fs", "exists", json!({"path": "/b"}), json!(true));
        recorder.record("fs", "remove_dir_all", json!({"path": "/b"}), json!({"ok": true}));
        assert_eq!(recorder.len(), 3);

        let written = recorder.finish().expect("finish should succeed");
        assert_eq!(written, path);

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.name, "fs-port");
        assert_eq!(cassette.commit, "deadbeef");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }
}
