//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::{FileSystem, PortResult};

/// Replays recorded filesystem operations from a cassette.
///
/// Nothing on disk is touched; a replayed `remove_dir_all` only reports
/// what the recorded run observed.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> PortResult<String> {
        let output = next_output(&self.replayer, "fs", "read_to_string");
        extract_result(&output, "fs::read_to_string")
    }

    fn exists(&self, _path: &Path) -> bool {
        let output = next_output(&self.replayer, "fs", "exists");
        output.as_bool().expect("fs::exists: expected boolean output")
    }

    fn remove_dir_all(&self, _path: &Path) -> PortResult<bool> {
        let output = next_output(&self.replayer, "fs", "remove_dir_all");
        extract_result(&output, "fs::remove_dir_all")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    fn fs_interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "fs".into(),
            method: method.into(),
            input: json!({"path": "/repo/project/build"}),
            output,
        }
    }

    #[test]
    fn replays_manifest_read() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![fs_interaction(
            0,
            "read_to_string",
            json!({"ok": "name: android\n"}),
        )]));
        let text = fs.read_to_string(Path::new("/repo/project/android/buildtree.yaml")).unwrap();
        assert_eq!(text, "name: android\n");
    }

    #[test]
    fn replays_remove_dir_all_error_verbatim() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![fs_interaction(
            0,
            "remove_dir_all",
            json!({"err": "Permission denied (os error 13)"}),
        )]));
        let err = fs.remove_dir_all(Path::new("/repo/project/build")).unwrap_err();
        assert!(err.to_string().contains("Permission denied"));
    }

    #[test]
    fn replays_exists_sequence() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            fs_interaction(0, "exists", json!(true)),
            fs_interaction(1, "exists", json!(false)),
        ]));
        let path = Path::new("/repo/project/build");
        assert!(fs.exists(path));
        assert!(!fs.exists(path));
    }
}
