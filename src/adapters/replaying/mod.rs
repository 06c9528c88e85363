//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod id_gen;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use id_gen::ReplayingIdGenerator;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortResult;

/// Pull the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output.clone()
}

/// Decode a recorded `{"ok": v}` / `{"err": "message"}` output.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> PortResult<T> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
