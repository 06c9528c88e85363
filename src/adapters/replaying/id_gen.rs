//! Replaying adapter for the `IdGenerator` port.

use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::IdGenerator;

/// Replays recorded invocation ids from a cassette.
pub struct ReplayingIdGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying id generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    fn generate_id(&self) -> String {
        let output = next_output(&self.replayer, "id_gen", "generate_id");
        output.as_str().expect("id_gen::generate_id: expected string output").to_string()
    }
}
