//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number, assigned by the recorder.
    pub seq: u64,
    /// Port name (`fs`, `clock`, `id_gen`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments passed to the port.
    pub input: serde_json::Value,
    /// Value the port returned.
    pub output: serde_json::Value,
}

/// An ordered list of interactions plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was written.
    pub recorded_at: DateTime<Utc>,
    /// Commit of the build tree at recording time.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}
