//! Clock port used to timestamp task runs.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Task outcomes carry start and finish times; replacing the clock keeps
/// those deterministic under cassette playback.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
