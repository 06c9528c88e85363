//! Id generator port for tagging configuration runs.

/// Generates unique identifiers.
///
/// Every configuration phase gets one invocation id so log lines from a
/// single run can be correlated.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
