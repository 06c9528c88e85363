//! Per-port cassette selection for replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Cassette file per port. A port left as `None` panics when called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the filesystem port.
    pub fs: Option<PathBuf>,
    /// Cassette for the clock port.
    pub clock: Option<PathBuf>,
    /// Cassette for the id generator port.
    pub id_gen: Option<PathBuf>,
}

/// Replayers loaded from a [`CassetteConfig`].
pub struct PortReplayers {
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the id generator port.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// A config with no cassettes: every port panics if used.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Point every port at the cassettes of one recording directory
    /// (`fs.cassette.yaml`, `clock.cassette.yaml`, `id_gen.cassette.yaml`).
    #[must_use]
    pub fn from_recording_dir(dir: &Path) -> Self {
        Self {
            fs: Some(dir.join("fs.cassette.yaml")),
            clock: Some(dir.join("clock.cassette.yaml")),
            id_gen: Some(dir.join("id_gen.cassette.yaml")),
        }
    }

    /// Load one cassette file into a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            fs: self.fs.as_deref().map(Self::load_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_cassette).transpose()?,
            id_gen: self.id_gen.as_deref().map(Self::load_cassette).transpose()?,
        })
    }
}
