//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::recording::{RecordingClock, RecordingFileSystem, RecordingIdGenerator};
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem, ReplayingIdGenerator};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::{Clock, FileSystem, IdGenerator, PortResult};

/// Every external boundary the build layer touches.
///
/// Constructors wire up live, recording or replaying adapters. The context
/// is passed by reference into the configuration phase and into every task.
pub struct ServiceContext {
    /// Filesystem for manifest reads and output removal.
    pub fs: Box<dyn FileSystem>,
    /// Clock for task timestamps.
    pub clock: Box<dyn Clock>,
    /// Generator for invocation ids.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Context backed by the real disk, clock and random ids.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            clock: Box::new(LiveClock),
            id_gen: Box::new(LiveIdGenerator),
        }
    }

    /// Live context whose calls are captured by `session`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    #[must_use]
    pub fn recording(session: &RecordingSession) -> Self {
        Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator),
                Arc::clone(&session.id_gen),
            )),
        }
    }

    /// Start a recording session under `base` and return a context wired to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(base: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base)?;
        let ctx = Self::recording(&session);
        Ok((ctx, session))
    }

    /// Replay every port from a single cassette holding all interactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let load = || CassetteConfig::load_cassette(path);
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(load()?)),
            clock: Box::new(ReplayingClock::new(load()?)),
            id_gen: Box::new(ReplayingIdGenerator::new(load()?)),
        })
    }

    /// Replay from per-port cassettes; unconfigured ports panic when used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
        })
    }
}

// --- Panicking adapters for ports without a cassette ---

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(&self, _path: &Path) -> PortResult<String> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn remove_dir_all(&self, _path: &Path) -> PortResult<bool> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("IdGenerator port not configured in CassetteConfig: no cassette loaded for id_gen");
    }
}
