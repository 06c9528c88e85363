//! Cassettes: YAML files of recorded port interactions.
//!
//! A run with `BUILDTREE_RECORD=<dir>` writes one cassette per port; tests
//! replay them to reproduce a configuration or clean run without touching
//! the real disk.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
