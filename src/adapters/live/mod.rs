//! Live adapters backed by the real system.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
