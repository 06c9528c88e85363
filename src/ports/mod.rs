//! Port traits defining external boundaries.
//!
//! The configuration phase and the task runner only touch the outside world
//! through these traits (disk, wall clock, invocation ids). Implementations
//! live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod id_gen;

pub use clock::Clock;
pub use filesystem::{FileSystem, PortResult};
pub use id_gen::IdGenerator;
