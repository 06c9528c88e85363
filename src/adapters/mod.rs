//! Port implementations.
//!
//! - `live`: real disk, system clock, random ids.
//! - `recording`: wraps a live adapter and captures every call to a cassette.
//! - `replaying`: serves calls from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
