//! Shared build-output layout and clean task for multi-project build trees.
//!
//! The configuration phase ([`configure::configure`]) computes one shared
//! output root from the root project's location, rebinds project output
//! directories into it and registers a `clean` task that deletes it.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod configure;
pub mod context;
pub mod error;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod plugins;
pub mod ports;
pub mod project;
pub mod tasks;

#[cfg(test)]
mod test_support;

use clap::Parser;

pub use error::{BuildError, Result};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration or the
/// selected command fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    logging::init(cli.verbose);
    commands::dispatch(&cli)
}
