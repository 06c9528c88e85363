//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `buildtree`.
#[derive(Debug, Parser)]
#[command(name = "buildtree", version, about = "Shared build output layout for multi-project trees")]
pub struct Cli {
    /// Root project directory.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Manifest file (default: <root>/buildtree.yaml, or $BUILDTREE_MANIFEST).
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Rebind every member to <shared root>/<member name>.
    #[arg(long, global = true)]
    pub rebind_members: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the shared output root and every project's output directory.
    Layout {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// List registered tasks.
    Tasks,
    /// Run a registered task by name.
    Run {
        /// Task name.
        task: String,
    },
    /// Delete the shared output root.
    Clean,
}
