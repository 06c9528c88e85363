//! Command dispatch and handlers.

pub mod layout;
pub mod run;
pub mod tasks;

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::configure::{configure, ConfigureOptions, ConfiguredBuild};
use crate::context::ServiceContext;
use crate::layout::normalize;
use crate::manifest::{BuildManifest, MANIFEST_FILE};

/// Dispatch a parsed command to its handler.
///
/// When `BUILDTREE_RECORD` is set to a directory path, every port
/// interaction is recorded to per-port cassette files under it.
///
/// # Errors
///
/// Returns an error string if configuration or the selected command fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var("BUILDTREE_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(Path::new(&path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(cli, &ctx);

    // Cassettes are written even when the command failed.
    if let Some(session) = session {
        drop(ctx);
        let dir = session.finish()?;
        eprintln!("Recording saved to: {}", dir.display());
    }

    result
}

/// Configure the tree described by `cli` and run its command on `ctx`.
///
/// # Errors
///
/// Returns an error string if configuration or the command fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<(), String> {
    let build = load_build(cli, ctx)?;
    match &cli.command {
        Command::Layout { json } => layout::run(&build, *json),
        Command::Tasks => tasks::run(&build),
        Command::Run { task } => run::run(&build, ctx, task),
        Command::Clean => run::run(&build, ctx, crate::tasks::CLEAN_TASK),
    }
}

/// Load the manifest and run the configuration phase.
///
/// # Errors
///
/// Returns an error string if the root cannot be made absolute, the
/// manifest is invalid or configuration fails.
pub fn load_build(cli: &Cli, ctx: &ServiceContext) -> Result<ConfiguredBuild, String> {
    let root = root_location(&cli.root)?;
    let manifest_path = manifest_path(cli.manifest.as_deref(), &root);
    debug!(root = %root.display(), manifest = %manifest_path.display(), "loading build");

    let manifest = BuildManifest::load(ctx, &manifest_path).map_err(|e| e.to_string())?;
    let options = ConfigureOptions {
        root_location: root,
        rebind_members: cli.rebind_members.then_some(true),
    };
    configure(ctx, &manifest, &options).map_err(|e| format!("configuration failed: {e}"))
}

fn root_location(root: &Path) -> Result<PathBuf, String> {
    let absolute = std::path::absolute(root)
        .map_err(|e| format!("failed to resolve root {}: {e}", root.display()))?;
    Ok(normalize(&absolute))
}

fn manifest_path(explicit: Option<&Path>, root: &Path) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os("BUILDTREE_MANIFEST").map(PathBuf::from))
        .unwrap_or_else(|| root.join(MANIFEST_FILE))
}
