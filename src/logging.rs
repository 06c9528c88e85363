//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for `--json` output.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug for this crate.
/// A second call (tests driving [`crate::run`] repeatedly) is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "buildtree=debug" } else { "buildtree=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
