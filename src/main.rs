//! Binary entrypoint for the `buildtree` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Optional; a missing .env is not an error.
    let _ = dotenvy::dotenv();

    // Recording is handled in commands::dispatch via BUILDTREE_RECORD=<dir>.
    match buildtree::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
