//! Record a clean run against the real disk, then replay it.
//!
//! The replay must reproduce the recorded outcome without touching disk.

use std::path::Path;

use buildtree::cassette::config::CassetteConfig;
use buildtree::configure::{configure, ConfigureOptions};
use buildtree::context::ServiceContext;
use buildtree::manifest::{BuildManifest, MANIFEST_FILE};

/// Configure from the manifest under `root` and run `clean`.
fn configure_and_clean(ctx: &ServiceContext, root: &Path) -> (String, String, String) {
    let manifest = BuildManifest::load(ctx, &root.join(MANIFEST_FILE)).unwrap();
    let build = configure(ctx, &manifest, &ConfigureOptions::new(root)).unwrap();
    let outcome = build.run_task("clean", ctx).unwrap();
    (build.invocation_id().to_string(), build.shared_root().display().to_string(), outcome.detail)
}

#[test]
fn replayed_clean_matches_recording() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("project").join("android");
    let shared = tmp.path().join("project").join("build");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join(MANIFEST_FILE), "name: android\n").unwrap();
    std::fs::create_dir_all(shared.join("app")).unwrap();

    // --- Record ---
    let cassettes = tmp.path().join("cassettes");
    let (ctx, session) = ServiceContext::recording_at(&cassettes).unwrap();
    let recorded = configure_and_clean(&ctx, &root);
    drop(ctx);
    let dir = session.finish().unwrap();

    assert!(recorded.2.starts_with("removed"));
    assert!(!shared.exists());

    // Recreate the output so a replay that touched disk would be visible.
    std::fs::create_dir_all(shared.join("app")).unwrap();

    // --- Replay twice ---
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::from_recording_dir(&dir)).unwrap();
        let replayed = configure_and_clean(&ctx, &root);
        assert_eq!(replayed, recorded);
    }
    assert!(shared.exists(), "replay must not touch the filesystem");
}
