//! `buildtree layout` command.

use std::fmt::Write;

use crate::configure::ConfiguredBuild;

/// Execute the `layout` command.
///
/// # Errors
///
/// Returns an error string if JSON serialization fails.
pub fn run(build: &ConfiguredBuild, json: bool) -> Result<(), String> {
    if json {
        let out = serde_json::to_string_pretty(&build.report())
            .map_err(|e| format!("failed to serialize layout: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", render(build));
    }
    Ok(())
}

/// Human-readable layout: summary lines, a project table, then declared
/// plugins and repositories.
#[must_use]
pub fn render(build: &ConfiguredBuild) -> String {
    let mut out = String::new();
    let layout = build.layout();
    let _ = writeln!(out, "Shared output root: {}", layout.shared_root().display());
    let _ = writeln!(
        out,
        "Member rebinding:   {}\n",
        if layout.rebinds_members() { "enabled" } else { "disabled" }
    );

    let rows: Vec<(String, String, &str, String)> = build
        .tree()
        .iter()
        .map(|p| {
            let plugins = if p.plugins().is_empty() {
                "-".to_string()
            } else {
                p.plugins().iter().cloned().collect::<Vec<_>>().join(", ")
            };
            let rebound = if p.is_rebound() { "yes" } else { "no" };
            (p.name().to_string(), p.output_dir().display().to_string(), rebound, plugins)
        })
        .collect();

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(7).max(7);
    let output_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(6).max(6);

    let _ = writeln!(out, "{:<name_width$}  {:<output_width$}  {:<7}  PLUGINS", "PROJECT", "OUTPUT", "REBOUND");
    let _ = writeln!(out, "{:-<name_width$}  {:-<output_width$}  {:-<7}  {:-<7}", "", "", "", "");
    for (name, output, rebound, plugins) in &rows {
        let _ = writeln!(out, "{name:<name_width$}  {output:<output_width$}  {rebound:<7}  {plugins}");
    }

    let _ = writeln!(out, "\nDeclared plugins:");
    for plugin in build.plugins() {
        let mode = if plugin.apply { "applied" } else { "deferred" };
        let _ = writeln!(out, "  {} {} ({mode})", plugin.id, plugin.version);
    }

    let _ = writeln!(out, "\nRepositories:");
    for repo in build.repositories() {
        let _ = writeln!(out, "  {} {}", repo.name, repo.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::configure::{configure, ConfigureOptions};
    use crate::manifest::BuildManifest;
    use crate::test_support::mem_context;

    #[test]
    fn table_shows_root_redirect_and_local_members() {
        let (ctx, _fs) = mem_context();
        let manifest = BuildManifest::parse(
            "members:\n  - name: app\n    plugins: [com.android.application]\n",
            Path::new("buildtree.yaml"),
        )
        .unwrap();
        let build = configure(&ctx, &manifest, &ConfigureOptions::new("/repo/project/android")).unwrap();

        let text = render(&build);
        assert!(text.contains("Shared output root: /repo/project/build"));
        assert!(text.contains("Member rebinding:   disabled"));
        assert!(text.lines().any(|l| l.starts_with("android") && l.contains("/repo/project/build") && l.contains("yes")));
        assert!(text.lines().any(|l| l.starts_with("app") && l.contains("/repo/project/android/app/build") && l.contains("com.android.application")));
        assert!(text.contains("com.google.gms.google-services 4.4.2 (deferred)"));
        assert!(text.contains("mavenCentral https://repo.maven.apache.org/maven2/"));
    }
}
