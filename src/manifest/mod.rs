//! Build manifest: the YAML description of a project tree.
//!
//! ```yaml
//! name: android
//! repositories:
//!   - name: google
//!     url: https://dl.google.com/dl/android/maven2/
//! plugins:
//!   - id: com.google.gms.google-services
//!     version: 4.4.2
//!     apply: false
//! output:
//!   offset: ../../build
//!   rebind_members: false
//! members:
//!   - name: app
//!     plugins: [com.android.application]
//! conditional_plugins:
//!   enabled: false
//!   rules:
//!     applicationModule: [com.google.gms.google-services]
//! ```
//!
//! Every section is optional. A missing or empty manifest yields
//! [`BuildManifest::default`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{BuildError, Result};
use crate::layout::DEFAULT_OUTPUT_OFFSET;
use crate::plugins::{CapabilityRules, CatalogEntry, PluginDeclaration, GOOGLE_SERVICES};
use crate::project::Capability;

/// File name looked up in the root project directory.
pub const MANIFEST_FILE: &str = "buildtree.yaml";

/// A package repository shared by every project. Data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Repository {
    /// Short name.
    pub name: String,
    /// Base URL.
    pub url: String,
}

/// Where outputs go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Offset from `<root>/build` to the shared output root.
    #[serde(default = "default_offset")]
    pub offset: PathBuf,
    /// Rebind each member to `<shared root>/<member name>`.
    #[serde(default)]
    pub rebind_members: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { offset: default_offset(), rebind_members: false }
    }
}

/// One member project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberSpec {
    /// Member name; also its directory under the shared root.
    pub name: String,
    /// Directory relative to the root project; defaults to `name`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Capabilities granted directly.
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
    /// Catalog plugin ids the member applies itself.
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl MemberSpec {
    /// Member directory relative to the root project.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(&self.name))
    }
}

/// The optional per-member plugin pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionalPlugins {
    /// Run the pass.
    #[serde(default)]
    pub enabled: bool,
    /// Capability tag to plugin ids.
    #[serde(default = "CapabilityRules::google_services")]
    pub rules: CapabilityRules,
}

impl Default for ConditionalPlugins {
    fn default() -> Self {
        Self { enabled: false, rules: CapabilityRules::google_services() }
    }
}

/// Parsed `buildtree.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildManifest {
    /// Root project name; defaults to the root directory's name.
    #[serde(default)]
    pub name: Option<String>,
    /// Repositories shared by all projects.
    #[serde(default = "default_repositories")]
    pub repositories: Vec<Repository>,
    /// Root-level plugin declarations.
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginDeclaration>,
    /// Catalog entries added to the built-in registry.
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    /// Output relocation settings.
    #[serde(default)]
    pub output: OutputSettings,
    /// Member projects in build order.
    #[serde(default)]
    pub members: Vec<MemberSpec>,
    /// Capability-driven plugin pass.
    #[serde(default)]
    pub conditional_plugins: ConditionalPlugins,
}

impl Default for BuildManifest {
    fn default() -> Self {
        Self {
            name: None,
            repositories: default_repositories(),
            plugins: default_plugins(),
            catalog: Vec::new(),
            output: OutputSettings::default(),
            members: Vec::new(),
            conditional_plugins: ConditionalPlugins::default(),
        }
    }
}

impl BuildManifest {
    /// Parse manifest YAML. Blank input yields the default manifest.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ManifestParse`] on invalid YAML or unknown keys.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|e| BuildError::ManifestParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the manifest at `path` through the filesystem port.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ManifestRead`] if the file exists but cannot be
    /// read, or [`BuildError::ManifestParse`] if it is invalid.
    pub fn load(ctx: &ServiceContext, path: &Path) -> Result<Self> {
        if !ctx.fs.exists(path) {
            debug!(path = %path.display(), "no manifest, using defaults");
            return Ok(Self::default());
        }
        let contents = ctx.fs.read_to_string(path).map_err(|e| BuildError::ManifestRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, path)
    }
}

fn default_offset() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_OFFSET)
}

fn default_repositories() -> Vec<Repository> {
    vec![
        Repository { name: "google".into(), url: "https://dl.google.com/dl/android/maven2/".into() },
        Repository {
            name: "mavenCentral".into(),
            url: "https://repo.maven.apache.org/maven2/".into(),
        },
    ]
}

fn default_plugins() -> Vec<PluginDeclaration> {
    vec![PluginDeclaration { id: GOOGLE_SERVICES.into(), version: "4.4.2".into(), apply: false }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mem_context;

    #[test]
    fn missing_manifest_yields_defaults() {
        let (ctx, _fs) = mem_context();
        let manifest = BuildManifest::load(&ctx, Path::new("/repo/android/buildtree.yaml")).unwrap();

        assert_eq!(manifest, BuildManifest::default());
        assert_eq!(manifest.output.offset, PathBuf::from("../../build"));
        assert!(!manifest.output.rebind_members);
        assert!(!manifest.conditional_plugins.enabled);
        assert_eq!(manifest.repositories.len(), 2);
        assert!(!manifest.plugins[0].apply);
    }

    #[test]
    fn parses_members_and_settings() {
        let yaml = r"
name: android
output:
  rebind_members: true
members:
  - name: app
    capabilities: [applicationModule]
  - name: core
    path: libs/core
    plugins: [com.android.library]
";
        let manifest = BuildManifest::parse(yaml, Path::new("m.yaml")).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("android"));
        assert!(manifest.output.rebind_members);
        assert_eq!(manifest.output.offset, PathBuf::from("../../build"));
        assert_eq!(manifest.members[0].relative_path(), Path::new("app"));
        assert!(manifest.members[0].capabilities.contains(&Capability::new("applicationModule")));
        assert_eq!(manifest.members[1].relative_path(), Path::new("libs/core"));
        assert_eq!(manifest.repositories, default_repositories());
    }

    #[test]
    fn blank_manifest_is_default() {
        let manifest = BuildManifest::parse("  \n", Path::new("m.yaml")).unwrap();
        assert_eq!(manifest, BuildManifest::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = BuildManifest::parse("outptu: {}\n", Path::new("m.yaml")).unwrap_err();
        assert!(matches!(err, BuildError::ManifestParse { .. }));
    }

    #[test]
    fn misspelled_nested_keys_are_rejected() {
        let plugin = "plugins:\n  - id: com.google.gms.google-services\n    version: 4.4.2\n    aply: true\n";
        let repo = "repositories:\n  - name: google\n    uri: https://dl.google.com/\n";
        for yaml in [plugin, repo] {
            let err = BuildManifest::parse(yaml, Path::new("m.yaml")).unwrap_err();
            assert!(matches!(err, BuildError::ManifestParse { .. }), "{yaml}");
        }
    }

    #[test]
    fn loads_through_filesystem_port() {
        let (ctx, fs) = mem_context();
        fs.add_file("/repo/android/buildtree.yaml", "name: droid\n");
        let manifest = BuildManifest::load(&ctx, Path::new("/repo/android/buildtree.yaml")).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("droid"));
    }
}
