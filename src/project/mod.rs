//! Project tree: the root project and its ordered members.
//!
//! A [`ProjectTree`] is only mutable while the configuration phase holds it.
//! Once wrapped in a [`crate::configure::ConfiguredBuild`] it is read-only,
//! so output bindings cannot change after tasks start observing them.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Directory name a project writes to before any rewrite.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// A tag describing what kind of module a project is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(String);

impl Capability {
    /// Capability of a project producing an application.
    pub const APPLICATION_MODULE: &'static str = "applicationModule";
    /// Capability of a project producing a library.
    pub const LIBRARY_MODULE: &'static str = "libraryModule";

    /// Wrap a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a project's build outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBinding {
    /// Project-local `<location>/build`.
    Default(PathBuf),
    /// Overridden by the output path rewriter.
    Rebound(PathBuf),
}

impl OutputBinding {
    /// The bound directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Default(path) | Self::Rebound(path) => path,
        }
    }
}

/// One buildable unit of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    name: String,
    location: PathBuf,
    output: OutputBinding,
    plugins: BTreeSet<String>,
    capabilities: BTreeSet<Capability>,
}

impl ProjectNode {
    /// Create a node whose output directory is `<location>/build`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidProjectName`] if `name` is empty, is a
    /// relative path component (`.`/`..`) or contains a path separator.
    /// Member names become directory names under the shared output root.
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(BuildError::InvalidProjectName(name));
        }
        let location = location.into();
        let output = OutputBinding::Default(location.join(DEFAULT_BUILD_DIR));
        Ok(Self {
            name,
            location,
            output,
            plugins: BTreeSet::new(),
            capabilities: BTreeSet::new(),
        })
    }

    /// Project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project directory.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Current output binding.
    #[must_use]
    pub fn output(&self) -> &OutputBinding {
        &self.output
    }

    /// Directory this project's build outputs are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    /// Whether the output directory was overridden.
    #[must_use]
    pub fn is_rebound(&self) -> bool {
        matches!(self.output, OutputBinding::Rebound(_))
    }

    /// Ids of the plugins applied to this project.
    #[must_use]
    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    /// Whether the plugin with `id` is applied.
    #[must_use]
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.contains(id)
    }

    /// Capabilities granted directly or by applied plugins.
    #[must_use]
    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    /// Whether the project has the capability `tag`.
    #[must_use]
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.iter().any(|c| c.as_str() == tag)
    }

    /// Grant a capability.
    pub fn grant(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    /// Apply a plugin, granting the capability it provides.
    ///
    /// Returns `false` if the plugin was already applied.
    pub(crate) fn apply_plugin(&mut self, id: &str, provides: Option<&Capability>) -> bool {
        if !self.plugins.insert(id.to_string()) {
            return false;
        }
        if let Some(capability) = provides {
            self.capabilities.insert(capability.clone());
        }
        true
    }

    /// Replace the output binding, returning the previous one.
    pub(crate) fn set_output(&mut self, binding: OutputBinding) -> OutputBinding {
        std::mem::replace(&mut self.output, binding)
    }
}

/// The root project plus its members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTree {
    root: ProjectNode,
    members: Vec<ProjectNode>,
}

impl ProjectTree {
    /// A tree with no members.
    #[must_use]
    pub fn new(root: ProjectNode) -> Self {
        Self { root, members: Vec::new() }
    }

    /// Append a member.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateProject`] if a member with the same
    /// name exists; two members would otherwise share an output directory.
    pub fn add_member(&mut self, member: ProjectNode) -> Result<()> {
        if self.member(member.name()).is_some() {
            return Err(BuildError::DuplicateProject(member.name));
        }
        self.members.push(member);
        Ok(())
    }

    /// The root project.
    #[must_use]
    pub fn root(&self) -> &ProjectNode {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut ProjectNode {
        &mut self.root
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[ProjectNode] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [ProjectNode] {
        &mut self.members
    }

    /// Look up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&ProjectNode> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Root first, then members.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectNode> {
        std::iter::once(&self.root).chain(self.members.iter())
    }
}
