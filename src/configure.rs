//! The configuration phase.
//!
//! Runs once per invocation, before any task: validate and resolve
//! everything fallible first, then rewrite outputs, apply plugins and
//! register tasks. The caller only ever sees a fully configured build or an
//! error; there is no partially rebound tree.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::context::ServiceContext;
use crate::error::Result;
use crate::layout::{normalize, OutputLayout, RewriteSummary};
use crate::manifest::{BuildManifest, Repository};
use crate::plugins::{PluginApplication, PluginRegistry, ResolvedPlugin};
use crate::project::{ProjectNode, ProjectTree};
use crate::tasks::{CleanTask, TaskOutcome, TaskRegistry, CLEAN_TASK};

/// Inputs that come from the invocation rather than the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureOptions {
    /// Root project directory. Should be absolute; `.` and `..` are
    /// resolved lexically.
    pub root_location: PathBuf,
    /// Overrides `output.rebind_members` when set.
    pub rebind_members: Option<bool>,
}

impl ConfigureOptions {
    /// Options for `root_location` with no overrides.
    pub fn new(root_location: impl Into<PathBuf>) -> Self {
        Self { root_location: root_location.into(), rebind_members: None }
    }
}

/// A build tree after the configuration phase. Read-only.
pub struct ConfiguredBuild {
    invocation_id: String,
    tree: ProjectTree,
    layout: OutputLayout,
    repositories: Vec<Repository>,
    plugins: Vec<ResolvedPlugin>,
    applications: Vec<PluginApplication>,
    tasks: TaskRegistry,
}

impl ConfiguredBuild {
    /// Id tagging this configuration run.
    #[must_use]
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// The rewritten project tree.
    #[must_use]
    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    /// The computed output layout.
    #[must_use]
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Shared output root.
    #[must_use]
    pub fn shared_root(&self) -> &Path {
        self.layout.shared_root()
    }

    /// Repositories shared by every project.
    #[must_use]
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Root-level plugin declarations, resolved.
    #[must_use]
    pub fn plugins(&self) -> &[ResolvedPlugin] {
        &self.plugins
    }

    /// Plugins applied by the capability pass.
    #[must_use]
    pub fn applications(&self) -> &[PluginApplication] {
        &self.applications
    }

    /// Registered tasks.
    #[must_use]
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Run a registered task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is unknown or fails.
    pub fn run_task(&self, name: &str, ctx: &ServiceContext) -> Result<TaskOutcome> {
        let _span = info_span!("task", invocation = %self.invocation_id, task = name).entered();
        self.tasks.run(name, ctx)
    }

    /// Serializable snapshot for `layout --json`.
    #[must_use]
    pub fn report(&self) -> LayoutReport {
        LayoutReport {
            invocation_id: self.invocation_id.clone(),
            shared_root: self.shared_root().to_path_buf(),
            rebind_members: self.layout.rebinds_members(),
            projects: self
                .tree
                .iter()
                .map(|p| ProjectReport {
                    name: p.name().to_string(),
                    location: p.location().to_path_buf(),
                    output_dir: p.output_dir().to_path_buf(),
                    rebound: p.is_rebound(),
                    plugins: p.plugins().iter().cloned().collect(),
                    capabilities: p.capabilities().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            plugins: self.plugins.clone(),
            repositories: self.repositories.clone(),
            tasks: self.tasks.names().map(String::from).collect(),
        }
    }
}

/// Machine-readable view of a [`ConfiguredBuild`].
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    /// Id tagging this configuration run.
    pub invocation_id: String,
    /// Shared output root.
    pub shared_root: PathBuf,
    /// Whether members were rebound.
    pub rebind_members: bool,
    /// Root first, then members.
    pub projects: Vec<ProjectReport>,
    /// Root-level plugin declarations.
    pub plugins: Vec<ResolvedPlugin>,
    /// Shared repositories.
    pub repositories: Vec<Repository>,
    /// Registered task names.
    pub tasks: Vec<String>,
}

/// One project in a [`LayoutReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    /// Project name.
    pub name: String,
    /// Project directory.
    pub location: PathBuf,
    /// Output directory after rewriting.
    pub output_dir: PathBuf,
    /// Whether the output directory was overridden.
    pub rebound: bool,
    /// Applied plugin ids.
    pub plugins: Vec<String>,
    /// Capability tags.
    pub capabilities: Vec<String>,
}

/// Run the configuration phase.
///
/// # Errors
///
/// Returns an error for invalid project names, duplicate members, unknown
/// plugins or versions, and capability rules naming undeclared plugins. In
/// every case nothing has been rebound.
pub fn configure(
    ctx: &ServiceContext,
    manifest: &BuildManifest,
    options: &ConfigureOptions,
) -> Result<ConfiguredBuild> {
    let invocation_id = ctx.id_gen.generate_id();
    let _span = info_span!("configure", invocation = %invocation_id).entered();
    let root_location = normalize(&options.root_location);
    let root_location = root_location.as_path();

    // Resolve before touching any project.
    let mut registry = PluginRegistry::builtin();
    for entry in &manifest.catalog {
        registry.insert(entry.clone());
    }
    let plugins = registry.resolve(&manifest.plugins)?;
    let rules = &manifest.conditional_plugins.rules;
    if manifest.conditional_plugins.enabled && !rules.is_empty() {
        rules.validate(&plugins)?;
    }

    let mut tree = build_tree(manifest, root_location, &registry)?;

    let rebind_members = options.rebind_members.unwrap_or(manifest.output.rebind_members);
    let layout = OutputLayout::new(root_location, &manifest.output.offset, rebind_members);
    let RewriteSummary { members_rebound, members_total } = layout.apply(&mut tree);

    for plugin in plugins.iter().filter(|p| p.apply) {
        tree.root_mut().apply_plugin(&plugin.id, plugin.provides.as_ref());
        debug!(plugin = %plugin.id, "plugin applied to root");
    }

    let applications = if manifest.conditional_plugins.enabled {
        rules.apply(tree.members_mut(), &plugins)
    } else {
        Vec::new()
    };

    let mut tasks = TaskRegistry::default();
    tasks.register(
        CLEAN_TASK,
        Box::new(CleanTask::new(layout.shared_root(), root_location)),
    )?;

    info!(
        shared_root = %layout.shared_root().display(),
        members_rebound,
        members_total,
        plugins_applied = applications.len(),
        "build configured"
    );

    Ok(ConfiguredBuild {
        invocation_id,
        tree,
        layout,
        repositories: manifest.repositories.clone(),
        plugins,
        applications,
        tasks,
    })
}

fn build_tree(
    manifest: &BuildManifest,
    root_location: &Path,
    registry: &PluginRegistry,
) -> Result<ProjectTree> {
    let root_name = manifest.name.clone().unwrap_or_else(|| {
        root_location
            .file_name()
            .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned())
    });
    let mut tree = ProjectTree::new(ProjectNode::new(root_name, root_location)?);

    for spec in &manifest.members {
        let mut member = ProjectNode::new(&spec.name, root_location.join(spec.relative_path()))?;
        for capability in &spec.capabilities {
            member.grant(capability.clone());
        }
        for id in &spec.plugins {
            let entry = registry.entry(id)?;
            member.apply_plugin(id, entry.provides.as_ref());
        }
        tree.add_member(member)?;
    }
    Ok(tree)
}
