//! Plugin catalog, root-level declarations and capability dispatch.
//!
//! Plugins are data here: an id, a pinned version and optionally the
//! capability applying it grants. Nothing is downloaded or executed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::project::{Capability, ProjectNode};

/// Id of the Android application plugin.
pub const ANDROID_APPLICATION: &str = "com.android.application";
/// Id of the Android library plugin.
pub const ANDROID_LIBRARY: &str = "com.android.library";
/// Id of the Google services plugin.
pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";

/// A plugin declared at the root project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDeclaration {
    /// Plugin id.
    pub id: String,
    /// Pinned version.
    pub version: String,
    /// Apply to the root project. Deferred (`false`) declarations only make
    /// the plugin available to capability rules.
    #[serde(default)]
    pub apply: bool,
}

/// A plugin the registry knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Plugin id.
    pub id: String,
    /// Versions that can be requested.
    pub versions: Vec<String>,
    /// Capability granted to a project the plugin is applied to.
    #[serde(default)]
    pub provides: Option<Capability>,
}

/// A declaration checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlugin {
    /// Plugin id.
    pub id: String,
    /// Pinned version.
    pub version: String,
    /// Whether it is applied to the root project.
    pub apply: bool,
    /// Capability it grants.
    pub provides: Option<Capability>,
}

/// Known plugins keyed by id.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    entries: BTreeMap<String, CatalogEntry>,
}

impl PluginRegistry {
    /// The plugins every build tree can use.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.insert(CatalogEntry {
            id: ANDROID_APPLICATION.to_string(),
            versions: vec!["8.1.4".into(), "8.2.2".into(), "8.3.2".into(), "8.5.2".into()],
            provides: Some(Capability::new(Capability::APPLICATION_MODULE)),
        });
        registry.insert(CatalogEntry {
            id: ANDROID_LIBRARY.to_string(),
            versions: vec!["8.1.4".into(), "8.2.2".into(), "8.3.2".into(), "8.5.2".into()],
            provides: Some(Capability::new(Capability::LIBRARY_MODULE)),
        });
        registry.insert(CatalogEntry {
            id: GOOGLE_SERVICES.to_string(),
            versions: vec!["4.3.15".into(), "4.4.0".into(), "4.4.1".into(), "4.4.2".into()],
            provides: None,
        });
        registry
    }

    /// Add an entry. Versions of an existing id are merged; a `provides`
    /// on the new entry wins.
    pub fn insert(&mut self, entry: CatalogEntry) {
        match self.entries.get_mut(&entry.id) {
            Some(existing) => {
                for version in entry.versions {
                    if !existing.versions.contains(&version) {
                        existing.versions.push(version);
                    }
                }
                if entry.provides.is_some() {
                    existing.provides = entry.provides;
                }
            }
            None => {
                self.entries.insert(entry.id.clone(), entry);
            }
        }
    }

    /// Look up a plugin by id.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownPlugin`] if the id is not in the catalog.
    pub fn entry(&self, id: &str) -> Result<&CatalogEntry> {
        self.entries.get(id).ok_or_else(|| BuildError::UnknownPlugin(id.to_string()))
    }

    /// Check every declaration against the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first unknown id or version, or
    /// [`BuildError::DuplicatePlugin`] when an id is declared twice. Nothing
    /// is resolved unless every declaration is valid.
    pub fn resolve(&self, declarations: &[PluginDeclaration]) -> Result<Vec<ResolvedPlugin>> {
        let mut resolved: Vec<ResolvedPlugin> = Vec::with_capacity(declarations.len());
        for decl in declarations {
            if let Some(earlier) = resolved.iter().find(|p| p.id == decl.id) {
                return Err(BuildError::DuplicatePlugin {
                    id: decl.id.clone(),
                    first: earlier.version.clone(),
                    second: decl.version.clone(),
                });
            }
            let entry = self.entry(&decl.id)?;
            if !entry.versions.contains(&decl.version) {
                return Err(BuildError::UnknownPluginVersion {
                    id: decl.id.clone(),
                    version: decl.version.clone(),
                    available: entry.versions.join(", "),
                });
            }
            debug!(id = %decl.id, version = %decl.version, apply = decl.apply, "plugin resolved");
            resolved.push(ResolvedPlugin {
                id: decl.id.clone(),
                version: decl.version.clone(),
                apply: decl.apply,
                provides: entry.provides.clone(),
            });
        }
        Ok(resolved)
    }
}

/// One plugin applied to one project by [`CapabilityRules::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginApplication {
    /// Project name.
    pub project: String,
    /// Plugin id.
    pub plugin: String,
    /// Capability that made the project eligible.
    pub capability: Capability,
}

/// Capability tag mapped to the plugins eligible for projects carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityRules {
    rules: BTreeMap<Capability, Vec<String>>,
}

impl CapabilityRules {
    /// Rules applying google-services to application and library modules.
    #[must_use]
    pub fn google_services() -> Self {
        let mut rules = Self::default();
        rules.add(Capability::new(Capability::APPLICATION_MODULE), GOOGLE_SERVICES);
        rules.add(Capability::new(Capability::LIBRARY_MODULE), GOOGLE_SERVICES);
        rules
    }

    /// Make `plugin` eligible for projects with `capability`.
    pub fn add(&mut self, capability: Capability, plugin: impl Into<String>) {
        let plugin = plugin.into();
        let plugins = self.rules.entry(capability).or_default();
        if !plugins.contains(&plugin) {
            plugins.push(plugin);
        }
    }

    /// Whether there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ensure every plugin named by a rule was declared at the root.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UndeclaredPlugin`] for the first rule naming a
    /// plugin absent from `declared`.
    pub fn validate(&self, declared: &[ResolvedPlugin]) -> Result<()> {
        for (capability, plugins) in &self.rules {
            for id in plugins {
                if !declared.iter().any(|p| &p.id == id) {
                    return Err(BuildError::UndeclaredPlugin {
                        capability: capability.to_string(),
                        id: id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply eligible plugins to each member in one pass.
    ///
    /// Eligibility is decided from the capabilities each member had before
    /// the pass, so a plugin granting a capability never triggers another
    /// rule in the same pass. Members without a matching capability are
    /// skipped. Plugins must have been checked by [`Self::validate`].
    pub fn apply(
        &self,
        members: &mut [ProjectNode],
        declared: &[ResolvedPlugin],
    ) -> Vec<PluginApplication> {
        let mut applied = Vec::new();
        for member in members.iter_mut() {
            let eligible: Vec<(Capability, &String)> = self
                .rules
                .iter()
                .filter(|(capability, _)| member.has_capability(capability.as_str()))
                .flat_map(|(capability, plugins)| plugins.iter().map(move |p| (capability.clone(), p)))
                .collect();

            for (capability, id) in eligible {
                let provides = declared.iter().find(|p| &p.id == id).and_then(|p| p.provides.as_ref());
                if member.apply_plugin(id, provides) {
                    debug!(project = member.name(), plugin = %id, %capability, "plugin applied");
                    applied.push(PluginApplication {
                        project: member.name().to_string(),
                        plugin: id.clone(),
                        capability,
                    });
                }
            }
        }
        applied
    }
}
