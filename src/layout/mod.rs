//! Output path rewriter.
//!
//! Computes one shared output directory for the whole tree and rebinds the
//! root project (and, when enabled, every member) into it:
//!
//! ```text
//! <root location>/build/<offset>        shared root (normalized)
//! <shared root>                         root project output
//! <shared root>/<member name>           member output, rebinding enabled
//! <member location>/build               member output, rebinding disabled
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::project::{OutputBinding, ProjectNode, ProjectTree, DEFAULT_BUILD_DIR};

/// Offset from the root project's own build directory to the shared root.
pub const DEFAULT_OUTPUT_OFFSET: &str = "../../build";

/// Derive the shared output root from the root project's location.
///
/// The offset is applied to `<root_location>/build` and the result is
/// normalized lexically; the filesystem is never consulted, so the same
/// inputs always produce the same path whether or not it exists.
#[must_use]
pub fn compute_shared_root(root_location: &Path, offset: &Path) -> PathBuf {
    normalize(&root_location.join(DEFAULT_BUILD_DIR).join(offset))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` above a filesystem root is dropped; `..` at the start of a relative
/// path is kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Override a project's output directory.
///
/// Calling it again before configuration finishes overwrites the earlier
/// binding. Returns the binding that was replaced.
pub fn rebind(project: &mut ProjectNode, new_path: PathBuf) -> OutputBinding {
    let previous = project.set_output(OutputBinding::Rebound(new_path));
    if let OutputBinding::Rebound(old) = &previous {
        debug!(
            project = project.name(),
            old = %old.display(),
            new = %project.output_dir().display(),
            "overwriting output binding"
        );
    }
    previous
}

/// The computed layout, built once per configuration run and passed by
/// reference to anything resolving an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    shared_root: PathBuf,
    rebind_members: bool,
}

impl OutputLayout {
    /// Compute the layout for a root location.
    #[must_use]
    pub fn new(root_location: &Path, offset: &Path, rebind_members: bool) -> Self {
        Self { shared_root: compute_shared_root(root_location, offset), rebind_members }
    }

    /// The shared output root.
    #[must_use]
    pub fn shared_root(&self) -> &Path {
        &self.shared_root
    }

    /// Whether members are rebound under the shared root.
    #[must_use]
    pub fn rebinds_members(&self) -> bool {
        self.rebind_members
    }

    /// Directory a member writes to once rebinding is applied.
    #[must_use]
    pub fn member_dir(&self, name: &str) -> PathBuf {
        self.shared_root.join(name)
    }

    /// Rebind the tree: the root always, members only when enabled.
    pub fn apply(&self, tree: &mut ProjectTree) -> RewriteSummary {
        rebind(tree.root_mut(), self.shared_root.clone());
        debug!(root = tree.root().name(), dir = %self.shared_root.display(), "root output rebound");

        let mut members_rebound = 0;
        if self.rebind_members {
            for member in tree.members_mut() {
                let dir = self.member_dir(member.name());
                debug!(member = member.name(), dir = %dir.display(), "member output rebound");
                rebind(member, dir);
                members_rebound += 1;
            }
        }
        RewriteSummary { members_rebound, members_total: tree.members().len() }
    }
}

/// Counts reported after [`OutputLayout::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Members moved under the shared root.
    pub members_rebound: usize,
    /// Members in the tree.
    pub members_total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_OFFSET)
    }

    fn tree() -> ProjectTree {
        let mut tree = ProjectTree::new(ProjectNode::new("android", "/repo/project/android").unwrap());
        tree.add_member(ProjectNode::new("app", "/repo/project/android/app").unwrap()).unwrap();
        tree.add_member(ProjectNode::new("core", "/repo/project/android/core").unwrap()).unwrap();
        tree
    }

    #[test]
    fn shared_root_is_two_levels_above_root_build_dir() {
        let root = compute_shared_root(Path::new("/repo/project/android"), &offset());
        assert_eq!(root, PathBuf::from("/repo/project/build"));
    }

    #[test]
    fn compute_shared_root_is_deterministic() {
        let location = Path::new("/repo/project/android");
        assert_eq!(compute_shared_root(location, &offset()), compute_shared_root(location, &offset()));
    }

    #[test]
    fn absolute_offset_replaces_root_build_dir() {
        let root = compute_shared_root(Path::new("/repo/project/android"), Path::new("/tmp/out"));
        assert_eq!(root, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn normalize_handles_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("./build/../../build")), PathBuf::from("../build"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn rebind_overwrites_and_returns_previous() {
        let mut node = ProjectNode::new("app", "/x/app").unwrap();
        let first = rebind(&mut node, PathBuf::from("/out/a"));
        assert_eq!(first, OutputBinding::Default(PathBuf::from("/x/app/build")));

        let second = rebind(&mut node, PathBuf::from("/out/b"));
        assert_eq!(second, OutputBinding::Rebound(PathBuf::from("/out/a")));
        assert_eq!(node.output_dir(), Path::new("/out/b"));
    }

    #[test]
    fn members_keep_local_outputs_by_default() {
        let layout = OutputLayout::new(Path::new("/repo/project/android"), &offset(), false);
        let mut tree = tree();
        let summary = layout.apply(&mut tree);

        assert_eq!(tree.root().output_dir(), Path::new("/repo/project/build"));
        assert!(tree.root().is_rebound());
        assert_eq!(
            tree.member("app").unwrap().output_dir(),
            Path::new("/repo/project/android/app/build")
        );
        assert_eq!(summary, RewriteSummary { members_rebound: 0, members_total: 2 });
    }

    #[test]
    fn members_move_under_shared_root_when_enabled() {
        let layout = OutputLayout::new(Path::new("/repo/project/android"), &offset(), true);
        let mut tree = tree();
        let summary = layout.apply(&mut tree);

        for member in tree.members() {
            assert_eq!(member.output_dir(), layout.member_dir(member.name()));
            assert!(member.is_rebound());
        }
        assert_eq!(tree.member("core").unwrap().output_dir(), Path::new("/repo/project/build/core"));
        assert_eq!(summary.members_rebound, 2);
    }
}
