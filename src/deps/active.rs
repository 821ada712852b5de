// src/deps/active.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::deps::expand::ExpandContext;
use crate::deps::manifest;
use crate::watch::{FileInfo, ModStatus};

/// A dependency script together with the metadata its manifest chain gave it.
#[derive(Debug, Clone)]
pub struct DepScript {
    pub file: FileInfo,
    /// Snippet evaluated in this dep's script language when the dep changes.
    /// Empty when no `/reload` directive reached this dependency.
    pub reload_cmd: String,
    /// Package base in effect when this dependency was recorded.
    pub pkg_base: PathBuf,
}

impl DepScript {
    pub fn has_reload_directive(&self) -> bool {
        !self.reload_cmd.is_empty()
    }
}

/// The script currently under observation, plus everything derived from its
/// manifest chain: the manifests themselves, the dependency map, the optional
/// trigger file and the package base.
///
/// All recorded paths are absolute and lexically normalized; the dependency
/// map is keyed by those paths and never contains the main script itself.
#[derive(Debug, Clone, Default)]
pub struct ActiveScript {
    pub main: FileInfo,
    /// Every manifest consulted while building the graph, in visit order.
    /// The first entry is the main script's own manifest.
    pub manifest_files: Vec<FileInfo>,
    pub deps: HashMap<PathBuf, DepScript>,
    /// When set, execution is armed by this file instead of by edits to the
    /// main script.
    pub trigger: Option<FileInfo>,
    /// Keep the trigger file on disk after it fires.
    pub keep_trigger: bool,
    /// Package base inherited from the top-level manifest.
    pub pkg_base: PathBuf,
}

impl ActiveScript {
    /// Activate `path`: record its current mtime and build the dependency
    /// graph from its manifest chain.
    pub fn activate(path: &Path) -> Self {
        let mut script = Self {
            main: FileInfo::new(path),
            ..Self::default()
        };
        script.main.refresh();
        script.rebuild();
        script
    }

    /// Rebuild the graph from the manifests on disk.
    ///
    /// Everything derived from a previous parse is dropped first, so a
    /// directive removed from the manifest (a `/triggerfile` line, say) is
    /// gone after the rebuild. The main script's recorded mtime is left
    /// untouched; callers that want a forced re-execution follow up with
    /// [`invalidate_all`](Self::invalidate_all).
    pub fn rebuild(&mut self) {
        self.manifest_files.clear();
        self.deps.clear();
        self.trigger = None;
        self.keep_trigger = false;
        self.pkg_base = PathBuf::new();

        let mut ctx = ExpandContext::top_level(self.main.path.clone());
        manifest::parse_for_script(self, &mut ctx);
        self.pkg_base = ctx.pkg_base;

        debug!(
            script = %self.main.path.display(),
            manifests = self.manifest_files.len(),
            deps = self.deps.len(),
            trigger = self.trigger.is_some(),
            "dependency graph rebuilt"
        );
    }

    pub fn has_dep(&self, path: &Path) -> Option<&DepScript> {
        self.deps.get(path)
    }

    /// Whether execution is armed by a trigger file rather than direct edits.
    pub fn trigger_based(&self) -> bool {
        self.trigger.is_some()
    }

    /// Probe each consulted manifest in visit order, updating stored mtimes
    /// as it goes, and report the first non-unchanged status.
    ///
    /// The probe deliberately writes mtimes back even when the caller is
    /// about to re-parse: the change is consumed here, so the fast follow-up
    /// tick after a re-parse does not see the same modification again.
    pub fn any_manifest_modified(&mut self) -> ModStatus {
        for manifest in &mut self.manifest_files {
            let status = manifest.modification_status(true);
            if status != ModStatus::NotModified {
                return status;
            }
        }
        ModStatus::NotModified
    }

    /// Zero the main script's and every dependency's mtime so the next tick
    /// re-executes everything. Manifest mtimes are left alone.
    pub fn invalidate_all(&mut self) {
        self.main.invalidate();
        for dep in self.deps.values_mut() {
            dep.file.invalidate();
        }
    }
}
