// src/host/recent.rs

use std::path::Path;

use tracing::debug;

use crate::host::registry::Registry;

/// Hard cap on the persisted recent-scripts list.
pub const MAX_RECENT_SCRIPTS: usize = 512;

const KEY_RECENT_SCRIPTS: &str = "RecentScripts";

/// Most-recently-used list of script paths, persisted in the host registry.
///
/// Entries are kept even when the file no longer exists (scripts on
/// temporarily unmounted volumes should not fall out of the list), but the
/// chooser only displays entries that currently stat successfully.
#[derive(Debug, Default)]
pub struct RecentList {
    entries: Vec<String>,
}

impl RecentList {
    pub fn load(registry: &dyn Registry) -> Self {
        let mut entries = registry.read_list(KEY_RECENT_SCRIPTS);
        entries.truncate(MAX_RECENT_SCRIPTS);
        Self { entries }
    }

    /// Move `path` to the front, deduplicating and enforcing the cap.
    pub fn push(&mut self, path: &str, registry: &mut dyn Registry) {
        self.entries.retain(|entry| entry != path);
        self.entries.insert(0, path.to_string());
        self.entries.truncate(MAX_RECENT_SCRIPTS);
        debug!(path, total = self.entries.len(), "recent script recorded");
        registry.write_list(KEY_RECENT_SCRIPTS, &self.entries);
    }

    pub fn remove(&mut self, path: &str, registry: &mut dyn Registry) {
        self.entries.retain(|entry| entry != path);
        registry.write_list(KEY_RECENT_SCRIPTS, &self.entries);
    }

    /// All entries, most recent first.
    pub fn all(&self) -> &[String] {
        &self.entries
    }

    /// Entries that currently exist on disk, i.e. what the chooser displays.
    pub fn visible(&self) -> Vec<&Path> {
        self.entries
            .iter()
            .map(Path::new)
            .filter(|path| path.exists())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
