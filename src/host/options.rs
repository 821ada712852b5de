// src/host/options.rs

use crate::host::registry::Registry;

/// Floor for the monitor interval; anything lower hammers the filesystem for
/// no gain over an editor save loop.
pub const MIN_MONITOR_INTERVAL_MS: i64 = 300;

const KEY_INTERVAL: &str = "QScripts_interval";
const KEY_CLEAR_LOG: &str = "QScripts_clearlog";
const KEY_SHOW_FILENAME: &str = "QScripts_showscriptname";
const KEY_EXEC_UNLOAD: &str = "QScripts_exec_unload_func";
const KEY_WITH_UNDO: &str = "QScripts_with_undo";
const KEY_SELECTED_SCRIPT: &str = "QScripts_selected_script_name";

/// Process-wide options, persisted in the host registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Monitor tick interval in milliseconds; floored at
    /// [`MIN_MONITOR_INTERVAL_MS`].
    pub interval_ms: i64,
    /// Clear the host output window before each execution.
    pub clear_log: bool,
    /// Announce the script's file name on each execution.
    pub show_filename: bool,
    /// Call `__quick_unload_script` (best effort) before re-executing.
    pub exec_unload_hook: bool,
    /// Route executions through the host's undo framework.
    pub with_undo: bool,
    /// Absolute path of the last activated script.
    pub selected_script: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            clear_log: false,
            show_filename: false,
            exec_unload_hook: false,
            with_undo: false,
            selected_script: String::new(),
        }
    }
}

impl Options {
    /// Load options from the registry, applying the interval floor.
    pub fn load(registry: &dyn Registry) -> Self {
        let defaults = Self::default();
        let mut options = Self {
            interval_ms: registry.read_int(KEY_INTERVAL, defaults.interval_ms),
            clear_log: registry.read_int(KEY_CLEAR_LOG, 0) != 0,
            show_filename: registry.read_int(KEY_SHOW_FILENAME, 0) != 0,
            exec_unload_hook: registry.read_int(KEY_EXEC_UNLOAD, 0) != 0,
            with_undo: registry.read_int(KEY_WITH_UNDO, 0) != 0,
            selected_script: registry.read_string(KEY_SELECTED_SCRIPT).unwrap_or_default(),
        };
        options.interval_ms = options.interval_ms.max(MIN_MONITOR_INTERVAL_MS);
        options
    }

    /// Persist every option.
    pub fn save(&self, registry: &mut dyn Registry) {
        registry.write_int(KEY_INTERVAL, self.interval_ms);
        registry.write_int(KEY_CLEAR_LOG, self.clear_log as i64);
        registry.write_int(KEY_SHOW_FILENAME, self.show_filename as i64);
        registry.write_int(KEY_EXEC_UNLOAD, self.exec_unload_hook as i64);
        registry.write_int(KEY_WITH_UNDO, self.with_undo as i64);
        registry.write_string(KEY_SELECTED_SCRIPT, &self.selected_script);
    }

    /// Persist only the selected-script key. Used on activation so a crash
    /// between option edits does not lose the rest of the dialog state.
    pub fn save_selected_script(&self, registry: &mut dyn Registry) {
        registry.write_string(KEY_SELECTED_SCRIPT, &self.selected_script);
    }

    /// The effective tick interval, floored, as the monitor returns it.
    pub fn effective_interval_ms(&self) -> u64 {
        self.interval_ms.max(MIN_MONITOR_INTERVAL_MS) as u64
    }
}
