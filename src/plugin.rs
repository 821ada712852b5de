// src/plugin.rs

//! The plugin owner: one struct holding options, engines, the recent-scripts
//! list and the active selection, with the entry points an embedding host
//! calls into. There are no ambient globals: the host keeps one `QScripts`
//! per plugin instance and routes its timer callback, chooser events and
//! invocation verbs here.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::deps::{paths, ActiveScript};
use crate::engine::EngineRegistry;
use crate::exec;
use crate::host::{Host, Options, RecentList, Registry};
use crate::watch::{self, FileInfo, MonitorGate};

/// Host invocation verbs, matching the host's `run(arg)` plugin entry.
pub const VERB_SHOW_CHOOSER: usize = 0;
pub const VERB_EXECUTE_LAST: usize = 1;
pub const VERB_ACTIVATE_MONITOR: usize = 2;
pub const VERB_DEACTIVATE_MONITOR: usize = 3;

/// The script-development accelerator: watch the selected script (and its
/// manifest-described dependency graph) and re-execute it on change.
pub struct QScripts {
    options: Options,
    engines: EngineRegistry,
    registry: Box<dyn Registry>,
    host: Box<dyn Host>,
    recent: RecentList,
    gate: MonitorGate,
    active: Option<ActiveScript>,
}

impl QScripts {
    /// Wire up a plugin instance, loading options and the recent-scripts
    /// list from the host registry.
    pub fn new(
        registry: Box<dyn Registry>,
        host: Box<dyn Host>,
        engines: EngineRegistry,
    ) -> Self {
        let options = Options::load(registry.as_ref());
        let recent = RecentList::load(registry.as_ref());

        Self {
            options,
            engines,
            registry,
            host,
            recent,
            gate: MonitorGate::new(),
            active: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options (the host's options dialog), persisting them and
    /// re-applying the interval floor.
    pub fn set_options(&mut self, mut options: Options) {
        options.interval_ms = options
            .interval_ms
            .max(crate::host::options::MIN_MONITOR_INTERVAL_MS);
        options.save(self.registry.as_mut());
        self.options = options;
    }

    pub fn is_monitor_active(&self) -> bool {
        self.gate.is_active()
    }

    pub fn has_active_script(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_script_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|script| script.main.path.as_path())
    }

    pub fn active_script(&self) -> Option<&ActiveScript> {
        self.active.as_ref()
    }

    pub fn recent(&self) -> &RecentList {
        &self.recent
    }

    /// Activate a script: the chooser's `enter`.
    ///
    /// Records it as most recent, builds its dependency graph, executes it,
    /// and arms the monitor. The monitor is armed even when the first
    /// execution fails, since the user's next save should still be picked up.
    pub fn activate_script(&mut self, path: &Path) -> Result<bool> {
        let cwd = env::current_dir().context("resolving current directory")?;
        let abs = paths::make_absolute(path, &cwd);

        info!(script = %abs.display(), "activating script");
        self.recent
            .push(&abs.to_string_lossy(), self.registry.as_mut());

        let mut script = ActiveScript::activate(&abs);
        let ok = exec::execute(
            &self.gate,
            &mut script,
            &self.options,
            &self.engines,
            self.host.as_ref(),
        );
        self.active = Some(script);

        if ok {
            self.options.selected_script = abs.to_string_lossy().into_owned();
            self.options.save_selected_script(self.registry.as_mut());
        }

        self.gate.activate(true);
        self.host.refresh_scripts_view();
        Ok(ok)
    }

    /// Drop the active script and disarm the monitor.
    pub fn deactivate(&mut self) {
        debug!("deactivating monitor and clearing active script");
        self.active = None;
        self.gate.activate(false);
        self.host.refresh_scripts_view();
    }

    /// Remove a script from the recent list; deactivates it if it was the
    /// active one.
    pub fn forget_script(&mut self, path: &Path) {
        self.recent
            .remove(&path.to_string_lossy(), self.registry.as_mut());
        if self.active_script_path() == Some(path) {
            self.deactivate();
        }
    }

    /// The host timer callback. Returns the next tick delay in milliseconds.
    pub fn tick(&mut self) -> u64 {
        watch::tick(
            &self.gate,
            &mut self.active,
            &self.options,
            &self.engines,
            self.host.as_ref(),
        )
    }

    /// Re-execute the last activated script without re-arming anything.
    pub fn execute_last(&mut self) -> bool {
        let Some(script) = self.active.as_mut() else {
            return false;
        };
        exec::execute_sync(
            &self.gate,
            &mut script.main,
            &self.options,
            &self.engines,
            self.host.as_ref(),
        )
    }

    /// Execute an arbitrary script once, without activating it or touching
    /// the monitor's armed state.
    pub fn execute_file(&mut self, path: &Path) -> bool {
        let mut file = FileInfo::new(path);
        exec::execute_sync(
            &self.gate,
            &mut file,
            &self.options,
            &self.engines,
            self.host.as_ref(),
        )
    }

    /// Host invocation entry point.
    pub fn run(&mut self, verb: usize) {
        match verb {
            VERB_SHOW_CHOOSER => {
                let visible = self.recent.visible();
                self.host.show_chooser(&visible);
            }
            VERB_EXECUTE_LAST => {
                self.execute_last();
            }
            VERB_ACTIVATE_MONITOR => {
                self.gate.activate(true);
                self.host.refresh_scripts_view();
            }
            VERB_DEACTIVATE_MONITOR => {
                self.gate.activate(false);
                self.host.refresh_scripts_view();
            }
            other => debug!(verb = other, "unknown invocation verb ignored"),
        }
    }

    /// Paths the chooser should mark as dependencies of the active script.
    pub fn is_dependency(&self, path: &Path) -> bool {
        self.active
            .as_ref()
            .is_some_and(|script| script.has_dep(path).is_some())
    }

    /// The previously selected script from a past session, if it still
    /// exists on disk.
    pub fn last_selected_script(&self) -> Option<PathBuf> {
        let path = PathBuf::from(&self.options.selected_script);
        (!self.options.selected_script.is_empty() && path.exists()).then_some(path)
    }
}
