// src/watch/monitor.rs

//! The monitor: a cooperative tick that decides what changed and what to do
//! about it.
//!
//! Everything runs on the host's main thread; the host timer calls
//! [`tick`] and reschedules with whatever delay it returns. The arm flag
//! lives in [`MonitorGate`] so the executor can pause the monitor for the
//! duration of an engine call and restore the prior state afterwards.
//! Without that pause, the executed script's own file writes would re-fire
//! the monitor mid-execution.

use std::cell::Cell;
use std::fs;

use tracing::{debug, info};

use crate::deps::ActiveScript;
use crate::engine::EngineRegistry;
use crate::exec;
use crate::host::{Host, Options};
use crate::watch::ModStatus;

/// Delay returned after a manifest re-parse so the fresh graph is acted on
/// promptly instead of waiting out a full interval.
const REPARSE_FOLLOWUP_MS: u64 = 1;

/// The monitor's arm flag.
///
/// Interior-mutable so the executor can hold a pause guard while the rest of
/// the engine state is mutably borrowed elsewhere. Single-threaded by
/// design; this is a `Cell`, not an atomic.
#[derive(Debug, Default)]
pub struct MonitorGate {
    armed: Cell<bool>,
}

impl MonitorGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm or disarm the monitor, returning the prior state.
    pub fn activate(&self, armed: bool) -> bool {
        self.armed.replace(armed)
    }

    pub fn is_active(&self) -> bool {
        self.armed.get()
    }

    /// Pause the monitor until the guard drops, then restore the prior
    /// state. Restoration happens on every exit path, error or not.
    pub fn pause(&self) -> PauseGuard<'_> {
        PauseGuard {
            gate: self,
            prior: self.activate(false),
        }
    }
}

/// Scoped monitor pause; see [`MonitorGate::pause`].
#[derive(Debug)]
pub struct PauseGuard<'a> {
    gate: &'a MonitorGate,
    prior: bool,
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.gate.armed.set(self.prior);
    }
}

/// One monitor tick. Returns the delay until the next tick, in milliseconds.
///
/// The priority ladder, top to bottom:
///
/// 1. Disarmed or no active script: do nothing.
/// 2. Trigger mode: wait for the trigger file; when it fires, consume it and
///    force the main script through the rest of the ladder.
/// 3. A modified manifest rebuilds the whole graph, invalidates every mtime
///    and reschedules at 1 ms; a vanished manifest falls back to watching
///    only the main script.
/// 4. Modified dependencies run their reload snippets; a reload failure
///    aborts the tick before the main script is touched.
/// 5. The main script: gone means deactivate; modified (or any dep changed)
///    means execute.
pub fn tick(
    gate: &MonitorGate,
    active: &mut Option<ActiveScript>,
    options: &Options,
    engines: &EngineRegistry,
    host: &dyn Host,
) -> u64 {
    let interval = options.effective_interval_ms();

    if !gate.is_active() {
        return interval;
    }
    let Some(script) = active.as_mut() else {
        return interval;
    };

    if let Some(trigger) = script.trigger.as_mut() {
        if trigger.modification_status(true) != ModStatus::Modified {
            return interval;
        }
        debug!(trigger = %trigger.path.display(), "trigger file fired");

        if !script.keep_trigger {
            // Best effort: a trigger we cannot delete simply fires again
            // when its mtime next changes.
            let _ = fs::remove_file(&trigger.path);
        }

        // Execute the main script even though its bytes did not change.
        script.main.invalidate();
    }

    match script.any_manifest_modified() {
        ModStatus::Modified => {
            info!(script = %script.main.path.display(), "manifest changed; rebuilding graph");
            script.rebuild();
            script.invalidate_all();
            host.refresh_scripts_view();
            return REPARSE_FOLLOWUP_MS;
        }
        ModStatus::NotFound if !script.deps.is_empty() => {
            info!(script = %script.main.path.display(), "manifest gone; watching main script only");
            script.deps.clear();
        }
        _ => {}
    }

    let mut dep_changed = false;
    for dep in script.deps.values_mut() {
        if dep.file.modification_status(true) != ModStatus::Modified {
            continue;
        }
        debug!(dep = %dep.file.path.display(), "dependency modified");
        dep_changed = true;

        if dep.has_reload_directive() {
            if let Err(err) = exec::run_reload_directive(dep, engines) {
                host.msg(&format!("warning: {err}"));
                // Retry the whole ladder next tick; the main script is not
                // re-executed on a half-reloaded state.
                return interval;
            }
        }
    }

    let main_status = script.main.modification_status(true);
    if main_status == ModStatus::NotFound {
        host.msg(&format!(
            "active script '{}' no longer exists",
            script.main.path.display()
        ));
        gate.activate(false);
        *active = None;
        return interval;
    }

    if dep_changed || main_status == ModStatus::Modified {
        exec::execute(gate, script, options, engines, host);
    }

    interval
}
