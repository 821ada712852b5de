// src/exec/mod.rs

//! Script execution.
//!
//! The executor drives the host's [`ScriptEngine`]s: compile the active
//! script, call `main()` where the language requires it, and evaluate
//! per-dependency reload snippets. Synchronous execution runs with the
//! monitor paused, so the executed script's own filesystem traffic cannot
//! re-trigger the tick that started it.

use tracing::{debug, warn};

use crate::deps::{expand_tokens, paths, ActiveScript, DepScript, ExpandContext};
use crate::engine::EngineRegistry;
use crate::errors::ScriptError;
use crate::host::{Host, Options};
use crate::watch::{FileInfo, MonitorGate};

/// Function called (best effort) before re-executing, so scripts can tear
/// down hooks and timers they installed on the previous run.
pub const UNLOAD_SCRIPT_FUNC: &str = "__quick_unload_script";

/// Execute the active script, honouring the `with_undo` option.
///
/// The undoable path hands the work to the host, which runs it
/// asynchronously inside its undo framework; the synchronous path runs the
/// engine inline with the monitor paused.
pub fn execute(
    gate: &MonitorGate,
    script: &mut ActiveScript,
    options: &Options,
    engines: &EngineRegistry,
    host: &dyn Host,
) -> bool {
    if options.with_undo {
        return host.queue_undoable_execution();
    }
    execute_sync(gate, &mut script.main, options, engines, host)
}

/// Execute one script file synchronously.
///
/// The monitor is paused for the duration and restored to its prior state on
/// every exit path. Failures are reported to the host's output window; the
/// return value mirrors whether the script ran to completion.
pub fn execute_sync(
    gate: &MonitorGate,
    script: &mut FileInfo,
    options: &Options,
    engines: &EngineRegistry,
    host: &dyn Host,
) -> bool {
    let _pause = gate.pause();

    match try_execute(script, options, engines, host) {
        Ok(()) => true,
        Err(err) => {
            host.msg(&err.to_string());
            false
        }
    }
}

fn try_execute(
    script: &mut FileInfo,
    options: &Options,
    engines: &EngineRegistry,
    host: &dyn Host,
) -> Result<(), ScriptError> {
    // Take the mtime before anything else: even a compile failure must not
    // make the monitor re-fire on the same bytes.
    if !script.refresh() {
        return Err(ScriptError::NotFound(script.path.clone()));
    }

    let ext = paths::extension(&script.path).unwrap_or_default();
    let engine = engines
        .find_by_extension(ext)
        .ok_or_else(|| ScriptError::NoEngine(script.path.clone()))?;

    if options.clear_log {
        host.clear_output();
    }

    if options.exec_unload_hook {
        // Best-effort cleanup; the function usually does not exist.
        if let Err(err) = engine.call_func(UNLOAD_SCRIPT_FUNC) {
            debug!(func = UNLOAD_SCRIPT_FUNC, error = %err, "unload hook failed (ignored)");
        }
    }

    if options.show_filename {
        host.msg(&format!("executing {}...", script.path.display()));
    }

    engine
        .compile_file(&script.path)
        .map_err(|err| ScriptError::Compile {
            path: script.path.clone(),
            message: err.to_string(),
        })?;

    if engine.requires_main() {
        engine.call_func("main").map_err(|err| ScriptError::Call {
            path: script.path.clone(),
            func: "main".to_string(),
            message: err.to_string(),
        })?;
    }

    Ok(())
}

/// Evaluate a dependency's reload snippet in the dep's script language.
///
/// The snippet is expanded against the dependency (its `$basename$`, its
/// package base) at evaluation time, not at parse time, so it picks up the
/// dep's current location.
pub fn run_reload_directive(
    dep: &DepScript,
    engines: &EngineRegistry,
) -> Result<(), ScriptError> {
    let path = &dep.file.path;
    let ext = paths::extension(path).unwrap_or_default();
    let engine = engines
        .find_by_extension(ext)
        .ok_or_else(|| ScriptError::NoEngine(path.clone()))?;

    let ctx = ExpandContext::for_reload(path.clone(), dep.pkg_base.clone());
    let snippet = expand_tokens(&dep.reload_cmd, &ctx);

    debug!(dep = %path.display(), snippet = %snippet, "running reload directive");
    engine
        .eval_snippet(&snippet)
        .map_err(|err| ScriptError::Reload {
            path: path.clone(),
            message: err.to_string(),
        })
        .inspect_err(|err| warn!(error = %err, "reload directive failed"))
}
