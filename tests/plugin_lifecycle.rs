// tests/plugin_lifecycle.rs

mod common;

use std::error::Error;
use std::rc::Rc;

use qscripts::engine::EngineRegistry;
use qscripts::host::{MemRegistry, Options};
use qscripts::plugin::{QScripts, VERB_ACTIVATE_MONITOR, VERB_DEACTIVATE_MONITOR, VERB_EXECUTE_LAST};
use tempfile::TempDir;

use common::{registry_with_engine, touch, write_file, EngineState, HostState, RecordingHost};

type TestResult = Result<(), Box<dyn Error>>;

fn plugin_fixture() -> (QScripts, Rc<EngineState>, Rc<HostState>) {
    let (engines, engine_state) = registry_with_engine("py", false);
    let (host, host_state) = RecordingHost::new();
    let plugin = QScripts::new(Box::new(MemRegistry::new()), Box::new(host), engines);
    (plugin, engine_state, host_state)
}

#[test]
fn activation_executes_and_arms_the_monitor() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, engine_state, _host_state) = plugin_fixture();
    let ok = plugin.activate_script(&script)?;

    assert!(ok);
    assert_eq!(engine_state.compile_count(), 1);
    assert!(plugin.is_monitor_active());
    assert!(plugin.has_active_script());
    assert_eq!(plugin.recent().len(), 1);
    assert_eq!(plugin.options().selected_script, script.to_string_lossy());
    Ok(())
}

#[test]
fn activation_with_failing_script_still_arms_the_monitor() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, engine_state, _host_state) = plugin_fixture();
    engine_state.fail_compile.set(true);
    let ok = plugin.activate_script(&script)?;

    assert!(!ok);
    assert!(plugin.is_monitor_active());

    // The selected-script option is only persisted on a successful run.
    assert!(plugin.options().selected_script.is_empty());

    // The user's next save is still picked up.
    engine_state.fail_compile.set(false);
    touch(&script, "print('fixed')\n");
    plugin.tick();
    assert_eq!(engine_state.compile_count(), 2);
    Ok(())
}

#[test]
fn ticks_via_the_plugin_reexecute_on_change() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, engine_state, _host_state) = plugin_fixture();
    plugin.activate_script(&script)?;

    let delay = plugin.tick();
    assert_eq!(delay, plugin.options().effective_interval_ms());
    assert_eq!(engine_state.compile_count(), 1);

    touch(&script, "print('a2')\n");
    plugin.tick();
    assert_eq!(engine_state.compile_count(), 2);
    Ok(())
}

#[test]
fn deactivation_clears_the_selection() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, engine_state, _host_state) = plugin_fixture();
    plugin.activate_script(&script)?;
    plugin.deactivate();

    assert!(!plugin.is_monitor_active());
    assert!(!plugin.has_active_script());

    touch(&script, "print('a2')\n");
    plugin.tick();
    assert_eq!(engine_state.compile_count(), 1);
    Ok(())
}

#[test]
fn verbs_arm_disarm_and_reexecute() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, engine_state, host_state) = plugin_fixture();
    plugin.activate_script(&script)?;

    plugin.run(VERB_DEACTIVATE_MONITOR);
    assert!(!plugin.is_monitor_active());

    plugin.run(VERB_ACTIVATE_MONITOR);
    assert!(plugin.is_monitor_active());

    plugin.run(VERB_EXECUTE_LAST);
    assert_eq!(engine_state.compile_count(), 2);
    assert!(host_state.refreshes.get() >= 3);
    Ok(())
}

#[test]
fn set_options_applies_the_interval_floor_and_persists() -> TestResult {
    let (mut plugin, _engine_state, _host_state) = plugin_fixture();

    let mut options: Options = plugin.options().clone();
    options.interval_ms = 10;
    plugin.set_options(options);

    assert_eq!(plugin.options().interval_ms, 300);
    Ok(())
}

#[test]
fn execute_file_runs_without_activating() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("b.py");
    write_file(&script, "print('b')\n");

    let (mut plugin, engine_state, _host_state) = plugin_fixture();
    let ok = plugin.execute_file(&script);

    assert!(ok);
    assert_eq!(engine_state.compile_count(), 1);
    assert!(!plugin.has_active_script());
    assert!(!plugin.is_monitor_active());
    Ok(())
}

#[test]
fn forgetting_the_active_script_deactivates_it() -> TestResult {
    let tmp = TempDir::new()?;
    let script = tmp.path().join("a.py");
    write_file(&script, "print('a')\n");

    let (mut plugin, _engine_state, _host_state) = plugin_fixture();
    plugin.activate_script(&script)?;

    let active_path = plugin.active_script_path().unwrap().to_path_buf();
    plugin.forget_script(&active_path);

    assert!(!plugin.has_active_script());
    assert!(plugin.recent().is_empty());
    Ok(())
}
