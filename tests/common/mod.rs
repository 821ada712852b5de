// tests/common/mod.rs

//! Shared fixtures: a recording script engine, a recording host, and small
//! filesystem helpers for building script trees in a tempdir.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use qscripts::engine::{EngineError, EngineRegistry, ScriptEngine};
use qscripts::host::Host;

/// One call into a [`RecordingEngine`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Compile(PathBuf),
    CallFunc(String),
    Eval(String),
}

/// Shared, inspectable state of a recording engine.
#[derive(Debug, Default)]
pub struct EngineState {
    pub calls: RefCell<Vec<EngineCall>>,
    pub fail_compile: Cell<bool>,
    pub fail_call: Cell<bool>,
    pub fail_eval: Cell<bool>,
}

impl EngineState {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    pub fn compile_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, EngineCall::Compile(_)))
            .count()
    }

    pub fn eval_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, EngineCall::Eval(_)))
            .count()
    }
}

/// Script engine that records every call and fails on demand.
pub struct RecordingEngine {
    state: Rc<EngineState>,
    main_required: bool,
}

impl ScriptEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    fn compile_file(&self, path: &Path) -> Result<(), EngineError> {
        self.state
            .calls
            .borrow_mut()
            .push(EngineCall::Compile(path.to_path_buf()));
        if self.state.fail_compile.get() {
            Err(EngineError::new("compile failed"))
        } else {
            Ok(())
        }
    }

    fn call_func(&self, func: &str) -> Result<(), EngineError> {
        self.state
            .calls
            .borrow_mut()
            .push(EngineCall::CallFunc(func.to_string()));
        if self.state.fail_call.get() {
            Err(EngineError::new("call failed"))
        } else {
            Ok(())
        }
    }

    fn eval_snippet(&self, source: &str) -> Result<(), EngineError> {
        self.state
            .calls
            .borrow_mut()
            .push(EngineCall::Eval(source.to_string()));
        if self.state.fail_eval.get() {
            Err(EngineError::new("eval failed"))
        } else {
            Ok(())
        }
    }

    fn requires_main(&self) -> bool {
        self.main_required
    }
}

/// An engine registry with a single recording engine for `ext`.
pub fn registry_with_engine(ext: &str, main_required: bool) -> (EngineRegistry, Rc<EngineState>) {
    let state = Rc::new(EngineState::default());
    let mut registry = EngineRegistry::new();
    registry.register(
        ext,
        Box::new(RecordingEngine {
            state: Rc::clone(&state),
            main_required,
        }),
    );
    (registry, state)
}

/// Inspectable state of a recording host.
#[derive(Debug, Default)]
pub struct HostState {
    pub messages: RefCell<Vec<String>>,
    pub clears: Cell<usize>,
    pub refreshes: Cell<usize>,
    pub undo_queued: Cell<usize>,
}

impl HostState {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn message_containing(&self, needle: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|message| message.contains(needle))
    }
}

/// Host that records output-window traffic instead of displaying it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub state: Rc<HostState>,
}

impl RecordingHost {
    pub fn new() -> (Self, Rc<HostState>) {
        let state = Rc::new(HostState::default());
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl Host for RecordingHost {
    fn msg(&self, text: &str) {
        self.state.messages.borrow_mut().push(text.to_string());
    }

    fn clear_output(&self) {
        self.state.clears.set(self.state.clears.get() + 1);
    }

    fn refresh_scripts_view(&self) {
        self.state.refreshes.set(self.state.refreshes.get() + 1);
    }

    fn queue_undoable_execution(&self) -> bool {
        self.state.undo_queued.set(self.state.undo_queued.get() + 1);
        true
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

/// Rewrite `path` after a short pause, guaranteeing a new mtime.
pub fn touch(path: &Path, contents: &str) {
    thread::sleep(Duration::from_millis(15));
    write_file(path, contents);
}
