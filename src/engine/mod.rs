// src/engine/mod.rs

//! Script engine abstraction.
//!
//! The host application owns one scripting runtime per language; this crate
//! only ever talks to them through [`ScriptEngine`]. Engines are looked up
//! at runtime by file extension via [`EngineRegistry`], which is how a
//! `.py` dependency gets its reload snippet evaluated by the Python runtime
//! while the main script may be compiled by another language entirely.
//!
//! [`process`] provides the subprocess-backed engine the standalone host
//! binary registers; embedding hosts implement the trait over their own
//! in-process runtimes.

pub mod process;

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Error text produced by a script engine, surfaced to the host verbatim.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One scripting runtime of the host application.
pub trait ScriptEngine {
    /// Human-readable language name, used in log lines.
    fn name(&self) -> &str;

    /// Compile (and run, for top-level code) a script file.
    fn compile_file(&self, path: &Path) -> Result<(), EngineError>;

    /// Call a previously compiled function by name, with no arguments.
    fn call_func(&self, func: &str) -> Result<(), EngineError>;

    /// Evaluate a source snippet in the runtime's global scope.
    fn eval_snippet(&self, source: &str) -> Result<(), EngineError>;

    /// Whether a successful compile must be followed by a `main()` call.
    fn requires_main(&self) -> bool {
        false
    }
}

/// Runtime map from file extension to the engine that handles it.
#[derive(Default)]
pub struct EngineRegistry {
    by_ext: HashMap<String, Box<dyn ScriptEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine` for the given extension (leading dot and case are
    /// ignored). A later registration for the same extension wins.
    pub fn register(&mut self, ext: &str, engine: Box<dyn ScriptEngine>) {
        let key = normalize_ext(ext);
        debug!(ext = %key, engine = engine.name(), "registered script engine");
        self.by_ext.insert(key, engine);
    }

    pub fn find_by_extension(&self, ext: &str) -> Option<&dyn ScriptEngine> {
        self.by_ext.get(&normalize_ext(ext)).map(Box::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.by_ext.is_empty()
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
