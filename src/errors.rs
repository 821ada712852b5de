// src/errors.rs

//! Crate-wide error types.
//!
//! Plumbing code (registry I/O, CLI startup) uses `anyhow` directly; the
//! execution path uses [`ScriptError`] so callers can branch on the failure
//! class while still surfacing engine error text verbatim.

pub use anyhow::{Error, Result};

use std::path::PathBuf;

use thiserror::Error;

/// Failure classes of script execution and dependency reloading.
///
/// None of these are fatal: the monitor stays armed (except for a vanished
/// main script, which clears the active selection) and retries on the next
/// file change.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file disappeared between selection and execution.
    #[error("script file '{}' not found", .0.display())]
    NotFound(PathBuf),

    /// No script engine is registered for the file's extension.
    #[error("unknown script language for '{}'", .0.display())]
    NoEngine(PathBuf),

    /// The engine rejected the file; message is the engine's text verbatim.
    #[error("failed to compile '{path}': {message}", path = .path.display())]
    Compile { path: PathBuf, message: String },

    /// A function call into the compiled script failed.
    #[error("failed to call {func}() in '{path}': {message}", path = .path.display())]
    Call {
        path: PathBuf,
        func: String,
        message: String,
    },

    /// A dependency's reload snippet failed to evaluate.
    #[error("failed to reload '{path}': {message}", path = .path.display())]
    Reload { path: PathBuf, message: String },
}
