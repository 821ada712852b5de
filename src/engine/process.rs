// src/engine/process.rs

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::engine::{EngineError, ScriptEngine};

/// Engine adapter that runs an external interpreter as a subprocess.
///
/// This is what the standalone host binary registers for each
/// `--engine EXT=CMD` mapping: `compile_file` runs `CMD <script>` and
/// `eval_snippet` pipes the snippet to `CMD` on stdin. An embedding host
/// with an in-process runtime does not use this type; the subprocess hop is
/// a property of the standalone host, not of the monitor.
pub struct ProcessEngine {
    name: String,
    command: Vec<String>,
}

impl ProcessEngine {
    /// `command` is an interpreter invocation, e.g. `"python3"` or
    /// `"python3 -u"`; it is split on whitespace.
    pub fn new(name: impl Into<String>, command: &str) -> Self {
        Self {
            name: name.into(),
            command: command.split_whitespace().map(str::to_string).collect(),
        }
    }

    fn base_command(&self) -> Result<Command, EngineError> {
        let program = self
            .command
            .first()
            .ok_or_else(|| EngineError::new("empty interpreter command"))?;
        let mut cmd = Command::new(program);
        cmd.args(&self.command[1..]);
        Ok(cmd)
    }
}

impl ScriptEngine for ProcessEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile_file(&self, path: &Path) -> Result<(), EngineError> {
        info!(engine = %self.name, script = %path.display(), "running interpreter");

        let status = self
            .base_command()?
            .arg(path)
            .status()
            .map_err(|err| EngineError::new(format!("failed to spawn interpreter: {err}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(EngineError::new(format!(
                "interpreter exited with {status}"
            )))
        }
    }

    fn call_func(&self, func: &str) -> Result<(), EngineError> {
        // A fresh interpreter process has no compiled state to call into.
        debug!(engine = %self.name, func, "call_func is a no-op for subprocess engines");
        Ok(())
    }

    fn eval_snippet(&self, source: &str) -> Result<(), EngineError> {
        debug!(engine = %self.name, snippet = source, "evaluating snippet via stdin");

        let mut child = self
            .base_command()?
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|err| EngineError::new(format!("failed to spawn interpreter: {err}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|err| EngineError::new(format!("failed to write snippet: {err}")))?;
        }

        let status = child
            .wait()
            .map_err(|err| EngineError::new(format!("failed to wait for interpreter: {err}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(EngineError::new(format!(
                "interpreter exited with {status}"
            )))
        }
    }
}
