// src/cli.rs

//! CLI argument parsing for the standalone host binary using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `qscripts`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "qscripts",
    version,
    about = "Watch a script and its declared dependencies, re-running it on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Script file to activate and monitor.
    #[arg(value_name = "SCRIPT")]
    pub script: String,

    /// Monitor interval in milliseconds (floored at 300).
    #[arg(long, value_name = "MS")]
    pub interval: Option<i64>,

    /// Map a file extension to an interpreter, e.g. `py=python3`.
    ///
    /// May be given multiple times. The interpreter is run with the script
    /// path as its argument; reload snippets are piped to it on stdin.
    #[arg(long = "engine", value_name = "EXT=CMD")]
    pub engine: Vec<String>,

    /// Execute once and exit instead of monitoring.
    #[arg(long)]
    pub once: bool,

    /// Announce the script name on each execution.
    #[arg(long)]
    pub show_filename: bool,

    /// Path of the TOML registry file (options + recent scripts).
    #[arg(long, value_name = "PATH", default_value = ".qscripts/registry.toml")]
    pub registry: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `QSCRIPTS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
