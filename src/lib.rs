// src/lib.rs

pub mod cli;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod host;
pub mod logging;
pub mod plugin;
pub mod watch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::engine::process::ProcessEngine;
use crate::engine::EngineRegistry;
use crate::host::{ConsoleHost, FileRegistry, Options, Registry};
use crate::plugin::QScripts;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the file-backed registry (options + recent scripts)
/// - one subprocess engine per `--engine EXT=CMD` mapping
/// - the plugin owner
/// - the cooperative timer loop with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let registry: Box<dyn Registry> =
        Box::new(FileRegistry::open(PathBuf::from(&args.registry))?);

    let mut engines = EngineRegistry::new();
    for mapping in &args.engine {
        let (ext, command) = parse_engine_mapping(mapping)?;
        engines.register(ext, Box::new(ProcessEngine::new(ext, command)));
    }
    if engines.is_empty() {
        return Err(anyhow!(
            "no script engines registered; pass at least one --engine EXT=CMD"
        ));
    }

    let mut plugin = QScripts::new(registry, Box::new(ConsoleHost), engines);

    if args.interval.is_some() || args.show_filename {
        let mut options: Options = plugin.options().clone();
        if let Some(interval) = args.interval {
            options.interval_ms = interval;
        }
        options.show_filename |= args.show_filename;
        plugin.set_options(options);
    }

    let first_run_ok = plugin.activate_script(Path::new(&args.script))?;

    if args.once {
        return if first_run_ok {
            Ok(())
        } else {
            Err(anyhow!("script execution failed"))
        };
    }

    info!(
        script = %args.script,
        interval_ms = plugin.options().effective_interval_ms(),
        "monitoring; press Ctrl-C to stop"
    );

    loop {
        let delay = plugin.tick();
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(delay)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping monitor");
                break;
            }
        }
        if !plugin.has_active_script() {
            // The main script vanished; the monitor already disarmed itself.
            break;
        }
    }

    Ok(())
}

/// Split an `EXT=CMD` engine mapping.
fn parse_engine_mapping(mapping: &str) -> Result<(&str, &str)> {
    mapping
        .split_once('=')
        .map(|(ext, command)| (ext.trim(), command.trim()))
        .filter(|(ext, command)| !ext.is_empty() && !command.is_empty())
        .ok_or_else(|| anyhow!("invalid --engine mapping '{mapping}' (expected EXT=CMD)"))
}
