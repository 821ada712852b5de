// src/deps/manifest.rs

//! Sidecar manifest parsing.
//!
//! A script `foo.py` may carry a manifest named `foo.py.deps.qscripts` (or,
//! failing that, `foo.py.proj.qscripts`) next to it:
//!
//! ```text
//! # comment                      (';' and '//' also start comments)
//! /pkgbase <path>                top-level manifest only
//! /reload <snippet>              top-level only; applies to subsequent deps
//! /triggerfile [/keep] <path>    top-level only
//! <dep-script-path>              one per line, `$token$`s expanded
//! ```
//!
//! Dependency lines resolve relative to the manifest's directory and are
//! silently skipped when the file does not exist; dependencies come and go
//! while a project is being carved up. Each existing dependency is recorded
//! and then visited recursively as a non-top-level script, so nested
//! manifests contribute their own dep lines but cannot override the
//! top-level directives.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::deps::active::{ActiveScript, DepScript};
use crate::deps::expand::{expand_tokens, ExpandContext};
use crate::deps::paths;
use crate::watch::{probe_mtime, FileInfo};

/// Manifest suffixes probed next to a script, in priority order.
const MANIFEST_SUFFIXES: [&str; 2] = [".deps.qscripts", ".proj.qscripts"];

/// Parse the manifest chain for `ctx.script_file` into `active`.
///
/// Returns false when the script has no readable manifest, which is not an
/// error: most scripts are plain single files.
pub fn parse_for_script(active: &mut ActiveScript, ctx: &mut ExpandContext) -> bool {
    let mut visiting = Vec::new();
    parse_chain(active, ctx, &mut visiting)
}

fn parse_chain(
    active: &mut ActiveScript,
    ctx: &mut ExpandContext,
    visiting: &mut Vec<PathBuf>,
) -> bool {
    let Some((manifest_path, contents)) = read_manifest(&ctx.script_file) else {
        return false;
    };

    // A manifest already on the recursion stack means the chain is cyclic;
    // skip re-entry so the walk terminates. Revisits via sibling branches
    // are fine: the dep map is keyed by path and simply overwrites.
    if visiting.contains(&manifest_path) {
        debug!(manifest = %manifest_path.display(), "cyclic manifest reference skipped");
        return true;
    }
    visiting.push(manifest_path.clone());

    let mut manifest = FileInfo::new(&manifest_path);
    manifest.refresh();
    active.manifest_files.push(manifest);

    ctx.base_dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with(';')
            || line.starts_with("//")
        {
            continue;
        }

        if let Some(value) = directive_value(line, "/pkgbase") {
            if ctx.top_level {
                ctx.pkg_base = paths::make_absolute(value, &ctx.base_dir);
            }
            continue;
        }
        if let Some(value) = directive_value(line, "/reload") {
            if ctx.top_level {
                ctx.reload_cmd = value.to_string();
            }
            continue;
        }
        if let Some(value) = directive_value(line, "/triggerfile") {
            if ctx.top_level {
                let value = match directive_value(value, "/keep") {
                    Some(rest) => {
                        active.keep_trigger = true;
                        rest
                    }
                    None => value,
                };
                let expanded = expand_tokens(value, ctx);
                if !expanded.is_empty() {
                    let mut trigger =
                        FileInfo::new(paths::make_absolute(expanded, &ctx.base_dir));
                    trigger.refresh();
                    active.trigger = Some(trigger);
                }
            }
            continue;
        }

        // Anything else is an expandable path to a dependency script.
        ctx.script_file = PathBuf::from(line);
        let expanded = expand_tokens(line, ctx);
        let dep_path = paths::make_absolute(expanded, &ctx.base_dir);

        // The main script never depends on itself.
        if dep_path == active.main.path {
            trace!(path = %dep_path.display(), "manifest lists the main script; skipped");
            continue;
        }

        let Some(mtime) = probe_mtime(&dep_path) else {
            trace!(path = %dep_path.display(), "dependency does not exist; skipped");
            continue;
        };

        active.deps.insert(
            dep_path.clone(),
            DepScript {
                file: FileInfo {
                    path: dep_path.clone(),
                    mtime,
                },
                reload_cmd: ctx.reload_cmd.clone(),
                pkg_base: ctx.pkg_base.clone(),
            },
        );

        let mut sub_ctx = ctx.clone();
        sub_ctx.script_file = dep_path;
        sub_ctx.top_level = false;
        parse_chain(active, &mut sub_ctx, visiting);
    }

    visiting.pop();
    true
}

/// Probe the manifest candidates for `script` and read the first one found.
///
/// An unreadable manifest is treated the same as an absent one.
fn read_manifest(script: &Path) -> Option<(PathBuf, String)> {
    for suffix in MANIFEST_SUFFIXES {
        let mut os = script.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if let Ok(contents) = fs::read_to_string(&candidate) {
            return Some((candidate, contents));
        }
    }
    None
}

/// Split a `/directive value` line.
///
/// A directive is recognized only when the prefix is followed by end-of-line
/// or a single space; `/pkgbaseX` is a dependency path, not a directive.
fn directive_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix(' ')
    }
}
