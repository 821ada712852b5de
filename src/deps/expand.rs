// src/deps/expand.rs

//! `$token$` expansion for manifest paths and reload snippets.
//!
//! Recognized tokens:
//!
//! | token        | expands to                                                    |
//! |--------------|---------------------------------------------------------------|
//! | `basename`   | basename of the current script, without extension             |
//! | `env:NAME`   | the `NAME` environment variable, empty when unset             |
//! | `pkgbase`    | the context's package base path                               |
//! | `pkgmodname` | script path relative to the package base, dotted, no extension |
//!
//! Expansion is a single pass: replacement text is never re-scanned. An
//! unknown token expands to its raw inner text with the dollar signs
//! dropped, an observable quirk that existing manifests rely on.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::trace;

/// Transient state carried through manifest parsing and token expansion.
#[derive(Debug, Clone)]
pub struct ExpandContext {
    /// The script the expansion is relative to (`$basename$`, `$pkgmodname$`).
    pub script_file: PathBuf,
    /// Whether this context belongs to the top-level (main) script. Only the
    /// top-level manifest may set `/pkgbase`, `/reload` and `/triggerfile`.
    pub top_level: bool,
    /// Directory of the manifest currently being parsed; relative dep paths
    /// resolve against it.
    pub base_dir: PathBuf,
    /// Ambient package base from `/pkgbase`, empty when none was declared.
    pub pkg_base: PathBuf,
    /// Ambient reload snippet from `/reload`, applied to subsequent dep lines.
    pub reload_cmd: String,
}

impl ExpandContext {
    /// Fresh context for parsing the main script's manifest chain.
    pub fn top_level(script_file: impl Into<PathBuf>) -> Self {
        Self {
            script_file: script_file.into(),
            top_level: true,
            base_dir: PathBuf::new(),
            pkg_base: PathBuf::new(),
            reload_cmd: String::new(),
        }
    }

    /// Context for expanding a dependency's reload snippet at execution time.
    pub fn for_reload(script_file: impl Into<PathBuf>, pkg_base: impl Into<PathBuf>) -> Self {
        Self {
            script_file: script_file.into(),
            top_level: false,
            base_dir: PathBuf::new(),
            pkg_base: pkg_base.into(),
            reload_cmd: String::new(),
        }
    }
}

fn expander() -> &'static Regex {
    static EXPANDER: OnceLock<Regex> = OnceLock::new();
    EXPANDER.get_or_init(|| Regex::new(r"\$(.+?)\$").expect("expander regex"))
}

/// Expand every `$token$` occurrence in `input` against `ctx`.
pub fn expand_tokens(input: &str, ctx: &ExpandContext) -> String {
    expander()
        .replace_all(input, |caps: &Captures<'_>| -> String {
            let token = &caps[1];
            match token {
                "basename" => super::paths::basename(&ctx.script_file),
                "pkgbase" => ctx.pkg_base.to_string_lossy().into_owned(),
                "pkgmodname" => pkg_module_name(&ctx.script_file, &ctx.pkg_base),
                _ => {
                    if let Some(name) = token.strip_prefix("env:") {
                        std::env::var(name).unwrap_or_default()
                    } else {
                        trace!(token, "unknown expansion token");
                        token.to_string()
                    }
                }
            }
        })
        .into_owned()
}

/// Dotted module name of `script` relative to `pkg_base`.
///
/// `/t/pkg` + `/t/pkg/sub/mod.py` gives `sub.mod`. Empty when no package
/// base was declared or the script lives outside it.
fn pkg_module_name(script: &Path, pkg_base: &Path) -> String {
    if pkg_base.as_os_str().is_empty() {
        return String::new();
    }
    let Ok(rel) = script.strip_prefix(pkg_base) else {
        return String::new();
    };

    let mut name = rel
        .to_string_lossy()
        .replace(MAIN_SEPARATOR, ".")
        .replace('/', ".");
    if let Some(idx) = name.rfind('.') {
        name.truncate(idx);
    }
    name
}
