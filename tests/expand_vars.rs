// tests/expand_vars.rs

use std::error::Error;
use std::path::Path;

use qscripts::deps::{expand_tokens, ExpandContext};

type TestResult = Result<(), Box<dyn Error>>;

fn ctx(script: &str, pkg_base: &str) -> ExpandContext {
    ExpandContext::for_reload(script, pkg_base)
}

#[test]
fn basename_expands_to_stem_of_current_script() -> TestResult {
    let ctx = ctx("/t/lib.py", "");
    assert_eq!(
        expand_tokens("import importlib; importlib.reload($basename$)", &ctx),
        "import importlib; importlib.reload(lib)"
    );
    Ok(())
}

#[test]
fn env_token_expands_to_variable_or_empty() -> TestResult {
    // set_var is process-global; pick names no other test uses.
    unsafe { std::env::set_var("QSCRIPTS_EXPAND_TEST", "value") };

    let ctx = ctx("/t/a.py", "");
    assert_eq!(expand_tokens("$env:QSCRIPTS_EXPAND_TEST$", &ctx), "value");
    assert_eq!(expand_tokens("$env:QSCRIPTS_EXPAND_UNSET$", &ctx), "");
    Ok(())
}

#[test]
fn pkgbase_expands_to_context_package_base() -> TestResult {
    let ctx = ctx("/t/pkg/mod.py", "/t/pkg");
    assert_eq!(expand_tokens("base=$pkgbase$", &ctx), "base=/t/pkg");
    Ok(())
}

#[test]
fn pkgmodname_inside_package_base() -> TestResult {
    let ctx = ctx("/t/pkg/sub/mod.py", "/t/pkg");
    assert_eq!(expand_tokens("$pkgmodname$", &ctx), "sub.mod");
    Ok(())
}

#[test]
fn pkgmodname_outside_package_base_is_empty() -> TestResult {
    let ctx = ctx("/t/other/mod.py", "/t/pkg");
    assert_eq!(expand_tokens("$pkgmodname$", &ctx), "");
    Ok(())
}

#[test]
fn pkgmodname_without_package_base_is_empty() -> TestResult {
    let ctx = ctx("/t/pkg/mod.py", "");
    assert_eq!(expand_tokens("$pkgmodname$", &ctx), "");
    Ok(())
}

#[test]
fn unknown_tokens_expand_to_their_inner_text() -> TestResult {
    let ctx = ctx("/t/a.py", "");
    assert_eq!(expand_tokens("x $mystery$ y", &ctx), "x mystery y");
    Ok(())
}

#[test]
fn strings_without_dollar_signs_pass_through_unchanged() -> TestResult {
    let ctx = ctx("/t/a.py", "");
    let plain = "no tokens here at all";
    assert_eq!(expand_tokens(plain, &ctx), plain);
    Ok(())
}

#[test]
fn multiple_tokens_expand_in_a_single_pass() -> TestResult {
    let ctx = ctx("/t/pkg/sub/mod.py", "/t/pkg");
    assert_eq!(
        expand_tokens("$basename$:$pkgmodname$", &ctx),
        "mod:sub.mod"
    );
    Ok(())
}

#[test]
fn expansion_applies_inside_manifest_dep_paths() -> TestResult {
    use qscripts::deps::ActiveScript;
    use tempfile::TempDir;

    let tmp = TempDir::new()?;
    let lib_dir = tmp.path().join("libs");
    std::fs::create_dir_all(&lib_dir)?;
    let lib = lib_dir.join("lib.py");
    std::fs::write(&lib, "x = 1\n")?;
    unsafe { std::env::set_var("QSCRIPTS_DEP_DIR", &lib_dir) };

    let script = tmp.path().join("a.py");
    std::fs::write(&script, "print('a')\n")?;
    std::fs::write(
        tmp.path().join("a.py.deps.qscripts"),
        "$env:QSCRIPTS_DEP_DIR$/lib.py\n",
    )?;

    let active = ActiveScript::activate(&script);
    assert!(active.has_dep(Path::new(&lib)).is_some());
    Ok(())
}
