// src/deps/paths.rs

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` and fold `.` / `..` components.
///
/// Purely lexical: nothing is touched on disk and symlinks are not resolved,
/// so the same manifest line always maps to the same key in the dependency
/// map.
pub fn make_absolute(path: impl AsRef<Path>, base: &Path) -> PathBuf {
    let path = path.as_ref();
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

/// Lexically normalize a path without filesystem access.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // Never pop past a root or drive prefix.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component.as_os_str()),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Basename of a file without its final extension.
pub fn basename(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file extension, if any, without the leading dot.
pub fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
