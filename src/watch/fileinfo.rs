// src/watch/fileinfo.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::trace;

/// Outcome of probing a watched file against its last recorded mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModStatus {
    /// The file no longer exists (or never did).
    NotFound,
    /// The file exists and its mtime matches the recorded one.
    NotModified,
    /// The file exists with a different mtime than recorded.
    Modified,
}

/// A watched file plus the mtime it had when last probed.
///
/// `mtime == 0` means "unknown": the next probe of an existing file reports
/// [`ModStatus::Modified`], which is how callers force a re-execution. The
/// stored mtime only changes through [`refresh`](FileInfo::refresh),
/// [`modification_status`](FileInfo::modification_status) (with `update`) and
/// [`invalidate`](FileInfo::invalidate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub mtime: u64,
}

/// Read a file's mtime as nanoseconds since the epoch.
///
/// Returns `None` when the file cannot be stat'ed.
pub fn probe_mtime(path: &Path) -> Option<u64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let nanos = modified.duration_since(UNIX_EPOCH).ok()?.as_nanos();
    Some(nanos as u64)
}

impl FileInfo {
    /// A file reference with an unknown mtime.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mtime: 0,
        }
    }

    /// Probe the filesystem and store the current mtime.
    ///
    /// Returns false (and records an unknown mtime) when the file is missing.
    pub fn refresh(&mut self) -> bool {
        match probe_mtime(&self.path) {
            Some(mtime) => {
                self.mtime = mtime;
                true
            }
            None => {
                self.mtime = 0;
                false
            }
        }
    }

    /// Compare the file's current mtime against the recorded one.
    ///
    /// With `update` set, the recorded mtime is advanced to the probed value
    /// (or zeroed when the file is gone), so a modification is reported once
    /// per change rather than on every subsequent probe.
    pub fn modification_status(&mut self, update: bool) -> ModStatus {
        let Some(cur_mtime) = probe_mtime(&self.path) else {
            if update {
                self.mtime = 0;
            }
            return ModStatus::NotFound;
        };

        if cur_mtime == self.mtime {
            return ModStatus::NotModified;
        }

        trace!(path = %self.path.display(), "file modified");
        if update {
            self.mtime = cur_mtime;
        }
        ModStatus::Modified
    }

    /// Forget the recorded mtime so the next probe reports a modification.
    pub fn invalidate(&mut self) {
        self.mtime = 0;
    }
}
