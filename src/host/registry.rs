// src/host/registry.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The host's persistent key/value store.
///
/// In an embedding host this maps onto its own registry facility; the
/// standalone binary uses [`FileRegistry`]. Multiple host instances may race
/// on the same store; last-writer-wins is acceptable for what is kept here
/// (options and the recent-scripts list).
pub trait Registry {
    fn read_int(&self, key: &str, default: i64) -> i64;
    fn write_int(&mut self, key: &str, value: i64);

    fn read_string(&self, key: &str) -> Option<String>;
    fn write_string(&mut self, key: &str, value: &str);

    fn read_list(&self, key: &str) -> Vec<String>;
    fn write_list(&mut self, key: &str, values: &[String]);
}

/// On-disk representation of the registry: one small TOML document holding
/// typed key/value tables.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct RegistryDoc {
    #[serde(default)]
    ints: BTreeMap<String, i64>,
    #[serde(default)]
    strings: BTreeMap<String, String>,
    #[serde(default)]
    lists: BTreeMap<String, Vec<String>>,
}

/// TOML-file-backed registry for the standalone host.
///
/// The whole document is loaded once and rewritten after every mutation;
/// the values are tiny and writes only happen on user actions and option
/// changes, never inside the monitor tick.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    doc: RegistryDoc,
}

impl FileRegistry {
    /// Open (or initialize) the registry file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("parsing registry file at {:?}", path))?,
            Err(_) => RegistryDoc::default(),
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) {
        if let Err(err) = self.try_save() {
            warn!(path = ?self.path, error = %err, "failed to persist registry");
        }
    }

    fn try_save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating registry directory at {:?}", parent))?;
            }
        }
        let contents = toml::to_string(&self.doc).context("serializing registry")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing registry file at {:?}", self.path))?;
        Ok(())
    }
}

impl Registry for FileRegistry {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.doc.ints.get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) {
        self.doc.ints.insert(key.to_string(), value);
        self.save();
    }

    fn read_string(&self, key: &str) -> Option<String> {
        self.doc.strings.get(key).cloned()
    }

    fn write_string(&mut self, key: &str, value: &str) {
        self.doc.strings.insert(key.to_string(), value.to_string());
        self.save();
    }

    fn read_list(&self, key: &str) -> Vec<String> {
        self.doc.lists.get(key).cloned().unwrap_or_default()
    }

    fn write_list(&mut self, key: &str, values: &[String]) {
        self.doc.lists.insert(key.to_string(), values.to_vec());
        self.save();
    }
}

/// In-memory registry; state dies with the process.
#[derive(Debug, Default)]
pub struct MemRegistry {
    doc: RegistryDoc,
}

impl MemRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for MemRegistry {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.doc.ints.get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) {
        self.doc.ints.insert(key.to_string(), value);
    }

    fn read_string(&self, key: &str) -> Option<String> {
        self.doc.strings.get(key).cloned()
    }

    fn write_string(&mut self, key: &str, value: &str) {
        self.doc.strings.insert(key.to_string(), value.to_string());
    }

    fn read_list(&self, key: &str) -> Vec<String> {
        self.doc.lists.get(key).cloned().unwrap_or_default()
    }

    fn write_list(&mut self, key: &str, values: &[String]) {
        self.doc.lists.insert(key.to_string(), values.to_vec());
    }
}
