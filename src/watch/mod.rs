// src/watch/mod.rs

//! File monitoring.
//!
//! Modification detection is deliberately mtime-based polling: cheap,
//! cooperative, and exactly as granular as an editor save loop needs. The
//! module is responsible for:
//! - Tracking per-file mtimes ([`fileinfo`]).
//! - The periodic tick that turns filesystem changes into reloads and
//!   re-executions ([`monitor`]).
//!
//! It does **not** execute anything itself; execution is delegated to
//! [`crate::exec`] with the monitor paused.

pub mod fileinfo;
pub mod monitor;

pub use fileinfo::{probe_mtime, FileInfo, ModStatus};
pub use monitor::{tick, MonitorGate, PauseGuard};
