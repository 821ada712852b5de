// src/host/mod.rs

//! The host application surface.
//!
//! Everything the engine needs from its embedding host goes through the
//! [`Host`] trait: output-window messages, chooser refreshes and the
//! undo-wrapped execution hook. [`registry`] models the host's persistent
//! key/value store, with [`options`] and [`recent`] layered on top of it.
//!
//! [`ConsoleHost`] is the trivial implementation the standalone binary uses.

pub mod options;
pub mod recent;
pub mod registry;

use std::path::Path;

pub use options::Options;
pub use recent::RecentList;
pub use registry::{FileRegistry, MemRegistry, Registry};

/// What the embedding host provides to the engine.
///
/// User-facing text goes through [`msg`](Host::msg): that is the host's
/// output window, not the crate's diagnostic log.
pub trait Host {
    /// Write a line to the host's output window.
    fn msg(&self, text: &str);

    /// Clear the host's output window.
    fn clear_output(&self) {}

    /// Repaint the script chooser (active script and dependency markers).
    fn refresh_scripts_view(&self) {}

    /// Ask the host to run the active script wrapped in its undo framework.
    ///
    /// The host runs the action asynchronously; returns whether the request
    /// was queued. Hosts without an undo framework return false.
    fn queue_undoable_execution(&self) -> bool {
        false
    }

    /// Present the script chooser over the given entries.
    fn show_chooser(&self, entries: &[&Path]) {
        let _ = entries;
    }
}

/// Minimal host for the standalone binary: the "output window" is stdout.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn msg(&self, text: &str) {
        println!("{text}");
    }

    fn show_chooser(&self, entries: &[&Path]) {
        for (idx, entry) in entries.iter().enumerate() {
            println!("{idx:>3}  {}", entry.display());
        }
    }
}
