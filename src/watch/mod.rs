// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - Normalizing configured watch targets into subscription roots plus a
//!   path-membership filter.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Forwarding qualifying change events to the debounce scheduler.
//!
//! It does **not** know about the worker process; it only turns filesystem
//! changes into restart triggers.

pub mod filter;
pub mod watcher;

pub use filter::{build_watch_plan, ChangeFilter, WatchPlan, WatchRoot};
pub use watcher::{spawn_watcher, WatcherHandle};
