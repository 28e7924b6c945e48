// src/errors.rs

//! Typed errors for the failure classes the rest of the crate needs to tell
//! apart. Everything else propagates as `anyhow::Error` with context.

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Fatal configuration problems.
///
/// These abort startup with a distinct exit status before any process or
/// watcher is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file at {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing TOML config from {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("watch root {0:?} does not exist or is not a directory")]
    MissingWatchRoot(PathBuf),
}

/// The worker executable could not be located or launched.
///
/// Signals a configuration problem, not a transient failure: the supervisor
/// stays idle instead of retrying, and the operator fixes the config.
#[derive(Debug, Error)]
#[error("spawning worker '{program}'")]
pub struct SpawnError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}
