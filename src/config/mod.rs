// src/config/mod.rs

//! Configuration loading, validation, and path resolution.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, NotifySection, WatchMode, WatchSection, WorkerRuntime, WorkerSection,
};
pub use validate::{resolve_absolute, validate_config};
