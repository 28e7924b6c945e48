// src/config/validate.rs

use std::env;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, NotifySection, WatchMode, WatchSection, WorkerSection};
use crate::errors::ConfigError;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - the worker script path is non-empty
/// - `[watch].paths` matches the mode's arity (one root for `whole-tree`
///   and `single-file`, at least one file for `explicit-set`)
/// - every watch root directory exists
/// - notification endpoint fields are non-empty when `[notify]` is present
///
/// A failure here is fatal: the supervisor exits before any process or
/// watcher starts.
pub fn validate_config(cfg: &ConfigFile) -> Result<(), ConfigError> {
    validate_worker(&cfg.worker)?;
    validate_watch(&cfg.watch)?;
    if let Some(notify) = &cfg.notify {
        validate_notify(notify)?;
    }
    Ok(())
}

fn validate_worker(worker: &WorkerSection) -> Result<(), ConfigError> {
    if worker.script.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "[worker].script must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch(watch: &WatchSection) -> Result<(), ConfigError> {
    match watch.mode {
        WatchMode::WholeTree | WatchMode::SingleFile => {
            if watch.paths.len() != 1 {
                return Err(ConfigError::Invalid(format!(
                    "[watch].paths must contain exactly one path in {:?} mode (got {})",
                    watch.mode,
                    watch.paths.len()
                )));
            }
        }
        WatchMode::ExplicitSet => {
            if watch.paths.is_empty() {
                return Err(ConfigError::Invalid(
                    "[watch].paths must contain at least one file in explicit-set mode"
                        .to_string(),
                ));
            }
        }
    }

    for path in &watch.paths {
        let abs = resolve_absolute(path);
        let root = match watch.mode {
            WatchMode::WholeTree => abs.clone(),
            WatchMode::SingleFile | WatchMode::ExplicitSet => abs
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("watch path {abs:?} has no parent directory"))
                })?,
        };
        if !root.is_dir() {
            return Err(ConfigError::MissingWatchRoot(root));
        }
    }

    Ok(())
}

fn validate_notify(notify: &NotifySection) -> Result<(), ConfigError> {
    if notify.api_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "[notify].api_url must not be empty".to_string(),
        ));
    }
    if notify.chat_id.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "[notify].chat_id must not be empty".to_string(),
        ));
    }
    if notify.bot_name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "[notify].bot_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Resolve a possibly-relative path against the current working directory.
///
/// Best effort: if the working directory cannot be determined, the path is
/// returned unchanged.
pub fn resolve_absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
