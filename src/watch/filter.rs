// src/watch/filter.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::model::{WatchMode, WatchSection};
use crate::config::resolve_absolute;
use crate::errors::ConfigError;

/// A single notify subscription root derived from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub dir: PathBuf,
    pub recursive: bool,
}

/// Path-membership filter deciding which changed paths trigger a restart.
///
/// Built once at startup from the `[watch]` section; never mutated. All
/// contained paths are absolute and canonicalized so they compare equal to
/// the paths the watcher reports.
#[derive(Debug, Clone)]
pub enum ChangeFilter {
    /// Any file change anywhere under the root qualifies.
    WholeTree { root: PathBuf },

    /// Only a change to one specific tracked file qualifies; everything
    /// else in the same directory is ignored.
    SingleFile { target: PathBuf },

    /// Changes to any file in the tracked set qualify.
    ExplicitSet { targets: BTreeSet<PathBuf> },
}

impl ChangeFilter {
    /// True if a change to `path` (absolute, known not to be a directory)
    /// should trigger a restart.
    pub fn qualifies(&self, path: &Path) -> bool {
        match self {
            ChangeFilter::WholeTree { root } => path.starts_with(root),
            ChangeFilter::SingleFile { target } => path == target,
            ChangeFilter::ExplicitSet { targets } => targets.contains(path),
        }
    }
}

/// Normalized watch subscriptions plus the filter applied to their events.
#[derive(Debug, Clone)]
pub struct WatchPlan {
    pub roots: Vec<WatchRoot>,
    pub filter: ChangeFilter,
}

/// Build the normalized watch plan from the `[watch]` section.
///
/// - `whole-tree`: one recursive subscription on the configured directory.
/// - `single-file`: one shallow subscription on the file's parent directory.
/// - `explicit-set`: one shallow subscription per distinct parent
///   directory of the tracked files.
///
/// A watch directory that does not exist is a fatal configuration error;
/// tracked files themselves may be created later (creation events qualify).
pub fn build_watch_plan(watch: &WatchSection) -> Result<WatchPlan, ConfigError> {
    match watch.mode {
        WatchMode::WholeTree => {
            let root = canonical_dir(single_path(watch)?)?;
            Ok(WatchPlan {
                roots: vec![WatchRoot {
                    dir: root.clone(),
                    recursive: true,
                }],
                filter: ChangeFilter::WholeTree { root },
            })
        }
        WatchMode::SingleFile => {
            let target = normalize_file_target(single_path(watch)?)?;
            let dir = parent_dir(&target)?;
            Ok(WatchPlan {
                roots: vec![WatchRoot {
                    dir,
                    recursive: false,
                }],
                filter: ChangeFilter::SingleFile { target },
            })
        }
        WatchMode::ExplicitSet => {
            let mut targets = BTreeSet::new();
            let mut dirs = BTreeSet::new();
            for path in &watch.paths {
                let target = normalize_file_target(path)?;
                dirs.insert(parent_dir(&target)?);
                targets.insert(target);
            }
            let roots = dirs
                .into_iter()
                .map(|dir| WatchRoot {
                    dir,
                    recursive: false,
                })
                .collect();
            Ok(WatchPlan {
                roots,
                filter: ChangeFilter::ExplicitSet { targets },
            })
        }
    }
}

fn single_path(watch: &WatchSection) -> Result<&PathBuf, ConfigError> {
    match watch.paths.as_slice() {
        [path] => Ok(path),
        other => Err(ConfigError::Invalid(format!(
            "{:?} mode requires exactly one watch path (got {})",
            watch.mode,
            other.len()
        ))),
    }
}

/// Canonicalize a configured directory, failing if it does not exist.
fn canonical_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let abs = resolve_absolute(path);
    let canon = abs
        .canonicalize()
        .map_err(|_| ConfigError::MissingWatchRoot(abs))?;
    if !canon.is_dir() {
        return Err(ConfigError::MissingWatchRoot(canon));
    }
    Ok(canon)
}

/// Resolve a tracked file to canonical-parent + file-name form.
///
/// The parent directory must exist (it is what gets watched); the file
/// itself need not.
fn normalize_file_target(path: &Path) -> Result<PathBuf, ConfigError> {
    let abs = resolve_absolute(path);
    let parent = abs.parent().ok_or_else(|| {
        ConfigError::Invalid(format!("watch path {abs:?} has no parent directory"))
    })?;
    let dir = parent
        .canonicalize()
        .map_err(|_| ConfigError::MissingWatchRoot(parent.to_path_buf()))?;
    let name = abs
        .file_name()
        .ok_or_else(|| ConfigError::Invalid(format!("watch path {abs:?} has no file name")))?;
    Ok(dir.join(name))
}

fn parent_dir(target: &Path) -> Result<PathBuf, ConfigError> {
    target
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConfigError::Invalid(format!("watch target {target:?} has no parent directory"))
        })
}
