use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use watchbot::config::{WatchMode, WatchSection};
use watchbot::errors::ConfigError;
use watchbot::watch::build_watch_plan;

type TestResult = Result<(), Box<dyn Error>>;

fn section(mode: WatchMode, paths: Vec<PathBuf>) -> WatchSection {
    WatchSection {
        mode,
        paths,
        debounce_secs: 0,
        restart_delay_secs: 0,
    }
}

#[test]
fn whole_tree_admits_any_file_under_root() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("sub"))?;

    let plan = build_watch_plan(&section(
        WatchMode::WholeTree,
        vec![dir.path().to_path_buf()],
    ))?;

    assert_eq!(plan.roots.len(), 1);
    assert!(plan.roots[0].recursive);

    let root = plan.roots[0].dir.clone();
    assert!(plan.filter.qualifies(&root.join("a.txt")));
    assert!(plan.filter.qualifies(&root.join("sub").join("b.txt")));
    assert!(!plan.filter.qualifies(&PathBuf::from("/elsewhere/c.txt")));
    Ok(())
}

#[test]
fn single_file_matches_exact_path_only() -> TestResult {
    let dir = TempDir::new()?;
    let data = dir.path().join("data");
    fs::create_dir(&data)?;

    let plan = build_watch_plan(&section(
        WatchMode::SingleFile,
        vec![data.join("flag.txt")],
    ))?;

    assert_eq!(plan.roots.len(), 1);
    assert!(!plan.roots[0].recursive);

    let watched_dir = plan.roots[0].dir.clone();
    assert!(plan.filter.qualifies(&watched_dir.join("flag.txt")));
    assert!(!plan.filter.qualifies(&watched_dir.join("other.txt")));
    Ok(())
}

#[test]
fn single_file_target_may_not_exist_yet() -> TestResult {
    let dir = TempDir::new()?;

    // Creation events qualify, so only the parent directory must exist.
    let plan = build_watch_plan(&section(
        WatchMode::SingleFile,
        vec![dir.path().join("flag.txt")],
    ))?;

    let watched_dir = plan.roots[0].dir.clone();
    assert!(plan.filter.qualifies(&watched_dir.join("flag.txt")));
    Ok(())
}

#[test]
fn explicit_set_subscribes_one_root_per_distinct_parent() -> TestResult {
    let dir = TempDir::new()?;
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir(&a)?;
    fs::create_dir(&b)?;

    let plan = build_watch_plan(&section(
        WatchMode::ExplicitSet,
        vec![a.join("x.txt"), a.join("y.txt"), b.join("z.txt")],
    ))?;

    assert_eq!(plan.roots.len(), 2);
    assert!(plan.roots.iter().all(|root| !root.recursive));

    let a_canon = a.canonicalize()?;
    let b_canon = b.canonicalize()?;
    assert!(plan.filter.qualifies(&a_canon.join("x.txt")));
    assert!(plan.filter.qualifies(&a_canon.join("y.txt")));
    assert!(plan.filter.qualifies(&b_canon.join("z.txt")));
    assert!(!plan.filter.qualifies(&a_canon.join("untracked.txt")));
    Ok(())
}

#[test]
fn missing_watch_directory_is_rejected() -> TestResult {
    let dir = TempDir::new()?;

    let err = build_watch_plan(&section(
        WatchMode::WholeTree,
        vec![dir.path().join("no-such-dir")],
    ))
    .expect_err("missing directory must not build a plan");
    assert!(matches!(err, ConfigError::MissingWatchRoot(_)));

    let err = build_watch_plan(&section(
        WatchMode::ExplicitSet,
        vec![dir.path().join("no-such-dir").join("flag.txt")],
    ))
    .expect_err("missing parent directory must not build a plan");
    assert!(matches!(err, ConfigError::MissingWatchRoot(_)));
    Ok(())
}
