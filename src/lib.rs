// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod notifier;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::ConfigFile;
use crate::engine::{spawn_debouncer, Runtime, RuntimeOptions, SupervisorEvent};
use crate::exec::{ProcessController, WorkerSpec};
use crate::notifier::Notifier;
use crate::watch::{build_watch_plan, spawn_watcher, WatchPlan};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - notifier + process controller
/// - debounce scheduler
/// - file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let spec = WorkerSpec::from_config(&cfg.worker);
    let plan = build_watch_plan(&cfg.watch)?;

    if args.dry_run {
        print_dry_run(&cfg, &spec, &plan);
        return Ok(());
    }

    let notifier = Notifier::new(cfg.notify.clone());
    let controller = ProcessController::new(spec, notifier.clone());

    // Supervisor event channel.
    let (events_tx, events_rx) = mpsc::channel::<SupervisorEvent>(64);

    // Debounce scheduler between the watcher and the runtime.
    let debounce = spawn_debouncer(
        Duration::from_secs(cfg.watch.debounce_secs),
        events_tx.clone(),
    );

    // File watcher; the handle keeps the notify subscriptions alive until
    // the runtime returns.
    let _watcher_handle = spawn_watcher(plan, debounce)?;

    // Ctrl-C → orderly shutdown.
    {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SupervisorEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions {
        restart_delay: Duration::from_secs(cfg.watch.restart_delay_secs),
    };

    let runtime = Runtime::new(controller, notifier, options, events_rx);
    runtime.run().await
}

/// Simple dry-run output: print the effective supervision plan.
fn print_dry_run(cfg: &ConfigFile, spec: &WorkerSpec, plan: &WatchPlan) {
    println!("watchbot dry-run");
    println!("  worker: {} {:?}", spec.program, spec.args);
    println!(
        "  use_inputs: {} ({} line(s))",
        spec.use_inputs,
        spec.inputs.len()
    );
    println!(
        "  warmup: {:?}, input delay: {:?}",
        spec.warmup, spec.input_delay
    );
    println!();

    println!("  watch mode: {:?}", cfg.watch.mode);
    for root in &plan.roots {
        println!("    - {:?} (recursive: {})", root.dir, root.recursive);
    }
    println!(
        "  debounce: {}s, restart delay: {}s",
        cfg.watch.debounce_secs, cfg.watch.restart_delay_secs
    );
    println!();

    match &cfg.notify {
        Some(n) => println!("  notifications: enabled for bot '{}'", n.bot_name),
        None => println!("  notifications: disabled"),
    }
}
