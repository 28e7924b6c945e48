// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchbot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchbot",
    version,
    about = "Supervise a worker process and restart it when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Watchbot.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Watchbot.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHBOT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append-only file receiving timestamped error-level log lines.
    #[arg(long, value_name = "PATH", default_value = "watchbot.log")]
    pub error_log: String,

    /// Parse + validate, print the effective supervision plan, but don't
    /// start the worker or the watcher.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
