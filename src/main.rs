// src/main.rs

use std::path::Path;

use watchbot::errors::ConfigError;
use watchbot::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level, Path::new(&args.error_log)) {
        eprintln!("watchbot error: {err:?}");
        std::process::exit(1);
    }

    if let Err(err) = run(args).await {
        tracing::error!("watchbot failed: {err:?}");
        std::process::exit(exit_code_for(&err));
    }
}

/// Fatal configuration problems get a distinct exit status so wrapper
/// scripts can tell them from other startup failures.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err
        .chain()
        .any(|cause| cause.downcast_ref::<ConfigError>().is_some())
    {
        2
    } else {
        1
    }
}
