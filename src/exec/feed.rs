// src/exec/feed.rs

//! Scripted stdin delivery and output draining for the worker process.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tokio::time::sleep;
use tracing::{debug, info};

/// Write each input line to the worker's stdin, one per `delay`, then close
/// the stream so the worker sees EOF after the last line.
///
/// Lines are delivered in configured order; a newline is appended to each.
pub async fn feed_inputs(
    mut stdin: ChildStdin,
    inputs: &[String],
    delay: Duration,
) -> Result<()> {
    for line in inputs {
        stdin
            .write_all(line.as_bytes())
            .await
            .with_context(|| format!("writing input line '{line}' to worker stdin"))?;
        stdin
            .write_all(b"\n")
            .await
            .context("writing newline to worker stdin")?;
        stdin.flush().await.context("flushing worker stdin")?;
        info!(line = %line, "delivered input line to worker");
        sleep(delay).await;
    }

    stdin.shutdown().await.context("closing worker stdin")?;
    debug!("worker stdin closed after last input line");
    Ok(())
}

/// Consume the worker's stdout and stderr on background tasks so OS buffers
/// never fill; lines are logged at debug.
pub fn drain_output(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("worker stdout: {line}");
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("worker stderr: {line}");
            }
        });
    }
}
