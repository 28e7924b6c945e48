// src/notifier.rs

//! Best-effort outbound notifications.
//!
//! Lifecycle events (started / restarting / error) are rendered from the
//! configured templates and POSTed as `{"chat_id": ..., "text": ...}` JSON
//! to the messaging endpoint. Failures are logged and swallowed:
//! supervision never blocks on or fails because of a notification.

use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use crate::config::NotifySection;

/// Outbound notification sender for worker lifecycle events.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    target: Option<NotifySection>,
}

impl Notifier {
    pub fn new(target: Option<NotifySection>) -> Self {
        Self {
            client: Client::new(),
            target,
        }
    }

    /// A no-op notifier, for configs without a `[notify]` section.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Announce that the worker was started.
    pub async fn worker_started(&self) {
        match &self.target {
            Some(target) => self.post(target, target.render_started()).await,
            None => debug!("notifications disabled; skipping started message"),
        }
    }

    /// Announce that a restart cycle is beginning.
    pub async fn worker_restarting(&self) {
        match &self.target {
            Some(target) => self.post(target, target.render_restart()).await,
            None => debug!("notifications disabled; skipping restart message"),
        }
    }

    /// Report an error with its detail string.
    pub async fn worker_error(&self, detail: &str) {
        match &self.target {
            Some(target) => self.post(target, target.render_error(detail)).await,
            None => debug!("notifications disabled; skipping error message"),
        }
    }

    async fn post(&self, target: &NotifySection, text: String) {
        let body = json!({
            "chat_id": target.chat_id,
            "text": text,
        });

        match self.client.post(&target.api_url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(status = %resp.status(), "notification delivered");
            }
            Ok(resp) => {
                error!(status = %resp.status(), "notification endpoint returned non-success");
            }
            Err(err) => {
                error!(error = %err, "failed to deliver notification");
            }
        }
    }
}
