// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [worker]
/// runtime = "python"
/// script = "bot/main.py"
/// inputs = ["123456:bot-token", "yes"]
///
/// [watch]
/// mode = "explicit-set"
/// paths = ["data/flag.txt", "conf/replies.txt"]
/// debounce_secs = 15
/// restart_delay_secs = 1
///
/// [notify]
/// api_url = "https://api.example.org/sendMessage"
/// chat_id = "-1001234"
/// bot_name = "marketbot"
/// ```
///
/// The `[notify]` section is optional; without it, notifications are
/// disabled. Everything else is required or has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Worker command and scripted inputs from `[worker]`.
    pub worker: WorkerSection,

    /// Watch targets and restart timing from `[watch]`.
    pub watch: WatchSection,

    /// Notification endpoint and templates from `[notify]`.
    #[serde(default)]
    pub notify: Option<NotifySection>,
}

/// `[worker]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSection {
    /// Interpreter running the worker script.
    pub runtime: WorkerRuntime,

    /// Path to the worker script; relative paths are resolved against the
    /// current working directory.
    pub script: PathBuf,

    /// Extra arguments appended after the script path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Ordered lines written to the worker's stdin after warm-up.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Whether `inputs` are fed at all.
    #[serde(default = "default_use_inputs")]
    pub use_inputs: bool,

    /// Seconds to wait after spawn before the first input line, so the
    /// worker has time to initialize.
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,

    /// Milliseconds between consecutive input lines.
    #[serde(default = "default_input_delay_ms")]
    pub input_delay_ms: u64,
}

/// Worker interpreter, from `runtime = "python" | "node"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRuntime {
    Python,
    Node,
}

impl WorkerRuntime {
    /// Interpreter executable name for the current platform.
    pub fn program(self) -> &'static str {
        match self {
            // The Windows installer registers plain `python`; unix-likes
            // ship `python3`.
            WorkerRuntime::Python => {
                if cfg!(windows) {
                    "python"
                } else {
                    "python3"
                }
            }
            WorkerRuntime::Node => "node",
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Which filtering policy applies to change events.
    pub mode: WatchMode,

    /// Watch targets. Exactly one directory for `whole-tree`, exactly one
    /// file for `single-file`, one or more files for `explicit-set`.
    pub paths: Vec<PathBuf>,

    /// Quiet period that must elapse after the last qualifying change
    /// before a restart fires. Zero restarts immediately on every event.
    #[serde(default)]
    pub debounce_secs: u64,

    /// Delay between a restart trigger firing and the stop/start cycle.
    #[serde(default)]
    pub restart_delay_secs: u64,
}

/// Filtering policy for change events.
///
/// - `whole-tree`: any file change anywhere under the configured directory.
/// - `single-file`: only a change to one specific tracked file.
/// - `explicit-set`: a list of tracked files, possibly in different
///   directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchMode {
    WholeTree,
    SingleFile,
    ExplicitSet,
}

/// `[notify]` section. Credentials and message templates for the external
/// messaging endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    /// Endpoint receiving `{"chat_id": ..., "text": ...}` POSTs.
    pub api_url: String,

    /// Chat/channel identifier included in every message.
    pub chat_id: String,

    /// Substituted for the `{bot}` placeholder in the templates.
    pub bot_name: String,

    /// Template for the "worker started" message.
    #[serde(default = "default_started_template")]
    pub started_template: String,

    /// Template for the "worker restarting" message.
    #[serde(default = "default_restart_template")]
    pub restart_template: String,

    /// Template for error reports; also substitutes `{error}`.
    #[serde(default = "default_error_template")]
    pub error_template: String,
}

impl NotifySection {
    pub fn render_started(&self) -> String {
        self.started_template.replace("{bot}", &self.bot_name)
    }

    pub fn render_restart(&self) -> String {
        self.restart_template.replace("{bot}", &self.bot_name)
    }

    pub fn render_error(&self, detail: &str) -> String {
        self.error_template
            .replace("{bot}", &self.bot_name)
            .replace("{error}", detail)
    }
}

fn default_use_inputs() -> bool {
    true
}

fn default_warmup_secs() -> u64 {
    2
}

fn default_input_delay_ms() -> u64 {
    1000
}

fn default_started_template() -> String {
    "{bot} started".to_string()
}

fn default_restart_template() -> String {
    "{bot} restarting after file change".to_string()
}

fn default_error_template() -> String {
    "{bot} error: {error}".to_string()
}
