// src/exec/mod.rs

//! Worker process lifecycle.

pub mod controller;
pub mod feed;

pub use controller::{ProcessController, WorkerSpec, DEFAULT_GRACE_PERIOD};
pub use feed::{drain_output, feed_inputs};
