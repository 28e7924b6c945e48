// src/engine/mod.rs

//! Supervision engine: debounce scheduling and the runtime event loop.

pub mod debounce;
pub mod runtime;

pub use debounce::{spawn_debouncer, DebounceHandle};
pub use runtime::{Runtime, RuntimeOptions, SupervisorEvent, SupervisorState};
