//! Persisted state for FormPilot.
//!
//! A small JSON-backed key/value store standing in for the host's local
//! storage, plus per-call resolution of provider settings. The only
//! mutable persisted state (picker flag, saved settings) tolerates
//! last-writer-wins semantics, so no cross-process locking is attempted.

mod error;
mod settings;
mod store;

pub use error::ConfigError;
pub use settings::{Provider, Settings, DEFAULT_OLLAMA_URL};
pub use store::{keys, LocalStore};
