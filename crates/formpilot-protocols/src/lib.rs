//! # FormPilot Protocols
//!
//! Shared definitions for the FormPilot engine. Contains the error
//! taxonomy, the cross-context message protocol, and the answer sentinel
//! type - no implementations.

pub mod answer;
pub mod error;
pub mod message;
pub mod secret;

pub use answer::{Answer, UNKNOWN_SENTINEL};
pub use error::{ContextError, PageError, ProviderError, VaultError};
pub use message::{Request, RequestEnvelope, Response, UNKNOWN_MESSAGE_TYPE};
pub use secret::EncryptedSecret;
