//! Error taxonomy for the FormPilot engine.
//!
//! One module per domain. Cryptography and transport failures propagate to
//! callers as explicit results; DOM-injection failures are absorbed by the
//! injector and only surface through logging.

mod context;
mod page;
mod provider;
mod vault;

pub use context::ContextError;
pub use page::PageError;
pub use provider::ProviderError;
pub use vault::VaultError;
