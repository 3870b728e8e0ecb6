//! Credential vault for FormPilot.
//!
//! Authenticated symmetric encryption of the stored API credential under
//! a device-local key. The key is created once at install time and never
//! leaves this crate's API surface.

mod vault;

pub use vault::CredentialVault;
