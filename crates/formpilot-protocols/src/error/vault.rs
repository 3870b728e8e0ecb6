//! Credential vault errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    /// No installation key exists yet. Fatal to the operation, not to the
    /// process; callers must fail fast rather than degrade silently.
    #[error("Vault not initialized: installation key not found")]
    Uninitialized,

    /// Authentication tag mismatch: wrong key, corrupted data, or a
    /// nonce/ciphertext pairing that does not belong together.
    #[error("Decryption failed: integrity check did not pass")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Vault storage error: {0}")]
    Storage(String),
}
