//! AES-256-GCM encrypt/decrypt over the installation key.

use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use tracing::debug;

use formpilot_config::LocalStore;
use formpilot_protocols::{EncryptedSecret, VaultError};

const NONCE_LEN: usize = 12;

/// Device-local credential vault.
///
/// The key is re-read from the store on every operation; encryption and
/// decryption on the same device therefore always use the same 256-bit
/// key. If no key was ever installed, both operations fail fast with
/// [`VaultError::Uninitialized`].
pub struct CredentialVault {
    store: Arc<LocalStore>,
}

impl CredentialVault {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    fn cipher(&self) -> Result<Aes256Gcm, VaultError> {
        let key_bytes = self.store.vault_key().ok_or(VaultError::Uninitialized)?;
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Aes256Gcm::new(key))
    }

    /// Seal a secret under a fresh random nonce.
    pub fn encrypt(&self, secret: &str) -> Result<EncryptedSecret, VaultError> {
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, secret.as_bytes())
            .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;
        debug!("sealed {} plaintext bytes", secret.len());
        Ok(EncryptedSecret {
            data: ciphertext,
            iv: nonce.to_vec(),
        })
    }

    /// Open a sealed secret. Any mismatch between key, nonce, and
    /// ciphertext fails the integrity check.
    pub fn decrypt(&self, enc: &EncryptedSecret) -> Result<String, VaultError> {
        let cipher = self.cipher()?;
        if enc.iv.len() != NONCE_LEN {
            return Err(VaultError::DecryptionFailed);
        }
        let nonce = Nonce::from_slice(&enc.iv);
        let plaintext = cipher
            .decrypt(nonce, enc.data.as_ref())
            .map_err(|_| VaultError::DecryptionFailed)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailed)
    }
}
