//! Encrypted secret wire type.

use serde::{Deserialize, Serialize};

/// An AES-GCM ciphertext together with the nonce it was sealed under.
///
/// The nonce is drawn fresh for every encryption call and never reused for
/// a given key. Field names match the persisted wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Ciphertext bytes, authentication tag included.
    pub data: Vec<u8>,
    /// 96-bit nonce.
    pub iv: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_byte_arrays() {
        let secret = EncryptedSecret {
            data: vec![1, 2, 3],
            iv: vec![9, 8, 7],
        };
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, r#"{"data":[1,2,3],"iv":[9,8,7]}"#);
    }

    #[test]
    fn test_round_trip() {
        let secret = EncryptedSecret {
            data: vec![0; 16],
            iv: vec![0; 12],
        };
        let json = serde_json::to_string(&secret).unwrap();
        let back: EncryptedSecret = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
    }
}
