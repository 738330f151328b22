//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The derived key is the only thing that "unlocks" a vault: there is no
//! stored password hash or verifier. A wrong password silently produces a
//! different key, and only the authenticated cipher notices.

use aes_gcm::{Aes256Gcm, Key, KeyInit};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use super::salt::Salt;
use crate::error::{Result, VistaError};

/// PBKDF2 work factor. Fixed: changing it orphans every existing vault.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
const KEY_LENGTH: usize = 32;

/// A symmetric key derived from a password.
///
/// Key material is zeroized on drop and never leaves this crate as raw
/// bytes; it can only be used through the cipher module.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Build the AEAD instance for this key.
    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password and the installation salt.
///
/// Same password + salt always produces the same key. The caller owns the
/// salt lifecycle; this function never generates one.
///
/// # Errors
///
/// Returns `VistaError::InvalidInput` for an empty password and
/// `VistaError::Derivation` if the PBKDF2 primitive rejects its parameters.
///
/// # Examples
///
/// ```
/// use vista_core::crypto::{derive_key, Salt};
///
/// let salt = Salt::from_bytes([0u8; 16]);
/// let key = derive_key("correct-horse", &salt).unwrap();
/// // Use key with vista_core::crypto::encrypt / decrypt...
/// # drop(key);
/// ```
pub fn derive_key(password: &str, salt: &Salt) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(VistaError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }
    derive_with_iterations(password.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS)
}

fn derive_with_iterations(password: &[u8], salt: &[u8], rounds: u32) -> Result<DerivedKey> {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, &mut key_bytes)
        .map_err(|e| VistaError::Derivation(format!("PBKDF2 rejected parameters: {}", e)))?;
    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_salt() -> Salt {
        let mut bytes = [0u8; 16];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Salt::from_bytes(bytes)
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key("correct-horse", &test_salt()).unwrap();
        let key2 = derive_key("correct-horse", &test_salt()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("correct-horse", &test_salt()).unwrap();
        let key2 = derive_key("correct-horse", &Salt::from_bytes([9u8; 16])).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let key1 = derive_key("password-one", &test_salt()).unwrap();
        let key2 = derive_key("password-two", &test_salt()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key("", &test_salt());
        assert!(matches!(result, Err(VistaError::InvalidInput(_))));
    }

    #[test]
    fn test_pbkdf2_sha256_reference_vector() {
        // Published PBKDF2-HMAC-SHA256 vector: P="password", S="salt", c=1.
        let key = derive_with_iterations(b"password", b"salt", 1).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("correct-horse", &test_salt()).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
