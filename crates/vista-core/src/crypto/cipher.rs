//! Authenticated encryption of serializable payloads.
//!
//! Payloads are rendered to JSON text and sealed with AES-256-GCM under a
//! fresh random 96-bit nonce per call. The persisted form of a sealed
//! payload is the slot wire document `{"iv": base64, "data": base64}`,
//! where `data` is the ciphertext with the 16-byte tag appended.

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::key::DerivedKey;
use crate::error::{Result, VistaError};

/// Nonce length in bytes (96-bit GCM nonce).
pub const IV_LEN: usize = 12;

/// One sealed dataset: the nonce it was sealed under plus ciphertext and tag.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlobWire", into = "BlobWire")]
pub struct EncryptedBlob {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

/// Slot wire form, both fields base64.
#[derive(Serialize, Deserialize)]
struct BlobWire {
    iv: String,
    data: String,
}

impl TryFrom<BlobWire> for EncryptedBlob {
    type Error = String;

    fn try_from(wire: BlobWire) -> std::result::Result<Self, Self::Error> {
        let iv = STANDARD
            .decode(&wire.iv)
            .map_err(|e| format!("iv is not valid base64: {}", e))?;
        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|raw: Vec<u8>| format!("iv must be {} bytes (got {})", IV_LEN, raw.len()))?;
        let ciphertext = STANDARD
            .decode(&wire.data)
            .map_err(|e| format!("data is not valid base64: {}", e))?;
        Ok(Self { iv, ciphertext })
    }
}

impl From<EncryptedBlob> for BlobWire {
    fn from(blob: EncryptedBlob) -> Self {
        Self {
            iv: STANDARD.encode(blob.iv),
            data: STANDARD.encode(&blob.ciphertext),
        }
    }
}

impl EncryptedBlob {
    /// Render the persisted slot text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse persisted slot text.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::Storage` if the text is not a well-formed blob.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| VistaError::Storage(format!("Invalid encrypted blob: {}", e)))
    }
}

impl std::fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedBlob")
            .field("iv", &STANDARD.encode(self.iv))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Encrypt a serializable value under `key`.
///
/// A new random nonce is drawn on every call; nonces are never derived from
/// state and never reused.
///
/// # Examples
///
/// ```
/// use vista_core::crypto::{decrypt, derive_key, encrypt, Salt};
///
/// let key = derive_key("correct-horse", &Salt::from_bytes([0u8; 16])).unwrap();
/// let blob = encrypt(&key, &vec!["hello"]).unwrap();
/// let back: Vec<String> = decrypt(&key, &blob).unwrap();
/// assert_eq!(back, vec!["hello"]);
/// ```
pub fn encrypt<T: Serialize + ?Sized>(key: &DerivedKey, plaintext: &T) -> Result<EncryptedBlob> {
    let encoded = serde_json::to_vec(plaintext)?;
    encrypt_bytes(key, &encoded)
}

/// Decrypt a blob and parse the payload back into `T`.
///
/// # Errors
///
/// Returns `VistaError::Decryption` if the tag does not verify (wrong key or
/// altered bytes) or if the authenticated payload does not parse as `T`.
/// Never returns partial data.
pub fn decrypt<T: DeserializeOwned>(key: &DerivedKey, blob: &EncryptedBlob) -> Result<T> {
    let plaintext = decrypt_bytes(key, blob)?;
    serde_json::from_slice(&plaintext).map_err(|e| {
        tracing::debug!(error = %e, "authenticated payload did not match expected shape");
        VistaError::Decryption
    })
}

fn encrypt_bytes(key: &DerivedKey, plaintext: &[u8]) -> Result<EncryptedBlob> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext)
        .map_err(|_| VistaError::Storage("Encryption failed".to_string()))?;

    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(nonce.as_slice());
    Ok(EncryptedBlob { iv, ciphertext })
}

fn decrypt_bytes(key: &DerivedKey, blob: &EncryptedBlob) -> Result<zeroize::Zeroizing<Vec<u8>>> {
    let nonce = Nonce::from_slice(&blob.iv);
    key.cipher()
        .decrypt(nonce, blob.ciphertext.as_slice())
        .map(zeroize::Zeroizing::new)
        .map_err(|_| VistaError::Decryption)
}
