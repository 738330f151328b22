//! Per-installation key derivation salt.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, VistaError};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Random salt mixed into every key derivation.
///
/// Not secret, but it must never change while ciphertext derived from it
/// exists: a different salt yields a different key and the data no longer opens.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Draw a fresh salt from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Encode as standard padded base64 (the persisted slot form).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Decode the persisted slot form.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::InvalidInput` if the text is not base64 or does not
    /// decode to exactly 16 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| VistaError::InvalidInput(format!("Salt is not valid base64: {}", e)))?;
        let bytes: [u8; SALT_LEN] = decoded.try_into().map_err(|raw: Vec<u8>| {
            VistaError::InvalidInput(format!(
                "Salt must be {} bytes (got {})",
                SALT_LEN,
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&self.to_base64()).finish()
    }
}
