//! Error types for Vista core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for Vista operations.
pub type Result<T> = std::result::Result<T, VistaError>;

/// Core error type for Vista operations.
#[derive(Debug, Error)]
pub enum VistaError {
    /// The key derivation primitive rejected its parameters
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    /// Authentication tag mismatch: wrong password or tampered ciphertext.
    ///
    /// Deliberately carries no detail so the two causes stay indistinguishable.
    #[error("Wrong password or corrupted data")]
    Decryption,

    /// A save or re-key was attempted without a live session key
    #[error("Vault is not unlocked")]
    NotUnlocked,

    /// A backup document failed structural validation
    #[error("Malformed backup: {0}")]
    MalformedBackup(String),

    /// Ciphertext is stored but the salt slot is empty
    #[error("Stored data has no salt; it cannot be unlocked on this device")]
    MissingSalt,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// An external analysis service failed
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl From<std::io::Error> for VistaError {
    fn from(err: std::io::Error) -> Self {
        VistaError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for VistaError {
    fn from(err: serde_json::Error) -> Self {
        VistaError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_message_does_not_leak_cause() {
        let message = VistaError::Decryption.to_string();
        assert_eq!(message, "Wrong password or corrupted data");
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: VistaError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, VistaError::Storage(ref m) if m.contains("disk full")));
    }
}
