//! # Vista Core
//!
//! Core library for Vista - a private journal whose entries and events never
//! leave the device unencrypted.
//!
//! This crate provides the cryptographic storage layer, the dataset model and
//! the portable backup format, independent of any user interface.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM sealing
//! - **storage**: Dataset types and the slot store trait with file and memory backends
//! - **vault**: Session-scoped key, unlock / save / lock
//! - **backup**: `{salt, data, events?}` export and import
//! - **collab**: Request/response shapes for the event and mood services

pub mod backup;
pub mod collab;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod storage;
pub mod vault;

pub use backup::BackupDocument;
pub use error::{Result, VistaError};
pub use storage::{Dataset, SlotStore};
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
