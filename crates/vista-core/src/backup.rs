//! Portable backup documents.
//!
//! A backup carries the persisted slot values verbatim:
//!
//! ```json
//! { "salt": "<base64>", "data": "{\"iv\":..,\"data\":..}", "events": "{..}" }
//! ```
//!
//! Export and import never touch a key, so they work whether or not a vault
//! session is unlocked. Whether the ciphertext decrypts is only discovered
//! on the next unlock.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{EncryptedBlob, Salt};
use crate::error::{Result, VistaError};
use crate::fs::write_atomic;
use crate::storage::{replace_slots, Slot, SlotStore};

/// Transport aggregate of the three slots. Never holds plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDocument {
    /// Base64 salt, exactly as stored
    pub salt: String,

    /// Entries blob slot text
    pub data: String,

    /// Events blob slot text, absent in backups taken before events existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,
}

impl BackupDocument {
    /// Parse a backup document.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::MalformedBackup` if the text is not JSON or a
    /// required field is missing or not a string.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VistaError::MalformedBackup(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural validation: the salt decodes to 16 bytes and every blob is a
    /// well-formed `{iv, data}` document. Says nothing about decryptability.
    pub fn validate(&self) -> Result<()> {
        Salt::from_base64(&self.salt)
            .map_err(|e| VistaError::MalformedBackup(format!("salt: {}", e)))?;
        EncryptedBlob::from_json(&self.data)
            .map_err(|e| VistaError::MalformedBackup(format!("data: {}", e)))?;
        if let Some(events) = &self.events {
            EncryptedBlob::from_json(events)
                .map_err(|e| VistaError::MalformedBackup(format!("events: {}", e)))?;
        }
        Ok(())
    }
}

/// Read the persisted slots into a backup document.
///
/// # Errors
///
/// Returns `VistaError::NotFound` if there is no salt or no entries blob to export.
pub fn export_backup<S: SlotStore + ?Sized>(store: &S) -> Result<BackupDocument> {
    let salt = store
        .read(Slot::Salt)?
        .ok_or_else(|| VistaError::NotFound("No salt stored; nothing to export".to_string()))?;
    let data = store.read(Slot::Entries)?.ok_or_else(|| {
        VistaError::NotFound("No journal data stored; nothing to export".to_string())
    })?;
    let events = store.read(Slot::Events)?;

    tracing::info!(has_events = events.is_some(), "exported backup");
    Ok(BackupDocument { salt, data, events })
}

/// Replace the persisted slots with the document's values.
///
/// Destructive and unconditional; callers confirm with the user first. The
/// document is validated before any slot is touched, and a storage failure
/// part way through restores the previous slot values.
pub fn import_backup<S: SlotStore + ?Sized>(store: &mut S, doc: &BackupDocument) -> Result<()> {
    doc.validate()?;

    replace_slots(
        store,
        &[
            (Slot::Salt, Some(doc.salt.as_str())),
            (Slot::Entries, Some(doc.data.as_str())),
            (Slot::Events, doc.events.as_deref()),
        ],
    )?;

    tracing::info!(has_events = doc.events.is_some(), "imported backup");
    Ok(())
}

/// Read and parse a backup file.
pub fn read_backup_file(path: &Path) -> Result<BackupDocument> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| VistaError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    BackupDocument::from_json(&text)
}

/// Write a backup file atomically.
pub fn write_backup_file(path: &Path, doc: &BackupDocument) -> Result<()> {
    let text = doc.to_json_pretty()?;
    write_atomic(path, text.as_bytes())
        .map_err(|e| VistaError::Storage(format!("Failed to write {}: {}", path.display(), e)))
}
