//! Directory-backed slot store.
//!
//! Each slot is a plain text file named after its stable slot key. Writes go
//! through a temp file in the same directory and are renamed over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::SlotStore;
use super::types::Slot;
use crate::error::{Result, VistaError};
use crate::fs::write_atomic;

/// Slot store keeping one file per slot inside `root`.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    root: PathBuf,
}

impl FileSlotStore {
    /// Open (creating if needed) a slot directory.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::Storage` if the directory cannot be created or
    /// `root` exists but is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(VistaError::Storage(format!(
                "Vault path is not a directory: {}",
                root.display()
            )));
        }
        fs::create_dir_all(&root).map_err(|e| {
            VistaError::Storage(format!("Failed to create {}: {}", root.display(), e))
        })?;
        tracing::debug!(path = %root.display(), "opened slot directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `slot`.
    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        self.root.join(slot.key())
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VistaError::Storage(format!(
                "Failed to read slot {}: {}",
                slot.key(),
                e
            ))),
        }
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<()> {
        write_atomic(&self.slot_path(slot), value.as_bytes()).map_err(|e| {
            VistaError::Storage(format!("Failed to write slot {}: {}", slot.key(), e))
        })
    }

    fn remove(&mut self, slot: Slot) -> Result<()> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VistaError::Storage(format!(
                "Failed to remove slot {}: {}",
                slot.key(),
                e
            ))),
        }
    }

    fn contains(&self, slot: Slot) -> Result<bool> {
        Ok(self.slot_path(slot).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("vault");
        let store = FileSlotStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_open_rejects_file_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        let err = FileSlotStore::open(&file).unwrap_err();
        assert!(matches!(err, VistaError::Storage(_)));
    }

    #[test]
    fn test_slot_files_use_stable_keys() {
        let dir = tempdir().unwrap();
        let mut store = FileSlotStore::open(dir.path()).unwrap();

        store.write(Slot::Entries, "{\"iv\":\"a\",\"data\":\"b\"}").unwrap();
        let on_disk = fs::read_to_string(dir.path().join("verdant-vista-data")).unwrap();
        assert_eq!(on_disk, "{\"iv\":\"a\",\"data\":\"b\"}");
    }

    #[test]
    fn test_read_missing_is_none_and_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = FileSlotStore::open(dir.path()).unwrap();

        assert_eq!(store.read(Slot::Events).unwrap(), None);
        store.remove(Slot::Events).unwrap();

        store.write(Slot::Events, "v").unwrap();
        assert!(store.contains(Slot::Events).unwrap());
        store.remove(Slot::Events).unwrap();
        assert!(!store.contains(Slot::Events).unwrap());
    }
}
