//! Vault session management.
//!
//! A [`Vault`] owns a slot store and, while unlocked, a [`Session`] holding
//! the derived key. The key lives exactly as long as the session: `lock`,
//! a failed unlock, an import, or dropping the vault destroys it.
//!
//! # Examples
//!
//! ```
//! use secrecy::SecretString;
//! use vista_core::storage::MemorySlotStore;
//! use vista_core::vault::Vault;
//!
//! let mut vault = Vault::new(MemorySlotStore::new());
//! let password = SecretString::from("correct-horse".to_string());
//!
//! let mut dataset = vault.unlock(&password).unwrap();
//! assert!(dataset.is_empty());
//!
//! dataset.add_entry("2024-01-01", "hi");
//! vault.save(&dataset).unwrap();
//! vault.lock();
//!
//! let reopened = vault.unlock(&password).unwrap();
//! assert_eq!(reopened.entries[0].content, "hi");
//! ```

use secrecy::{ExposeSecret, SecretString};

use crate::backup::{self, BackupDocument};
use crate::crypto::{decrypt, derive_key, encrypt, DerivedKey, EncryptedBlob, Salt};
use crate::error::{Result, VistaError};
use crate::storage::{replace_slots, AppEvent, Dataset, DiaryEntry, Slot, SlotStore};

/// Key material for one unlocked session.
pub struct Session {
    key: DerivedKey,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Where the vault is in its session lifecycle.
#[derive(Debug, Default)]
pub enum SessionState {
    /// No key held. Initial state, and the state after `lock` or an import.
    #[default]
    Locked,
    /// A key derived from the last accepted password.
    Unlocked(Session),
    /// The last unlock attempt failed; a new password is required.
    Failed,
}

/// Encrypted dataset store with a session-scoped key.
pub struct Vault<S: SlotStore> {
    store: S,
    state: SessionState,
}

impl<S: SlotStore> Vault<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Locked,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked(_))
    }

    /// Whether a salt has been persisted, i.e. a password was set before.
    ///
    /// Callers use this to choose between "unlock" and "create a password".
    pub fn has_stored_data(&self) -> Result<bool> {
        self.store.contains(Slot::Salt)
    }

    /// Derive the session key from `password` and decrypt the stored dataset.
    ///
    /// On first run (no salt and no blobs) a salt is generated and persisted
    /// and an empty dataset is returned.
    ///
    /// # Errors
    ///
    /// - `VistaError::Decryption` for a wrong password or corrupted blobs
    /// - `VistaError::MissingSalt` if blobs exist without a salt
    /// - `VistaError::InvalidInput` for an empty password
    ///
    /// Any failure leaves the vault in [`SessionState::Failed`].
    pub fn unlock(&mut self, password: &SecretString) -> Result<Dataset> {
        self.state = SessionState::Locked;
        match self.open_session(password) {
            Ok((session, dataset)) => {
                tracing::info!(
                    entries = dataset.entries.len(),
                    events = dataset.events.len(),
                    "vault unlocked"
                );
                self.state = SessionState::Unlocked(session);
                Ok(dataset)
            }
            Err(err) => {
                tracing::warn!(error = %err, "unlock failed");
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    fn open_session(&mut self, password: &SecretString) -> Result<(Session, Dataset)> {
        let entries_text = self.store.read(Slot::Entries)?;
        let events_text = self.store.read(Slot::Events)?;

        let salt = match self.store.read(Slot::Salt)? {
            Some(encoded) => Salt::from_base64(&encoded)
                .map_err(|e| VistaError::Storage(format!("Stored salt is invalid: {}", e)))?,
            None if entries_text.is_some() || events_text.is_some() => {
                return Err(VistaError::MissingSalt);
            }
            None => {
                let salt = Salt::generate();
                let key = derive_key(password.expose_secret(), &salt)?;
                self.store.write(Slot::Salt, &salt.to_base64())?;
                tracing::debug!("first run, generated and stored a new salt");
                return Ok((Session { key }, Dataset::default()));
            }
        };

        let key = derive_key(password.expose_secret(), &salt)?;
        let entries: Vec<DiaryEntry> = open_slot(&key, entries_text.as_deref())?;
        let events: Vec<AppEvent> = open_slot(&key, events_text.as_deref())?;

        Ok((Session { key }, Dataset::new(entries, events)))
    }

    /// Encrypt and persist the full dataset, replacing both blobs.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::NotUnlocked` without a live session. Storage
    /// failures leave the previous blobs in place.
    pub fn save(&mut self, dataset: &Dataset) -> Result<()> {
        let session = self.session()?;
        let entries = encrypt(&session.key, &dataset.entries)?.to_json()?;
        let events = encrypt(&session.key, &dataset.events)?.to_json()?;

        replace_slots(
            &mut self.store,
            &[
                (Slot::Entries, Some(entries.as_str())),
                (Slot::Events, Some(events.as_str())),
            ],
        )?;

        tracing::info!(
            entries = dataset.entries.len(),
            events = dataset.events.len(),
            "vault saved"
        );
        Ok(())
    }

    /// Destroy the session key.
    pub fn lock(&mut self) {
        if self.is_unlocked() {
            tracing::info!("vault locked");
        }
        self.state = SessionState::Locked;
    }

    /// Re-key the vault under a new password and a fresh salt.
    ///
    /// `dataset` is the current plaintext; it is re-encrypted in memory before
    /// any slot is written. The session continues under the new key.
    pub fn change_password(&mut self, new_password: &SecretString, dataset: &Dataset) -> Result<()> {
        self.session()?;

        let salt = Salt::generate();
        let key = derive_key(new_password.expose_secret(), &salt)?;
        let salt_text = salt.to_base64();
        let entries = encrypt(&key, &dataset.entries)?.to_json()?;
        let events = encrypt(&key, &dataset.events)?.to_json()?;

        replace_slots(
            &mut self.store,
            &[
                (Slot::Salt, Some(salt_text.as_str())),
                (Slot::Entries, Some(entries.as_str())),
                (Slot::Events, Some(events.as_str())),
            ],
        )?;

        self.state = SessionState::Unlocked(Session { key });
        tracing::info!("vault password changed");
        Ok(())
    }

    /// Export the stored slots. Works whether or not the vault is unlocked.
    pub fn export_backup(&self) -> Result<BackupDocument> {
        backup::export_backup(&self.store)
    }

    /// Replace the stored slots from a backup and lock the vault.
    ///
    /// A document that fails validation changes nothing, session included.
    /// Otherwise the session is dropped before any slot is written, since the
    /// salt may change.
    pub fn import_backup(&mut self, doc: &BackupDocument) -> Result<()> {
        doc.validate()?;
        self.state = SessionState::Locked;
        backup::import_backup(&mut self.store, doc)
    }

    fn session(&self) -> Result<&Session> {
        match &self.state {
            SessionState::Unlocked(session) => Ok(session),
            _ => Err(VistaError::NotUnlocked),
        }
    }
}

/// Decrypt an optional blob slot. An empty slot is an empty list.
fn open_slot<T>(key: &DerivedKey, text: Option<&str>) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let Some(text) = text else {
        return Ok(Vec::new());
    };
    let blob = EncryptedBlob::from_json(text).map_err(|e| {
        tracing::debug!(error = %e, "stored blob is not well formed");
        VistaError::Decryption
    })?;
    decrypt(key, &blob)
}
