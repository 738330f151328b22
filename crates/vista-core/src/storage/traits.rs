//! Slot store trait definition.
//!
//! The `SlotStore` trait is the persistence seam: three independent named
//! text slots, modelled on a local key-value store. The vault and the backup
//! codec only ever talk to this trait, so the medium (files, an in-process
//! map, a host-provided store) can change without touching crypto logic.

use super::types::Slot;
use crate::error::Result;

/// Key-value persistence for the vault's named slots.
///
/// Implementations must ensure:
/// - A `write` replaces the whole slot value, never appends
/// - A failed `write` leaves the previous value readable
/// - Values are stored verbatim (no re-encoding)
pub trait SlotStore {
    /// Read a slot.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if present, `Ok(None)` if the slot was never written.
    fn read(&self, slot: Slot) -> Result<Option<String>>;

    /// Replace a slot's value.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::Storage` if the medium rejects the write.
    fn write(&mut self, slot: Slot, value: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    fn remove(&mut self, slot: Slot) -> Result<()>;

    /// Check whether a slot holds a value.
    fn contains(&self, slot: Slot) -> Result<bool> {
        Ok(self.read(slot)?.is_some())
    }
}

impl<S: SlotStore + ?Sized> SlotStore for &mut S {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        (**self).read(slot)
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<()> {
        (**self).write(slot, value)
    }

    fn remove(&mut self, slot: Slot) -> Result<()> {
        (**self).remove(slot)
    }

    fn contains(&self, slot: Slot) -> Result<bool> {
        (**self).contains(slot)
    }
}

/// Apply a group of slot changes, restoring the previous values if any step fails.
///
/// `None` removes the slot. Restoration is best effort: if the medium fails
/// again while restoring, the original error is still the one returned.
pub fn replace_slots<S: SlotStore + ?Sized>(
    store: &mut S,
    changes: &[(Slot, Option<&str>)],
) -> Result<()> {
    let mut previous = Vec::with_capacity(changes.len());
    for (slot, _) in changes {
        previous.push((*slot, store.read(*slot)?));
    }

    for (applied, (slot, value)) in changes.iter().enumerate() {
        let outcome = match value {
            Some(value) => store.write(*slot, value),
            None => store.remove(*slot),
        };
        if let Err(err) = outcome {
            tracing::warn!(slot = slot.key(), "slot write failed, restoring previous values");
            for (slot, old) in previous.iter().take(applied + 1) {
                let restored = match old {
                    Some(old) => store.write(*slot, old),
                    None => store.remove(*slot),
                };
                if let Err(restore_err) = restored {
                    tracing::error!(
                        slot = slot.key(),
                        error = %restore_err,
                        "could not restore slot; store is partly rewritten"
                    );
                }
            }
            return Err(err);
        }
    }
    Ok(())
}
