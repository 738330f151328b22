//! In-process slot store.

use std::collections::HashMap;

use super::traits::SlotStore;
use super::types::Slot;
use crate::error::Result;

/// Slot store backed by a `HashMap`, for tests and for hosts that persist
/// the slot strings themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: HashMap<Slot, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every slot, for byte-for-byte comparisons.
    pub fn snapshot(&self) -> HashMap<Slot, String> {
        self.slots.clone()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<()> {
        self.slots.insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: Slot) -> Result<()> {
        self.slots.remove(&slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let mut store = MemorySlotStore::new();
        assert_eq!(store.read(Slot::Salt).unwrap(), None);

        store.write(Slot::Salt, "abc").unwrap();
        store.write(Slot::Salt, "def").unwrap();
        assert_eq!(store.read(Slot::Salt).unwrap().as_deref(), Some("def"));
        assert!(store.contains(Slot::Salt).unwrap());

        store.remove(Slot::Salt).unwrap();
        store.remove(Slot::Salt).unwrap();
        assert!(!store.contains(Slot::Salt).unwrap());
    }
}
