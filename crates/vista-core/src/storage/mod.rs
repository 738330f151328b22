//! Storage abstraction for Vista.
//!
//! The dataset types live here alongside the slot persistence seam. Nothing
//! in this module knows about keys; slot values are opaque text.

pub mod file;
pub mod memory;
pub mod traits;
pub mod types;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;
pub use traits::{replace_slots, SlotStore};
pub use types::{parse_iso, AppEvent, Dataset, DiaryEntry, Slot};
