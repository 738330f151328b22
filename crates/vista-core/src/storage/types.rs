//! Core data types for the storage layer.
//!
//! Entries and events are plain records; the crypto layer treats the whole
//! dataset as an opaque serializable document.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named persistence slots.
///
/// The three slots are independent: the salt is written once per
/// installation, the blobs are replaced wholesale on every save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Base64 of the 16-byte installation salt
    Salt,
    /// Sealed journal entries (`{iv, data}` JSON)
    Entries,
    /// Sealed calendar events (`{iv, data}` JSON)
    Events,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Salt, Slot::Entries, Slot::Events];

    /// Stable storage key for this slot.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Salt => "verdant-vista-salt",
            Slot::Entries => "verdant-vista-data",
            Slot::Events => "verdant-vista-events",
        }
    }
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Unique identifier (UUID v4 for entries created here)
    pub id: String,

    /// Entry date (ISO-8601)
    pub date: String,

    /// Free text body
    pub content: String,
}

/// A calendar event derived from an entry or added by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEvent {
    pub id: String,
    pub title: String,
    /// Event date and time (ISO-8601)
    pub date: String,
}

/// The full plaintext dataset held in memory while a vault is unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub entries: Vec<DiaryEntry>,
    pub events: Vec<AppEvent>,
}

impl Dataset {
    pub fn new(entries: Vec<DiaryEntry>, events: Vec<AppEvent>) -> Self {
        Self { entries, events }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.events.is_empty()
    }

    /// Add an entry with a fresh id; new entries go to the front.
    pub fn add_entry(&mut self, date: impl Into<String>, content: impl Into<String>) -> &DiaryEntry {
        self.entries.insert(
            0,
            DiaryEntry {
                id: Uuid::new_v4().to_string(),
                date: date.into(),
                content: content.into(),
            },
        );
        &self.entries[0]
    }

    pub fn entry(&self, id: &str) -> Option<&DiaryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Replace the entry with the same id. Returns `false` if no entry matched.
    pub fn update_entry(&mut self, updated: DiaryEntry) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Remove an entry by id. Returns the removed entry, if any.
    pub fn delete_entry(&mut self, id: &str) -> Option<DiaryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Entries sorted newest first. Entries whose date does not parse sort last.
    pub fn entries_newest_first(&self) -> Vec<&DiaryEntry> {
        let mut sorted: Vec<&DiaryEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
        sorted
    }

    /// Case-insensitive substring search over entry content, newest first.
    pub fn search(&self, query: &str) -> Vec<&DiaryEntry> {
        let needle = query.to_lowercase();
        self.entries_newest_first()
            .into_iter()
            .filter(|entry| entry.content.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn add_event(&mut self, title: impl Into<String>, date: impl Into<String>) -> &AppEvent {
        self.events.push(AppEvent {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date: date.into(),
        });
        let last = self.events.len() - 1;
        &self.events[last]
    }

    pub fn delete_event(&mut self, id: &str) -> Option<AppEvent> {
        let index = self.events.iter().position(|event| event.id == id)?;
        Some(self.events.remove(index))
    }

    /// Events at or after `now`, soonest first. Unparseable dates are skipped.
    pub fn upcoming_events(&self, now: DateTime<Utc>) -> Vec<&AppEvent> {
        let mut upcoming: Vec<(DateTime<Utc>, &AppEvent)> = self
            .events
            .iter()
            .filter_map(|event| parse_iso(&event.date).map(|at| (at, event)))
            .filter(|(at, _)| *at >= now)
            .collect();
        upcoming.sort_by_key(|(at, _)| *at);
        upcoming.into_iter().map(|(_, event)| event).collect()
    }
}

/// Parse an ISO-8601 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_iso(a), parse_iso(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, content: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.to_string(),
            date: date.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_slot_keys_are_stable() {
        assert_eq!(Slot::Salt.key(), "verdant-vista-salt");
        assert_eq!(Slot::Entries.key(), "verdant-vista-data");
        assert_eq!(Slot::Events.key(), "verdant-vista-events");
    }

    #[test]
    fn test_add_entry_prepends_with_uuid() {
        let mut dataset = Dataset::default();
        dataset.add_entry("2024-01-01", "first");
        let id = dataset.add_entry("2024-01-02", "second").id.clone();

        assert_eq!(dataset.entries[0].content, "second");
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_update_and_delete_entry() {
        let mut dataset = Dataset::new(vec![entry("a", "2024-01-01", "old")], vec![]);

        assert!(dataset.update_entry(entry("a", "2024-01-01", "new")));
        assert_eq!(dataset.entry("a").unwrap().content, "new");
        assert!(!dataset.update_entry(entry("missing", "2024-01-01", "x")));

        assert!(dataset.delete_entry("a").is_some());
        assert!(dataset.delete_entry("a").is_none());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_entries_sorted_newest_first() {
        let dataset = Dataset::new(
            vec![
                entry("1", "2024-01-01", "a"),
                entry("2", "not a date", "b"),
                entry("3", "2024-03-01T10:00:00Z", "c"),
                entry("4", "2024-02-01", "d"),
            ],
            vec![],
        );

        let ids: Vec<&str> = dataset
            .entries_newest_first()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dataset = Dataset::new(
            vec![
                entry("1", "2024-01-01", "Walked the Dog"),
                entry("2", "2024-01-02", "rainy day"),
                entry("3", "2024-01-03", "dog park again"),
            ],
            vec![],
        );

        let hits: Vec<&str> = dataset.search("DOG").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(hits, vec!["3", "1"]);
    }

    #[test]
    fn test_upcoming_events_sorted_and_filtered() {
        let mut dataset = Dataset::default();
        dataset.add_event("past", "2020-01-01T09:00:00Z");
        dataset.add_event("later", "2030-06-01T09:00:00Z");
        dataset.add_event("sooner", "2030-01-01T09:00:00Z");
        dataset.add_event("broken", "someday");

        let now = parse_iso("2025-01-01").unwrap();
        let titles: Vec<&str> = dataset
            .upcoming_events(now)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[test]
    fn test_entry_wire_shape() {
        let json = serde_json::to_string(&entry("1", "2024-01-01", "hi")).unwrap();
        assert_eq!(json, r#"{"id":"1","date":"2024-01-01","content":"hi"}"#);
    }
}
