//! Mood-based retrieval boundary.
//!
//! The service sees only `{date, content}` pairs, never ids. Its answer is
//! matched back onto stored entries by exact date and content.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VistaError};
use crate::storage::{Dataset, DiaryEntry};

/// An entry as the retrieval service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryExcerpt {
    pub date: String,
    pub content: String,
}

impl From<&DiaryEntry> for EntryExcerpt {
    fn from(entry: &DiaryEntry) -> Self {
        Self {
            date: entry.date.clone(),
            content: entry.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRetrievalRequest {
    pub mood_description: String,
    pub diary_entries: Vec<EntryExcerpt>,
}

impl MoodRetrievalRequest {
    /// Build a request over every entry in the dataset.
    pub fn from_dataset(mood_description: impl Into<String>, dataset: &Dataset) -> Self {
        Self {
            mood_description: mood_description.into(),
            diary_entries: dataset.entries.iter().map(EntryExcerpt::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRetrievalResponse {
    pub relevant_entries: Vec<EntryExcerpt>,
}

impl MoodRetrievalResponse {
    /// Map returned pairs onto stored entries, in the service's order.
    /// Pairs that match no stored entry are dropped.
    pub fn resolve_relevant<'a>(&self, dataset: &'a Dataset) -> Vec<&'a DiaryEntry> {
        self.relevant_entries
            .iter()
            .filter_map(|excerpt| {
                dataset
                    .entries
                    .iter()
                    .find(|entry| entry.date == excerpt.date && entry.content == excerpt.content)
            })
            .collect()
    }
}

/// Anything that can pick entries matching a mood.
pub trait MoodRetriever {
    /// # Errors
    ///
    /// Implementations report service failures as `VistaError::Collaborator`.
    fn retrieve(&self, request: &MoodRetrievalRequest) -> Result<MoodRetrievalResponse>;
}

/// Ask `retriever` for entries matching `mood`.
///
/// # Errors
///
/// Returns `VistaError::InvalidInput` for a blank mood description, and
/// passes collaborator failures through unchanged.
pub fn retrieve_by_mood<'a, R: MoodRetriever + ?Sized>(
    retriever: &R,
    mood: &str,
    dataset: &'a Dataset,
) -> Result<Vec<&'a DiaryEntry>> {
    let mood = mood.trim();
    if mood.is_empty() {
        return Err(VistaError::InvalidInput(
            "Mood description cannot be empty".to_string(),
        ));
    }

    let request = MoodRetrievalRequest::from_dataset(mood, dataset);
    let response = retriever.retrieve(&request).inspect_err(|e| {
        tracing::warn!(error = %e, "mood retrieval failed");
    })?;
    let found = response.resolve_relevant(dataset);
    tracing::debug!(
        returned = response.relevant_entries.len(),
        matched = found.len(),
        "mood retrieval resolved"
    );
    Ok(found)
}
