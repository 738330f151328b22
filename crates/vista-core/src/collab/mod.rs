//! Interfaces to the external analysis services.
//!
//! The core owns only the request and response shapes and the rules applied
//! to answers at this boundary. How a service is reached (HTTP, a local
//! model, a test double) is up to the implementor of each trait. Failures
//! are surfaced to the caller and never retried here.

pub mod events;
pub mod mood;

pub use events::{
    recognize_event, EventProposal, EventRecognition, EventRecognitionRequest, EventRecognizer,
    EventTime, RecognizedEvent, DEFAULT_EVENT_HOUR,
};
pub use mood::{
    retrieve_by_mood, EntryExcerpt, MoodRetrievalRequest, MoodRetrievalResponse, MoodRetriever,
};
