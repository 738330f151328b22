//! Event recognition boundary.
//!
//! An external service reads an entry and may propose a future event. Its
//! answer is post-processed here before anything reaches the dataset:
//!
//! - `timeProvided: true` keeps the proposed timestamp
//! - `timeProvided: false` pins the event to 09:00 local time on its date
//! - `timeProvided` absent leaves the time unconfirmed; the caller must
//!   supply one with [`EventProposal::with_time`] before it becomes an event

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VistaError};
use crate::storage::AppEvent;

/// Hour used when the entry names a day but no time.
pub const DEFAULT_EVENT_HOUR: u32 = 9;

/// Request sent to the recognition service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecognitionRequest {
    pub entry_content: String,
    /// Reference "now" (ISO-8601) for resolving words like "tomorrow"
    pub current_date: String,
}

impl EventRecognitionRequest {
    pub fn new(entry_content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            entry_content: entry_content.into(),
            current_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Raw service answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecognition {
    pub has_event: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<RecognizedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedEvent {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_provided: Option<bool>,
}

/// Anything that can look for an event in entry text.
pub trait EventRecognizer {
    /// Analyse one entry.
    ///
    /// # Errors
    ///
    /// Implementations report service failures as `VistaError::Collaborator`.
    /// Callers do not retry.
    fn recognize(&self, request: &EventRecognitionRequest) -> Result<EventRecognition>;
}

/// When a proposed event happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    Scheduled(DateTime<Utc>),
    /// Only the day is known; a time must be chosen explicitly.
    Unconfirmed(NaiveDate),
}

/// A post-processed proposal, ready to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProposal {
    pub title: String,
    pub time: EventTime,
}

impl EventRecognition {
    /// Apply the time rules in the local time zone.
    pub fn into_proposal(self) -> Result<Option<EventProposal>> {
        self.into_proposal_in(&Local)
    }

    /// Apply the time rules in `tz`. Returns `None` when no event was found.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::Collaborator` if the proposed date does not parse.
    pub fn into_proposal_in<Tz: TimeZone>(self, tz: &Tz) -> Result<Option<EventProposal>> {
        let event = match (self.has_event, self.event) {
            (true, Some(event)) => event,
            _ => return Ok(None),
        };
        let parsed = parse_proposed(&event.date, tz).ok_or_else(|| {
            VistaError::Collaborator(format!("Unrecognised event date: {}", event.date))
        })?;

        let time = match event.time_provided {
            Some(true) => EventTime::Scheduled(parsed),
            Some(false) => {
                let day = parsed.with_timezone(tz).date_naive();
                EventTime::Scheduled(at_local(tz, day, default_event_time())?)
            }
            None => EventTime::Unconfirmed(parsed.with_timezone(tz).date_naive()),
        };

        Ok(Some(EventProposal {
            title: event.title,
            time,
        }))
    }
}

impl EventProposal {
    /// Set the time of day (local time zone), keeping the proposed day.
    pub fn with_time(self, time: NaiveTime) -> Result<Self> {
        self.with_time_in(time, &Local)
    }

    pub fn with_time_in<Tz: TimeZone>(self, time: NaiveTime, tz: &Tz) -> Result<Self> {
        let day = match self.time {
            EventTime::Scheduled(at) => at.with_timezone(tz).date_naive(),
            EventTime::Unconfirmed(day) => day,
        };
        Ok(Self {
            title: self.title,
            time: EventTime::Scheduled(at_local(tz, day, time)?),
        })
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.time, EventTime::Scheduled(_))
    }

    /// Turn the proposal into a storable event with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `VistaError::InvalidInput` while the time is unconfirmed.
    pub fn into_app_event(self) -> Result<AppEvent> {
        match self.time {
            EventTime::Scheduled(at) => Ok(AppEvent {
                id: Uuid::new_v4().to_string(),
                title: self.title,
                date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
            EventTime::Unconfirmed(day) => Err(VistaError::InvalidInput(format!(
                "Event on {} needs a confirmed time",
                day
            ))),
        }
    }
}

/// Ask `recognizer` about one entry and post-process the answer locally.
pub fn recognize_event<R: EventRecognizer + ?Sized>(
    recognizer: &R,
    entry_content: &str,
    now: DateTime<Utc>,
) -> Result<Option<EventProposal>> {
    let request = EventRecognitionRequest::new(entry_content, now);
    let answer = recognizer.recognize(&request).inspect_err(|e| {
        tracing::warn!(error = %e, "event recognition failed");
    })?;
    answer.into_proposal()
}

fn default_event_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_EVENT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Timestamps with an offset are taken as-is; bare date-times and bare
/// dates are read as wall-clock time in `tz`.
fn parse_proposed<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|day| day.and_time(NaiveTime::MIN))
        })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

fn at_local<Tz: TimeZone>(tz: &Tz, day: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| {
            VistaError::InvalidInput(format!("{} {} does not exist in the local time zone", day, time))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn answer(date: &str, time_provided: Option<bool>) -> EventRecognition {
        EventRecognition {
            has_event: true,
            event: Some(RecognizedEvent {
                title: "Dentist".to_string(),
                date: date.to_string(),
                time_provided,
            }),
        }
    }

    fn utc(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let parsed: EventRecognition = serde_json::from_str(
            r#"{"hasEvent":true,"event":{"title":"Dentist","date":"2030-01-05T15:00:00Z","timeProvided":true}}"#,
        )
        .unwrap();
        assert_eq!(parsed, answer("2030-01-05T15:00:00Z", Some(true)));

        let request = EventRecognitionRequest::new("hi", utc("2030-01-01T00:00:00Z"));
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"entryContent":"hi","currentDate":"2030-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_no_event_is_none() {
        let none = EventRecognition {
            has_event: false,
            event: None,
        };
        assert_eq!(none.into_proposal_in(&Utc).unwrap(), None);
    }

    #[test]
    fn test_time_provided_keeps_timestamp() {
        let proposal = answer("2030-01-05T15:00:00Z", Some(true))
            .into_proposal_in(&Utc)
            .unwrap()
            .unwrap();
        assert_eq!(proposal.time, EventTime::Scheduled(utc("2030-01-05T15:00:00Z")));
    }

    #[test]
    fn test_no_time_forces_nine_local() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let proposal = answer("2030-01-05T15:00:00+02:00", Some(false))
            .into_proposal_in(&tz)
            .unwrap()
            .unwrap();

        assert_eq!(proposal.time, EventTime::Scheduled(utc("2030-01-05T07:00:00Z")));
        let event = proposal.into_app_event().unwrap();
        assert_eq!(event.date, "2030-01-05T07:00:00.000Z");
    }

    #[test]
    fn test_absent_flag_needs_confirmation() {
        let proposal = answer("2030-01-05", None)
            .into_proposal_in(&Utc)
            .unwrap()
            .unwrap();
        assert!(!proposal.is_confirmed());
        assert!(matches!(
            proposal.clone().into_app_event(),
            Err(VistaError::InvalidInput(_))
        ));

        let confirmed = proposal
            .with_time_in(NaiveTime::from_hms_opt(14, 30, 0).unwrap(), &Utc)
            .unwrap();
        assert_eq!(confirmed.into_app_event().unwrap().date, "2030-01-05T14:30:00.000Z");
    }

    #[test]
    fn test_unparseable_date_is_collaborator_error() {
        let err = answer("next tuesday", Some(true))
            .into_proposal_in(&Utc)
            .unwrap_err();
        assert!(matches!(err, VistaError::Collaborator(_)));
    }

    struct Failing;

    impl EventRecognizer for Failing {
        fn recognize(&self, _request: &EventRecognitionRequest) -> Result<EventRecognition> {
            Err(VistaError::Collaborator("service unavailable".to_string()))
        }
    }

    #[test]
    fn test_recognizer_failure_is_surfaced() {
        let err = recognize_event(&Failing, "dentist tomorrow", Utc::now()).unwrap_err();
        assert!(matches!(err, VistaError::Collaborator(ref m) if m == "service unavailable"));
    }
}
