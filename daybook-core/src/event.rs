//! Calendar event types.
//!
//! `EventSummary` is the list-view projection returned by day listings;
//! `Event` is the full record the store persists.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Per-user event identifier. Unique only within its owner's namespace.
pub type EventId = u64;

/// The basic, list-view form of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Unset until the event has been persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub name: String,
    pub beginning: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventSummary {
    /// A summary is valid once it has been persisted and carries a name.
    pub fn is_valid(&self) -> bool {
        self.id.is_some() && !self.name.is_empty()
    }

    /// The calendar day whose bucket holds this event.
    pub fn bucket_date(&self) -> NaiveDate {
        self.beginning.date()
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidEvent("event name is empty".into()));
        }
        if self.end < self.beginning {
            return Err(StoreError::InvalidEvent(format!(
                "event '{}' ends before it begins",
                self.name
            )));
        }
        Ok(())
    }
}

/// Events order by beginning, then end, then name.
impl Ord for EventSummary {
    fn cmp(&self, other: &Self) -> Ordering {
        self.beginning
            .cmp(&other.beginning)
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for EventSummary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A calendar event with all of its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub summary: EventSummary,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub description: String,
}

impl Event {
    pub fn new(name: impl Into<String>, beginning: NaiveDateTime, end: NaiveDateTime) -> Self {
        Event {
            summary: EventSummary {
                id: None,
                name: name.into(),
                beginning,
                end,
            },
            place: String::new(),
            description: String::new(),
        }
    }

    pub fn id(&self) -> Option<EventId> {
        self.summary.id
    }

    pub fn bucket_date(&self) -> NaiveDate {
        self.summary.bucket_date()
    }

    /// Copy of this event with the identifier cleared, so saving it
    /// allocates a fresh one.
    pub fn unsaved(&self) -> Event {
        let mut event = self.clone();
        event.summary.id = None;
        event
    }
}
