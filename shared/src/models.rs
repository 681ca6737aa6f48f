//! Shared data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One ledger entry within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amounts: Option<i64>,
}

impl Event {
    pub fn new(name: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_type: event_type.into(),
            fare: None,
            amounts: None,
        }
    }
}

/// One calendar day and its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEvent {
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
    #[serde(default)]
    pub working_day: bool,
}

/// A user's whole event history, stored as one document.
pub type Timeline = Vec<DateEvent>;

/// Per-user pricing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitInformation {
    pub unit_price: i64,
    pub last_modified: DateTime<Utc>,
}

/// `{"status": "..."}` style response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse<'a> {
    pub status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<&'a str>,
}

impl StatusResponse<'static> {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            access_token: None,
        }
    }

    pub fn error() -> Self {
        Self {
            status: "error",
            access_token: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Event>>::deserialize(deserializer)?.unwrap_or_default())
}
