use serde::{Deserialize, Serialize};

/// Start or end of an event as the Calendar API encodes it.
///
/// Timed events carry `dateTime` (RFC 3339 with offset), all-day events carry
/// `date` (`YYYY-MM-DD`). The strings are kept raw so that a malformed value
/// only affects the one event that carries it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: &str) -> Self {
        Self {
            date_time: Some(date_time.to_string()),
            ..Default::default()
        }
    }

    pub fn all_day(date: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    /// The `dateTime` value, treating an empty string as absent
    pub fn date_time(&self) -> Option<&str> {
        self.date_time.as_deref().filter(|s| !s.is_empty())
    }

    /// The `date` value, treating an empty string as absent
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|s| !s.is_empty())
    }

    /// True when there is no time-of-day component
    pub fn is_all_day(&self) -> bool {
        self.date_time().is_none()
    }
}

/// Calendar event as returned by `events.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

impl CalendarEvent {
    /// Event with `dateTime` bounds
    pub fn timed(summary: &str, start: &str, end: &str) -> Self {
        Self {
            summary: summary.to_string(),
            start: EventTime::timed(start),
            end: EventTime::timed(end),
            ..Default::default()
        }
    }

    /// Event with date-only bounds; `end` is exclusive as in the API
    pub fn all_day(summary: &str, start: &str, end: &str) -> Self {
        Self {
            summary: summary.to_string(),
            start: EventTime::all_day(start),
            end: EventTime::all_day(end),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color_id: &str) -> Self {
        self.color_id = Some(color_id.to_string());
        self
    }

    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }
}

/// One page of an `events.list` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
