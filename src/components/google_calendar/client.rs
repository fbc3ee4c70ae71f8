use super::models::{CalendarEvent, EventsPage};
use crate::components::agenda::DisplayWindow;
use crate::error::{retrieval_error, AgendaResult};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Calendar API root
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Parameters of one `events.list` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<FixedOffset>,
    pub time_max: DateTime<FixedOffset>,
    pub show_deleted: bool,
    pub single_events: bool,
    pub order_by: &'static str,
}

impl EventQuery {
    /// Query covering `window`, with recurring events expanded and sorted by start
    pub fn for_window(calendar_id: &str, window: &DisplayWindow) -> Self {
        Self {
            calendar_id: calendar_id.to_string(),
            time_min: window.query_start,
            time_max: window.query_end,
            show_deleted: false,
            single_events: true,
            order_by: "startTime",
        }
    }

    /// Query string pairs, timestamps as RFC 3339
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeMin", self.time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("timeMax", self.time_max.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("showDeleted", self.show_deleted.to_string()),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", self.order_by.to_string()),
        ]
    }
}

/// Anything that can list calendar events for a query
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events overlapping the query range, in the order the source sorts them
    async fn list_events(&self, query: &EventQuery) -> AgendaResult<Vec<CalendarEvent>>;
}

/// Calendar v3 REST client authenticated with a bearer token
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: &str, timeout: Duration) -> AgendaResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Point the client at another API root
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn events_url(&self, query: &EventQuery, page_token: Option<&str>) -> AgendaResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| retrieval_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| {
                retrieval_error(&format!("Base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(&["calendars", query.calendar_id.as_str(), "events"]);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }

        Ok(url)
    }

    async fn fetch_page(&self, url: Url) -> AgendaResult<EventsPage> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| retrieval_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(retrieval_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| retrieval_error(&format!("Failed to parse events response: {}", e)))
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn list_events(&self, query: &EventQuery) -> AgendaResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.events_url(query, page_token.as_deref())?;
            let page = self.fetch_page(url).await?;
            debug!("Received page with {} events", page.items.len());
            events.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agenda::compute_window;
    use chrono::NaiveDate;
    use chrono_tz::Asia::Tokyo;

    fn query(calendar_id: &str) -> EventQuery {
        let window = compute_window(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), &Tokyo);
        EventQuery::for_window(calendar_id, &window)
    }

    fn client(base_url: &str) -> GoogleCalendarClient {
        GoogleCalendarClient::new("token", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query("primary").query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("timeMin", "2024-03-09T00:00:00+09:00".to_string()),
                ("timeMax", "2024-03-10T23:59:59+09:00".to_string()),
                ("showDeleted", "false".to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]
        );
    }

    #[test]
    fn test_events_url() {
        let url = client(DEFAULT_API_BASE)
            .events_url(&query("primary"), None)
            .unwrap();
        assert_eq!(url.path(), "/calendar/v3/calendars/primary/events");
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "timeMin" && v == "2024-03-09T00:00:00+09:00"));
        assert!(!url.query_pairs().any(|(k, _)| k == "pageToken"));
    }

    #[test]
    fn test_events_url_escapes_calendar_id() {
        let url = client("http://localhost:1234/calendar/v3/")
            .events_url(&query("ja.japanese#holiday@group.v.calendar.google.com"), Some("next"))
            .unwrap();
        assert_eq!(
            url.path(),
            "/calendar/v3/calendars/ja.japanese%23holiday@group.v.calendar.google.com/events"
        );
        assert!(url.query_pairs().any(|(k, v)| k == "pageToken" && v == "next"));
    }
}
