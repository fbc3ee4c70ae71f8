pub mod colors;
pub mod filter;
pub mod render;
pub mod window;

pub use render::{build_agenda, Agenda, DisplayLine, Timing};
pub use window::{compute_window, DisplayWindow};

use crate::components::google_calendar::{EventQuery, EventSource};
use crate::error::{config_error, AgendaResult, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Output language for labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    /// Locale code as used in the `locales/` files
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" => Ok(Locale::Ja),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(config_error(&format!(
                "Unsupported locale '{}', expected 'ja' or 'en'",
                other
            ))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query `source` for the window and build the agenda from what comes back
pub async fn fetch_agenda<S>(
    source: &S,
    calendar_id: &str,
    window: &DisplayWindow,
    locale: Locale,
) -> AgendaResult<Agenda>
where
    S: EventSource + ?Sized,
{
    let query = EventQuery::for_window(calendar_id, window);
    info!(
        "Fetching events for {} ({} .. {})",
        window.target_date_label, query.time_min, query.time_max
    );

    let events = source.list_events(&query).await?;
    let agenda = build_agenda(&events, window, locale);
    debug!(
        "{} of {} events belong to {}",
        agenda.entries.len(),
        events.len(),
        window.target_date_label
    );

    Ok(agenda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("ja".parse::<Locale>().unwrap(), Locale::Ja);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" en-GB ".parse::<Locale>().unwrap(), Locale::En);
        assert!(matches!("fi".parse::<Locale>(), Err(Error::Config(_))));
    }

    #[test]
    fn test_locale_default_is_japanese() {
        assert_eq!(Locale::default(), Locale::Ja);
        assert_eq!(Locale::default().to_string(), "ja");
    }
}
