use super::colors::color_name;
use super::filter::{select_events, EffectiveSpan};
use super::window::DisplayWindow;
use super::Locale;
use crate::components::google_calendar::models::CalendarEvent;
use rust_i18n::t;
use std::fmt;

const CLOCK_FORMAT: &str = "%H:%M";

/// When an agenda entry happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timing {
    AllDay,
    /// Start and end as `HH:MM` in the event's own offset
    Span { start: String, end: String },
}

/// One rendered agenda entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub color_name: &'static str,
    pub summary: String,
    pub timing: Timing,
}

impl DisplayLine {
    pub fn new(event: &CalendarEvent, span: &EffectiveSpan, locale: Locale) -> Self {
        let timing = if event.is_all_day() {
            Timing::AllDay
        } else {
            Timing::Span {
                start: span.start.format(CLOCK_FORMAT).to_string(),
                end: span.end.format(CLOCK_FORMAT).to_string(),
            }
        };

        Self {
            color_name: color_name(event.color_id.as_deref(), locale),
            summary: event.summary.clone(),
            timing,
        }
    }

    pub fn render(&self, locale: Locale) -> String {
        match &self.timing {
            Timing::AllDay => format!(
                "【{}】{} ({})",
                self.color_name,
                self.summary,
                t!("agenda_all_day", locale = locale.as_str())
            ),
            Timing::Span { start, end } => {
                format!("【{}】{} ({}-{})", self.color_name, self.summary, start, end)
            }
        }
    }
}

/// The agenda for one target date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agenda {
    pub date_label: String,
    pub locale: Locale,
    pub entries: Vec<DisplayLine>,
}

impl Agenda {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Line naming the target date
    pub fn header(&self) -> String {
        t!(
            "agenda_header",
            locale = self.locale.as_str(),
            date = self.date_label.as_str()
        )
        .to_string()
    }

    /// Body lines: one per entry, or a single "no events" line
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![t!(
                "agenda_no_events",
                locale = self.locale.as_str(),
                date = self.date_label.as_str()
            )
            .to_string()];
        }

        self.entries
            .iter()
            .map(|entry| entry.render(self.locale))
            .collect()
    }
}

impl fmt::Display for Agenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Filter `events` down to the window's agenda and render each entry
pub fn build_agenda(events: &[CalendarEvent], window: &DisplayWindow, locale: Locale) -> Agenda {
    let entries = select_events(events, window)
        .into_iter()
        .map(|(event, span)| DisplayLine::new(event, &span, locale))
        .collect();

    Agenda {
        date_label: window.target_date_label.clone(),
        locale,
        entries,
    }
}
