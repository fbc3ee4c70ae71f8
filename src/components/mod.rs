// Agenda selection and formatting
pub mod agenda;
// Calendar API access and OAuth
pub mod google_calendar;

pub use agenda::{build_agenda, compute_window, fetch_agenda, Agenda, DisplayWindow, Locale};
pub use google_calendar::{CalendarEvent, EventQuery, EventSource};
