mod client;
pub mod credentials;
pub mod models;
pub mod token;

pub use client::{EventQuery, EventSource, GoogleCalendarClient, DEFAULT_API_BASE};
pub use credentials::{load_credentials, ClientCredentials};
pub use models::{CalendarEvent, EventTime};
pub use token::{StoredToken, TokenManager};
