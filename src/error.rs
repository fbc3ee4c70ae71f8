use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid date format. Please use YYYY-MM-DD format: {0}")]
    #[diagnostic(code(gcal_agenda::invalid_date))]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gcal_agenda::config))]
    Config(String),

    #[error("Credentials error: {0}")]
    #[diagnostic(
        code(gcal_agenda::credentials),
        help("Download an OAuth client secret for a desktop app from the Google Cloud console")
    )]
    Credentials(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(gcal_agenda::auth))]
    Auth(String),

    #[error("Unable to retrieve events: {0}")]
    #[diagnostic(code(gcal_agenda::retrieval))]
    Retrieval(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(gcal_agenda::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(gcal_agenda::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gcal_agenda::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(gcal_agenda::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// TOML only shows up when reading the optional config file
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AgendaResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create credential file errors
pub fn credentials_error(message: &str) -> Error {
    Error::Credentials(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create event retrieval errors
pub fn retrieval_error(message: &str) -> Error {
    Error::Retrieval(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
