use crate::components::agenda::Locale;
use crate::error::{config_error, AgendaResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "config/agenda.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Google OAuth client-secret file
    pub credentials_path: PathBuf,
    /// Cached OAuth token
    pub token_path: PathBuf,
    /// Calendar to list events from
    pub calendar_id: String,
    /// IANA zone for the target day; the system zone when unset
    pub timezone: Option<String>,
    /// Output language
    pub locale: Locale,
    /// Port of the loopback listener used during authorization
    pub redirect_port: u16,
    /// Timeout for each HTTP request, in seconds
    pub request_timeout_secs: u64,
    /// Calendar API root
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            calendar_id: "primary".to_string(),
            timezone: None,
            locale: Locale::default(),
            redirect_port: 8080,
            request_timeout_secs: 30,
            api_base_url: crate::components::google_calendar::DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Optional overrides from the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    credentials_path: Option<PathBuf>,
    token_path: Option<PathBuf>,
    calendar_id: Option<String>,
    timezone: Option<String>,
    locale: Option<Locale>,
    redirect_port: Option<u16>,
    request_timeout_secs: Option<u64>,
    api_base_url: Option<String>,
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `path` must exist. The default path is only read when present.
    pub fn load(path: Option<&Path>) -> AgendaResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Config::default();

        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        if required || path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                config_error(&format!("Unable to read config file {}: {}", path.display(), e))
            })?;
            config.merge_file(&content)?;
        }

        config.merge_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply a TOML document on top of the current values
    pub fn merge_file(&mut self, content: &str) -> AgendaResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(v) = file.credentials_path {
            self.credentials_path = v;
        }
        if let Some(v) = file.token_path {
            self.token_path = v;
        }
        if let Some(v) = file.calendar_id {
            self.calendar_id = v;
        }
        if file.timezone.is_some() {
            self.timezone = file.timezone;
        }
        if let Some(v) = file.locale {
            self.locale = v;
        }
        if let Some(v) = file.redirect_port {
            self.redirect_port = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }

        Ok(())
    }

    /// Apply `AGENDA_*` variables looked up through `lookup`
    pub fn merge_env<F>(&mut self, lookup: F) -> AgendaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AGENDA_CREDENTIALS") {
            self.credentials_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("AGENDA_TOKEN_FILE") {
            self.token_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("AGENDA_CALENDAR_ID") {
            self.calendar_id = v;
        }
        if let Some(v) = lookup("AGENDA_TIMEZONE") {
            self.timezone = Some(v);
        }
        if let Some(v) = lookup("AGENDA_LOCALE") {
            self.locale = v.parse()?;
        }
        if let Some(v) = lookup("AGENDA_REDIRECT_PORT") {
            self.redirect_port = v
                .parse()
                .map_err(|_| config_error("Invalid AGENDA_REDIRECT_PORT format"))?;
        }
        if let Some(v) = lookup("AGENDA_REQUEST_TIMEOUT") {
            self.request_timeout_secs = v
                .parse()
                .map_err(|_| config_error("Invalid AGENDA_REQUEST_TIMEOUT format"))?;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
