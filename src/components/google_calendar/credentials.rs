use crate::error::{credentials_error, AgendaResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client registration from a Google client-secret file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Client-secret files wrap the registration in `installed` or `web`
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientCredentials>,
    web: Option<ClientCredentials>,
}

/// Parse the contents of a client-secret file
pub fn parse_credentials(json: &str) -> AgendaResult<ClientCredentials> {
    let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
        credentials_error(&format!("Unable to parse client secret file to config: {}", e))
    })?;

    let credentials = file
        .installed
        .or(file.web)
        .ok_or_else(|| {
            credentials_error("Client secret file has no 'installed' or 'web' section")
        })?;

    if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
        return Err(credentials_error("Client secret file is missing client_id or client_secret"));
    }

    Ok(credentials)
}

/// Read and parse a client-secret file
pub fn load_credentials(path: &Path) -> AgendaResult<ClientCredentials> {
    let content = fs::read_to_string(path).map_err(|e| {
        credentials_error(&format!(
            "Unable to read client secret file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_credentials(&content)
}
