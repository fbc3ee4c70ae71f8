use super::credentials::ClientCredentials;
use crate::error::{auth_error, other_error, AgendaResult};
use chrono::{DateTime, Datelike, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Read-only access to the user's calendars
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Tokens this close to expiry are refreshed up front
const EXPIRY_MARGIN_SECS: i64 = 60;
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// OAuth token as persisted in the token file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl StoredToken {
    /// A token without a known expiry counts as expired when it can be refreshed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now.timestamp() + EXPIRY_MARGIN_SECS,
            None => self.refresh_token.is_some(),
        }
    }

    fn from_response(
        response: TokenResponse,
        previous_refresh_token: Option<String>,
        now: DateTime<Utc>,
    ) -> AgendaResult<Self> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?;
        let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);

        Ok(Self {
            access_token,
            token_type: response.token_type,
            // Refresh responses do not repeat the refresh token
            refresh_token: response.refresh_token.or(previous_refresh_token),
            expires_at: Some(now.timestamp() + expires_in),
            scope: response.scope,
        })
    }
}

/// Body of a successful token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

/// Token file contents, also accepting the RFC 3339 `expiry` field written by
/// golang.org/x/oauth2 and similar clients
#[derive(Debug, Deserialize)]
struct TokenFile {
    #[serde(flatten)]
    token: StoredToken,
    #[serde(default)]
    expiry: Option<String>,
}

impl TokenFile {
    fn into_token(self) -> StoredToken {
        let mut token = self.token;
        if token.expires_at.is_none() {
            token.expires_at = self.expiry.as_deref().and_then(parse_expiry);
        }
        token
    }
}

/// Unix timestamp of an RFC 3339 expiry. The zero time (year 1) means "no expiry".
fn parse_expiry(expiry: &str) -> Option<i64> {
    match DateTime::parse_from_rfc3339(expiry) {
        Ok(expiry) if expiry.year() > 1 => Some(expiry.timestamp()),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring unreadable token expiry {:?}: {}", expiry, e);
            None
        }
    }
}

/// Load a token file. A missing or malformed file yields `None`.
pub fn load_token(path: &Path) -> AgendaResult<Option<StoredToken>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str::<TokenFile>(&content) {
        Ok(file) => Ok(Some(file.into_token())),
        Err(e) => {
            warn!("Ignoring unreadable token file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Write a token file, readable by the owner only
pub fn save_token(path: &Path, token: &StoredToken) -> AgendaResult<()> {
    info!("Saving credential file to: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| auth_error(&format!("Unable to cache oauth token: {}", e)))?;
    let json = serde_json::to_string_pretty(token)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}

/// True when a loopback request carries the authorization result
pub fn is_authorization_callback(request_url: &str) -> bool {
    callback_params(request_url)
        .map(|params| params.contains_key("code") || params.contains_key("error"))
        .unwrap_or(false)
}

/// Extract the authorization code from the loopback redirect
pub fn parse_callback(request_url: &str, expected_state: &str) -> AgendaResult<String> {
    let params = callback_params(request_url)?;

    if let Some(error) = params.get("error") {
        return Err(auth_error(&format!("Authorization was denied: {}", error)));
    }

    match params.get("state") {
        Some(state) if state == expected_state => {}
        _ => return Err(auth_error("Authorization callback state does not match")),
    }

    params
        .get("code")
        .filter(|code| !code.is_empty())
        .cloned()
        .ok_or_else(|| auth_error("No authorization code found in callback"))
}

fn callback_params(request_url: &str) -> AgendaResult<HashMap<String, String>> {
    let url = Url::parse("http://127.0.0.1/")
        .and_then(|base| base.join(request_url))
        .map_err(|e| auth_error(&format!("Malformed callback URL: {}", e)))?;
    Ok(url.query_pairs().into_owned().collect())
}

/// Provides a usable access token, from the token file or a fresh authorization
pub struct TokenManager {
    credentials: ClientCredentials,
    token_path: PathBuf,
    redirect_port: u16,
    client: Client,
}

impl TokenManager {
    pub fn new(
        credentials: ClientCredentials,
        token_path: &Path,
        redirect_port: u16,
        timeout: Duration,
    ) -> AgendaResult<Self> {
        Ok(Self {
            credentials,
            token_path: token_path.to_path_buf(),
            redirect_port,
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Get a valid token, refreshing or re-authorizing as needed
    pub async fn get_token(&self) -> AgendaResult<StoredToken> {
        match load_token(&self.token_path)? {
            Some(token) if !token.is_expired(Utc::now()) => {
                debug!("Using stored token from {}", self.token_path.display());
                return Ok(token);
            }
            Some(token) if token.refresh_token.is_some() => {
                match self.refresh_token(&token).await {
                    Ok(token) => {
                        save_token(&self.token_path, &token)?;
                        return Ok(token);
                    }
                    Err(e) => warn!("Stored token could not be refreshed: {}", e),
                }
            }
            Some(_) => warn!("Stored token has expired and cannot be refreshed"),
            None => info!("No stored token at {}", self.token_path.display()),
        }

        let token = self.authorize_interactively().await?;
        save_token(&self.token_path, &token)?;
        Ok(token)
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh_token(&self, token: &StoredToken) -> AgendaResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.credentials.client_id.clone()),
            ("client_secret", self.credentials.client_secret.clone()),
            ("refresh_token", refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self.request_token(&params).await?;
        StoredToken::from_response(response, Some(refresh_token), Utc::now())
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> AgendaResult<StoredToken> {
        let params = [
            ("client_id", self.credentials.client_id.clone()),
            ("client_secret", self.credentials.client_secret.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.redirect_uri()),
            ("grant_type", "authorization_code".to_string()),
        ];

        let response = self.request_token(&params).await?;
        StoredToken::from_response(response, None, Utc::now())
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}", self.redirect_port)
    }

    /// Consent page URL for the read-only calendar scope
    pub fn authorization_url(&self, state: &str) -> AgendaResult<Url> {
        let mut url = Url::parse(&self.credentials.auth_uri)
            .map_err(|e| auth_error(&format!("Invalid auth_uri: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", &self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("scope", CALENDAR_READONLY_SCOPE)
            .append_pair("state", state);

        Ok(url)
    }

    async fn request_token(&self, params: &[(&str, String)]) -> AgendaResult<TokenResponse> {
        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to get token: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))
    }

    /// Run the browser consent flow and wait for the loopback redirect
    async fn authorize_interactively(&self) -> AgendaResult<StoredToken> {
        let state = uuid::Uuid::new_v4().to_string();
        let auth_url = self.authorization_url(&state)?;

        let server = tiny_http::Server::http(("127.0.0.1", self.redirect_port)).map_err(|e| {
            auth_error(&format!(
                "Failed to listen for the authorization callback on port {}: {}",
                self.redirect_port, e
            ))
        })?;
        let server = Arc::new(server);

        eprintln!(
            "Go to the following link in your browser to authorize calendar access:\n{}",
            auth_url
        );
        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            warn!("Could not open a browser: {}", e);
        }

        let code = loop {
            let listener = Arc::clone(&server);
            let request = tokio::task::spawn_blocking(move || listener.recv())
                .await
                .map_err(|e| other_error(&format!("Authorization listener failed: {}", e)))??;

            if !is_authorization_callback(request.url()) {
                let url = request.url().to_string();
                debug!("Ignoring request for {}", url);
                let not_found = tiny_http::Response::empty(tiny_http::StatusCode(404));
                if let Err(e) = request.respond(not_found) {
                    warn!("Failed to answer request for {}: {}", url, e);
                }
                continue;
            }

            let result = parse_callback(request.url(), &state);
            let message = match &result {
                Ok(_) => "Authorization successful! You can close this window.",
                Err(_) => "Authorization failed. Check the terminal for details.",
            };
            if let Err(e) = request.respond(tiny_http::Response::from_string(message)) {
                warn!("Failed to answer the authorization callback: {}", e);
            }
            break result?;
        };

        self.exchange_code(&code).await
    }
}
