use gcal_agenda::components::google_calendar::token::{load_token, save_token};
use gcal_agenda::components::google_calendar::{load_credentials, StoredToken};
use gcal_agenda::config::Config;
use gcal_agenda::error::Error;
use std::fs;

/// Smoke test to verify that a config file can be loaded
#[test]
fn test_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.toml");
    fs::write(
        &path,
        r#"
        credentials_path = "secrets/credentials.json"
        calendar_id = "family@group.calendar.google.com"
        locale = "en"
        "#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.calendar_id, "family@group.calendar.google.com");
    assert_eq!(
        config.credentials_path,
        std::path::PathBuf::from("secrets/credentials.json")
    );
}

/// An existing but broken config file stops the run
#[test]
fn test_unparsable_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.toml");
    fs::write(&path, "calendar_id = [").unwrap();

    assert!(matches!(Config::load(Some(&path)), Err(Error::Config(_))));
}

/// Token files survive a save and load
#[test]
fn test_token_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("token.json");

    let token = StoredToken {
        access_token: "access".to_string(),
        token_type: Some("Bearer".to_string()),
        refresh_token: Some("refresh".to_string()),
        expires_at: Some(1_710_000_000),
        scope: Some("https://www.googleapis.com/auth/calendar.readonly".to_string()),
    };
    save_token(&path, &token).unwrap();

    assert_eq!(load_token(&path).unwrap(), Some(token));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

/// A missing token file means a fresh authorization, not an error
#[test]
fn test_missing_or_corrupt_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    assert_eq!(load_token(&path).unwrap(), None);

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_token(&path).unwrap(), None);
}

/// Client-secret files are read from disk
#[test]
fn test_credentials_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(
        &path,
        r#"{"installed": {"client_id": "id", "client_secret": "secret", "redirect_uris": ["http://localhost"]}}"#,
    )
    .unwrap();

    let credentials = load_credentials(&path).unwrap();
    assert_eq!(credentials.client_id, "id");
    assert_eq!(credentials.client_secret, "secret");
}
