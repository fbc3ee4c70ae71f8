use crate::cli::Cli;
use crate::components::agenda::{compute_window, fetch_agenda, Agenda};
use crate::components::google_calendar::{load_credentials, GoogleCalendarClient, TokenManager};
use crate::config::Config;
use crate::error::{config_error, AgendaResult, Error};
use crate::utils::time::parse_target_date;
use chrono::{Local, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration.
///
/// Logs go to stderr so that stdout only carries the agenda.
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the config file and environment, then apply command line overrides
pub fn load_config(cli: &Cli) -> miette::Result<Config> {
    match Config::load(cli.config.as_deref()) {
        Ok(config) => Ok(apply_overrides(config, cli)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Command line flags win over the config file and environment
pub fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(timezone) = &cli.timezone {
        config.timezone = Some(timezone.clone());
    }
    if let Some(calendar) = &cli.calendar {
        config.calendar_id = calendar.clone();
    }
    config
}

/// Parse a configured zone name
pub fn parse_timezone(name: &str) -> AgendaResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Invalid timezone: {}", name)))
}

/// Authenticate, fetch the target day's events and print the agenda
pub async fn run(cli: Cli, config: Config) -> miette::Result<()> {
    let result = match config.timezone.as_deref() {
        Some(name) => match parse_timezone(name) {
            Ok(tz) => run_in_zone(&tz, &cli, &config).await,
            Err(e) => Err(e),
        },
        None => run_in_zone(&Local, &cli, &config).await,
    };

    match result {
        Ok(agenda) => {
            print!("{}", agenda);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

async fn run_in_zone<Z: TimeZone>(tz: &Z, cli: &Cli, config: &Config) -> AgendaResult<Agenda> {
    let today = Utc::now().with_timezone(tz).date_naive();
    let target_date = parse_target_date(cli.date.as_deref(), today)?;
    let window = compute_window(target_date, tz);

    let credentials = load_credentials(&config.credentials_path)?;
    let token_manager = TokenManager::new(
        credentials,
        &config.token_path,
        config.redirect_port,
        config.request_timeout(),
    )?;
    let token = token_manager.get_token().await?;

    let client = GoogleCalendarClient::new(&token.access_token, config.request_timeout())?
        .with_base_url(&config.api_base_url);

    info!("Building agenda for {}", window.target_date_label);
    fetch_agenda(&client, &config.calendar_id, &window, config.locale).await
}
