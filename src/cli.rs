use crate::components::agenda::Locale;
use clap::Parser;
use std::path::PathBuf;

/// Print a day's Google Calendar agenda
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "gcal-agenda", version, about)]
pub struct Cli {
    /// Date to fetch events (format: YYYY-MM-DD); today when omitted
    #[arg(long)]
    pub date: Option<String>,

    /// Output language (ja or en)
    #[arg(long)]
    pub locale: Option<Locale>,

    /// IANA time zone for the target day, e.g. Asia/Tokyo
    #[arg(long)]
    pub timezone: Option<String>,

    /// Calendar to read instead of the configured one
    #[arg(long)]
    pub calendar: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
