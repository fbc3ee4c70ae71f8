use clap::Parser;
use gcal_agenda::cli::Cli;
use gcal_agenda::startup;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = Cli::parse();
    info!("Starting gcal-agenda");

    // Load configuration
    let config = startup::load_config(&cli)?;

    // Fetch and print the agenda
    startup::run(cli, config).await
}
