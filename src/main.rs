use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ge_pricewatch::application::{Cli, CommandExecutor, Commands};
use ge_pricewatch::shared::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Priority: CLI args > config file > defaults
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    info!(
        "Using {} (poll every {}s, timeout {}s)",
        config.api.latest_url, config.monitor.poll_interval_secs, config.api.timeout_secs
    );

    let command = cli.command.clone().unwrap_or(Commands::Shell);
    CommandExecutor::new(config).execute(command).await
}
