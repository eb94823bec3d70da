use clap::Parser;
use tracing_subscriber::EnvFilter;

use huffzip::cli::{self, Cli};
use huffzip::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Loaded config: {:?}", config);

    cli::run(cli, config)
}
