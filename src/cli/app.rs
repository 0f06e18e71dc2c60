use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;

    info!("Starting locator-synth v{}", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.config.as_ref()).await?;
    debug!(config = ?loaded.config, "effective configuration");

    match dispatch(&cli, &loaded).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
