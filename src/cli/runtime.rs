use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, Config, LoadOptions};

const LOCAL_CONFIG: &str = "config/locator-synth.yaml";

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    // stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was looked up at, if any
    pub path: Option<PathBuf>,
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => Some(path.clone()),
        None => {
            // Priority: ./config/locator-synth.yaml > ~/.config/locator-synth/config.yaml
            let local_config = PathBuf::from(LOCAL_CONFIG);
            if fs::try_exists(&local_config).await.unwrap_or(false) {
                Some(local_config)
            } else {
                dirs::config_dir().map(|mut path| {
                    path.push("locator-synth");
                    path.push("config.yaml");
                    path
                })
            }
        }
    };

    let options = match &config_path {
        Some(path) if fs::try_exists(path).await.unwrap_or(false) => {
            info!("Loading configuration from: {}", path.display());
            LoadOptions::with_path(path)
        }
        Some(path) => {
            warn!("Config file not found, using defaults: {}", path.display());
            LoadOptions {
                include_env: true,
                ..LoadOptions::default()
            }
        }
        None => LoadOptions {
            include_env: true,
            ..LoadOptions::default()
        },
    };

    let config = config::load_with_options(&options).context("Failed to load configuration")?;
    Ok(LoadedConfig {
        config,
        path: config_path,
    })
}
