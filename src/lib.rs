pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::ViewOptions;
use crate::cli::convert::ConvertOptions;
use crate::core::config::AppConfig;
use crate::providers::FrankfurterProvider;
use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates(ViewOptions),
    Watch(ViewOptions),
    Convert(ConvertOptions),
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxtry starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(FrankfurterProvider::new(&config.providers.frankfurter));

    match command {
        AppCommand::Rates(options) => {
            let today = Local::now().date_naive();
            cli::rates::run(
                provider.as_ref(),
                provider.as_ref(),
                &config,
                &options,
                today,
            )
            .await
        }
        AppCommand::Watch(options) => {
            cli::watch::run(provider.clone(), provider, &config, &options).await
        }
        AppCommand::Convert(options) => {
            cli::convert::run(provider.as_ref(), &config, &options).await
        }
        AppCommand::Currencies => cli::currencies::run(provider.as_ref(), &config).await,
    }
}
