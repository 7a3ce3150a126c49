pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::dispatcher;
pub use cli::Cli;
pub use config::{AppConfig, ProviderConfig};
pub use domain::types;
pub use infrastructure::{model, server};

use application::dispatcher::Dispatcher;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting astrolabe gateway");
    debug!(config = ?cli.config, addr = %cli.rest_addr, "CLI arguments parsed");

    let config_path = cli.config.as_deref().map(Path::new);
    let config = AppConfig::load(config_path)?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration from default path or built-in defaults");
    }
    debug!(
        provider_count = config.providers.len(),
        priority = ?config.priority,
        "Initializing provider backends"
    );

    let dispatcher = Arc::new(Dispatcher::from_config(&config));
    info!(addr = %cli.rest_addr, "Starting REST server");
    server::serve(dispatcher, cli.rest_addr).await?;
    info!("Gateway execution finished");
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
