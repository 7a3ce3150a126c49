use super::defaults;
use super::error::ConfigError;
use super::provider::{ProviderConfig, RawProviderConfig};
use crate::constants::{CONFIG_PATH, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub priority: Vec<String>,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist. With no path, the default file is used when
/// present; otherwise the built-in provider table takes over so the gateway
/// can run from environment credentials alone.
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(config_path) => read_config(config_path),
        None => {
            let config_path = Path::new(CONFIG_PATH);
            if config_path.exists() {
                read_config(config_path)
            } else {
                info!("No configuration file found, using built-in provider table");
                Ok(defaults::default_config())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<super::AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading gateway configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::AppConfig, ConfigError> {
    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut providers: Vec<ProviderConfig> = Vec::new();
    for raw in parsed.providers {
        if !seen.insert(raw.id.clone()) {
            return Err(ConfigError::DuplicateProvider { provider: raw.id });
        }
        let endpoint = match raw.endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => endpoint,
            _ => {
                return Err(ConfigError::MissingEndpoint { provider: raw.id });
            }
        };
        let model = match raw.model {
            Some(model) if !model.trim().is_empty() => model,
            _ => {
                return Err(ConfigError::MissingModel { provider: raw.id });
            }
        };
        providers.push(ProviderConfig {
            id: raw.id,
            provider_type: raw.provider_type,
            endpoint,
            api_key: raw.api_key,
            api_path: raw.api_path,
            model,
            fallback_model: raw.fallback_model,
        });
    }

    // An omitted priority list falls back to declaration order. Every entry
    // must name a configured provider; the fallback sweep never probes names
    // outside the table.
    let priority = if parsed.priority.is_empty() {
        providers.iter().map(|p| p.id.clone()).collect()
    } else {
        for entry in &parsed.priority {
            if !providers.iter().any(|p| &p.id == entry) {
                return Err(ConfigError::UnknownPriorityProvider {
                    provider: entry.clone(),
                });
            }
        }
        parsed.priority
    };

    Ok(super::AppConfig {
        providers,
        priority,
        request_timeout_secs: parsed
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    })
}
