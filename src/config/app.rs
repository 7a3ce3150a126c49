use super::error::ConfigError;
use super::loader;
use super::provider::ProviderConfig;
use std::path::Path;

/// Top-level gateway configuration: the provider descriptor table, the
/// fallback priority list, and the per-attempt deadline. Read-only for the
/// process lifetime once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub providers: Vec<ProviderConfig>,
    pub priority: Vec<String>,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from the given path, the default path, or the
    /// built-in provider table (in that order of preference).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        loader::load_config(path)
    }

    /// Look up a provider descriptor by id.
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }
}
