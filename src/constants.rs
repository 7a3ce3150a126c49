//! Application constants
//!
//! Single source of truth for paths, API defaults, and probe parameters.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/gateway.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Sampling temperature applied when the caller does not supply one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-attempt deadline in seconds (overridable via config)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default OpenAI-compatible API path (fallback when not specified in config)
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

/// Default Anthropic Messages API path
pub const DEFAULT_ANTHROPIC_API_PATH: &str = "/v1/messages";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires max_tokens; used when the caller omits it
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;

/// Prompt sent by the health sweep
pub const HEALTH_PROBE_PROMPT: &str = "Hello";

/// Token cap for health probes
pub const HEALTH_PROBE_MAX_TOKENS: u32 = 10;
