//! API key resolution for fluenta-ts
//!
//! Keys resolve with ENV → TOML priority. Every key is optional: a missing
//! key disables its upstream and the service degrades to fallback output
//! instead of refusing to start.

use fluenta_common::config::TomlConfig;
use tracing::{info, warn};

/// Resolved upstream API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub mistral: Option<String>,
    pub assemblyai: Option<String>,
    pub openai: Option<String>,
}

/// Resolve all upstream API keys from environment and TOML config
pub fn resolve_api_keys(toml_config: &TomlConfig) -> ApiKeys {
    ApiKeys {
        mistral: resolve_key(
            "MISTRAL_API_KEY",
            toml_config.mistral_api_key.as_deref(),
            "Mistral",
        ),
        assemblyai: resolve_key(
            "ASSEMBLYAI_API_KEY",
            toml_config.assemblyai_api_key.as_deref(),
            "AssemblyAI",
        ),
        openai: resolve_key(
            "OPENAI_API_KEY",
            toml_config.openai_api_key.as_deref(),
            "OpenAI",
        ),
    }
}

/// Resolve one key with ENV → TOML priority
pub fn resolve_key(
    env_var_name: &str,
    toml_value: Option<&str>,
    service_name: &str,
) -> Option<String> {
    let env_key = std::env::var(env_var_name)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k)).map(str::to_string);

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in both environment and TOML. Using environment (highest priority).",
            service_name
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", service_name);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", service_name);
        return Some(key);
    }

    info!(
        "{} API key not configured ({} unset) - fallback behavior will be used",
        service_name, env_var_name
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
