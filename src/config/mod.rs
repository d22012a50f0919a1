// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::Result;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Flat process variables and the config keys they override.
const FLAT_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("HF_API_KEY", "providers.hf_api_key"),
    ("HF_TOKEN", "providers.hf_token"),
    ("HF_MODEL", "providers.hf_model"),
    ("OPENROUTER_KEY", "providers.openrouter_key"),
    ("OPENROUTER_MODEL", "providers.openrouter_model"),
    ("OPENAI_API_KEY", "providers.openai_api_key"),
    ("OPENAI_MODEL", "providers.openai_model"),
];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Flat provider variables (`PORT`, `HF_API_KEY`, ...) (highest)
    /// 2. `PROVIDER_PROXY_` prefixed environment variables
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(Some(&Self::default_config_path()), |name| {
            std::env::var(name).ok()
        })
    }

    /// Same layering as [`AppConfig::load`] with an explicit file and a
    /// substitutable variable lookup.
    pub fn load_from<F>(config_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?);

        // Load from config file if it exists
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        // Nested keys use a double underscore: PROVIDER_PROXY_UPSTREAM__MAX_ATTEMPTS
        builder = builder.add_source(
            Environment::with_prefix("PROVIDER_PROXY")
                .prefix_separator("_")
                .separator("__"),
        );

        for (var, key) in FLAT_OVERRIDES {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".provider-proxy")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_from(None, lookup(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.providers.hf_api_key.is_none());
        assert_eq!(config.upstream.max_attempts, 1);
        assert_eq!(config.upstream.huggingface_base_url, "https://api-inference.huggingface.co");
    }

    #[test]
    fn test_flat_variables_override_defaults() {
        let config = AppConfig::load_from(
            None,
            lookup(&[("PORT", "8081"), ("HF_API_KEY", "hf_abc"), ("OPENROUTER_MODEL", "meta/llama")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.providers.hf_api_key.as_deref(), Some("hf_abc"));
        assert_eq!(config.providers.openrouter_model.as_deref(), Some("meta/llama"));
    }

    #[test]
    fn test_empty_variables_count_as_unset() {
        let config = AppConfig::load_from(None, lookup(&[("OPENROUTER_KEY", "  ")])).unwrap();
        assert!(config.providers.openrouter_key.is_none());
    }
}
