//! Server-held provider credentials.
//!
//! Resolution is a pure lookup against the immutable [`ProviderConfig`]: each
//! upstream vendor maps to one configured secret, and a missing secret fails
//! fast before any network I/O. The secret itself never reaches logs or error
//! messages; only the provider and variable name do.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::ProviderConfig;
use crate::error::{ProxyError, Result};
use crate::models::Vendor;
use std::fmt;
use zeroize::Zeroizing;

/// A bearer secret, wiped from memory on drop.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.as_str())
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Looks up the secret for a vendor.
pub struct CredentialResolver<'a> {
    providers: &'a ProviderConfig,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(providers: &'a ProviderConfig) -> Self {
        Self { providers }
    }

    /// Resolve the credential for `vendor`, or fail with `MissingCredential`.
    pub fn resolve(&self, vendor: Vendor) -> Result<ApiKey> {
        let secret = match vendor {
            Vendor::HuggingFace => present(&self.providers.hf_api_key),
            // The router accepts either token; HF_TOKEN wins
            Vendor::HfRouter => {
                present(&self.providers.hf_token).or_else(|| present(&self.providers.hf_api_key))
            }
            Vendor::OpenRouter => present(&self.providers.openrouter_key),
            Vendor::OpenAi => present(&self.providers.openai_api_key),
        };

        secret
            .map(ApiKey::new)
            .ok_or(ProxyError::MissingCredential {
                provider: vendor.display_name(),
                env_var: env_var(vendor),
            })
    }

    /// Whether a credential is configured, without materializing it.
    pub fn is_configured(&self, vendor: Vendor) -> bool {
        self.resolve(vendor).is_ok()
    }
}

/// Process variable that supplies a vendor's credential.
pub fn env_var(vendor: Vendor) -> &'static str {
    match vendor {
        Vendor::HuggingFace => "HF_API_KEY",
        Vendor::HfRouter => "HF_TOKEN",
        Vendor::OpenRouter => "OPENROUTER_KEY",
        Vendor::OpenAi => "OPENAI_API_KEY",
    }
}

fn present(secret: &Option<String>) -> Option<&str> {
    secret.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn providers() -> ProviderConfig {
        ProviderConfig {
            hf_api_key: Some("hf_inference".to_string()),
            openrouter_key: Some("sk-or-v1-abc".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_configured_key() {
        let config = providers();
        let key = CredentialResolver::new(&config).resolve(Vendor::OpenRouter).unwrap();
        assert_eq!(key.bearer(), "Bearer sk-or-v1-abc");
    }

    #[test]
    fn test_router_falls_back_to_inference_key() {
        let config = providers();
        let key = CredentialResolver::new(&config).resolve(Vendor::HfRouter).unwrap();
        assert_eq!(key.expose(), "hf_inference");

        let config = ProviderConfig {
            hf_token: Some("hf_router".to_string()),
            ..providers()
        };
        let key = CredentialResolver::new(&config).resolve(Vendor::HfRouter).unwrap();
        assert_eq!(key.expose(), "hf_router");
    }

    #[test]
    fn test_missing_key_names_provider_not_secret() {
        let config = providers();
        let err = CredentialResolver::new(&config).resolve(Vendor::OpenAi).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("OpenAI"));
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(!message.contains("sk-or"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = ProviderConfig {
            hf_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!CredentialResolver::new(&config).is_configured(Vendor::HuggingFace));
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = ApiKey::new("hf_secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }
}
