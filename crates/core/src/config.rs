//! Deployment configuration read from the environment.

use crate::catalog::CatalogPolicy;
use crate::errors::ConfigError;

/// Base URL of the REST catalog service.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";
/// Full URL of the chat WebSocket endpoint.
pub const CHAT_URL_ENV: &str = "STOREFRONT_CHAT_URL";
/// `remote` or `local`.
pub const CATALOG_POLICY_ENV: &str = "STOREFRONT_CATALOG_POLICY";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_URL: &str = "ws://localhost:8000/chat/ws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub api_url: String,
    pub chat_url: String,
    pub catalog_policy: CatalogPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            catalog_policy: CatalogPolicy::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
        };

        let catalog_policy = match value(CATALOG_POLICY_ENV) {
            Some(raw) => raw.parse()?,
            None => CatalogPolicy::default(),
        };

        Ok(Self {
            api_url: value(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            chat_url: value(CHAT_URL_ENV).unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
            catalog_policy,
        })
    }
}
