use std::net::SocketAddr;

use crate::error::ServerConfigError;

pub const BIND_ADDR_ENV: &str = "STOREFRONT_BIND_ADDR";
pub const CORS_ORIGIN_ENV: &str = "STOREFRONT_CORS_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Browser origin allowed to call the API (the admin UI dev server).
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
        };

        let raw_addr = value(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|source| ServerConfigError::BindAddr {
                value: raw_addr.clone(),
                source,
            })?;

        Ok(Self {
            bind_addr,
            cors_origin: value(CORS_ORIGIN_ENV).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}
