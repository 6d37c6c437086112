//! Error types for storefront domain operations.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Form-boundary failures raised while coercing user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty after trimming
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field could not be parsed
    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

impl ValidationError {
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}

/// Errors that can occur while synchronizing the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input rejected before it reached the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network-level failure (connect, timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success response from the catalog service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Invalid deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown catalog policy '{0}' (expected 'remote' or 'local')")]
    UnknownPolicy(String),
}
