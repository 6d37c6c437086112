//! Error types for the catalog client crate.

use storefront_core::CatalogError;
use thiserror::Error;

/// Result type alias for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;

/// Failure class for API errors. Only used for logging; the client never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRetryClass {
    Retryable,
    Permanent,
}

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the catalog service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be built (bad base URL, client setup)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogClientError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Classify error for log reporting.
    pub fn retry_class(&self) -> ApiRetryClass {
        match self {
            Self::Api { status, .. } => match *status {
                408 | 409 | 423 | 425 | 429 => ApiRetryClass::Retryable,
                500..=599 => ApiRetryClass::Retryable,
                _ => ApiRetryClass::Permanent,
            },
            Self::Http(err) if err.is_decode() => ApiRetryClass::Permanent,
            Self::Http(_) => ApiRetryClass::Retryable,
            Self::Json(_) => ApiRetryClass::Permanent,
            Self::InvalidRequest(_) => ApiRetryClass::Permanent,
        }
    }
}

impl From<CatalogClientError> for CatalogError {
    fn from(err: CatalogClientError) -> Self {
        match err {
            CatalogClientError::Api { status, message } => CatalogError::Api { status, message },
            CatalogClientError::Http(err) if err.is_decode() => CatalogError::Decode(err.to_string()),
            CatalogClientError::Http(err) => CatalogError::Transport(err.to_string()),
            CatalogClientError::Json(err) => CatalogError::Decode(err.to_string()),
            CatalogClientError::InvalidRequest(message) => CatalogError::Transport(message),
        }
    }
}
