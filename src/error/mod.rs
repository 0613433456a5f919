//! Error types for Learn Copilot.

use thiserror::Error;

/// Primary error type for all crate operations.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required configuration: {key}")]
    MissingConfiguration { key: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Coarse classification used for retry decisions and user help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Unknown,
}

impl AppError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a missing-configuration error for an environment key.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingConfiguration { key: key.into() }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::MissingConfiguration { .. } => {
                ErrorCategory::Configuration
            }
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_category() {
        assert_eq!(AppError::api(401, "no").category(), ErrorCategory::Authentication);
        assert_eq!(AppError::api(429, "slow").category(), ErrorCategory::RateLimit);
        assert_eq!(AppError::api(503, "down").category(), ErrorCategory::Server);
        assert_eq!(AppError::api(404, "gone").category(), ErrorCategory::Api);
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(AppError::api(502, "bad gateway").is_retryable());
        assert!(AppError::RateLimited { retry_after_ms: None }.is_retryable());
        assert!(AppError::Timeout(1000).is_retryable());
        assert!(!AppError::api(400, "bad request").is_retryable());
        assert!(!AppError::missing("AZURE_OPENAI_ENDPOINT").is_retryable());
        assert!(!AppError::Authentication("expired".into()).is_retryable());
    }

    #[test]
    fn missing_configuration_names_the_key() {
        let err = AppError::missing("AZURE_OPENAI_DEPLOYMENT_NAME");
        assert_eq!(
            err.to_string(),
            "Missing required configuration: AZURE_OPENAI_DEPLOYMENT_NAME"
        );
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
