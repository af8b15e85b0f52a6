//! Core error types.

use thiserror::Error;

/// Errors produced while talking to the backend or validating user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The backend answered with a non-success status or `success: false`.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A response body could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid client configuration (base URL, headers, proxy, ...)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// User input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A request parameter outside its allowed set.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The same action is already in flight.
    #[error("Operation already in progress: {0}")]
    Busy(String),
}

/// Coarse classification used to pick presentation and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Client,
    Server,
    Parsing,
    Validation,
    Configuration,
    State,
}

impl ClientError {
    /// Shorthand for an [`ClientError::ApiError`] without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status carried by the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::ParseError(_) => ErrorCategory::Parsing,
            Self::InvalidInput(_) | Self::InvalidParameter(_) => ErrorCategory::Validation,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::Busy(_) => ErrorCategory::State,
        }
    }

    /// Message reported by the backend, if the error came from one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if let Some(status) = err.status() {
            Self::api_error(status.as_u16(), err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::InvalidInput(message)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_category_follows_status() {
        assert_eq!(
            ClientError::api_error(400, "bad").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            ClientError::api_error(500, "boom").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            ClientError::HttpError("refused".into()).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn backend_message_skips_empty() {
        assert_eq!(ClientError::api_error(500, "").backend_message(), None);
        assert_eq!(
            ClientError::api_error(400, "No prompt").backend_message(),
            Some("No prompt")
        );
        assert_eq!(ClientError::Busy("generate".into()).status_code(), None);
    }
}
