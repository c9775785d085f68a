// src/error.rs

//! Unified error handling for the scraper.
//!
//! Internally every stage returns [`AppError`]. At the outer boundary of an
//! operation the error is classified into an [`ErrorKind`] and surfaced as a
//! [`ScrapeError`], which carries only a fixed public message.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Endpoint name not present in the registry
    #[error("Unknown endpoint: '{0}'")]
    UnknownEndpoint(String),

    /// Endpoint descriptor rejected at registry load time
    #[error("Invalid endpoint '{name}': {message}")]
    InvalidEndpoint { name: String, message: String },

    /// A path placeholder has no matching parameter
    #[error("Missing path parameter '{param}' for template '{template}'")]
    MissingPathParam { template: String, param: String },

    /// A path parameter value would escape its segment
    #[error("Invalid value for path parameter '{param}': '{value}'")]
    InvalidPathParam { param: String, value: String },

    /// Upstream page reports the resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A required field could not be located on the page
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A field was found but its value could not be interpreted
    #[error("Malformed field '{field}': {message}")]
    MalformedField {
        field: &'static str,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied parameter rejected before scraping
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create an endpoint validation error.
    pub fn invalid_endpoint(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a malformed field error.
    pub fn malformed(field: &'static str, message: impl fmt::Display) -> Self {
        Self::MalformedField {
            field,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Map this error onto the outcome reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownEndpoint(_)
            | Self::InvalidEndpoint { .. }
            | Self::MissingPathParam { .. }
            | Self::InvalidPathParam { .. }
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Http(_) => ErrorKind::ServiceUnavailable,
            Self::Validation(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::ServerError,
        }
    }
}

/// Outcome kinds exposed to callers, with their HTTP equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    ServiceUnavailable,
    ServerError,
    InvalidInput,
}

impl ErrorKind {
    /// HTTP status code equivalent.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidInput => 422,
            ErrorKind::ServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Fixed public message for this outcome.
    pub fn detail(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "The requested resource could not be found.",
            ErrorKind::ServiceUnavailable => "The service is currently unavailable.",
            ErrorKind::ServerError => "The server encountered an unexpected error.",
            ErrorKind::InvalidInput => "The request parameters are invalid.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status(), self.detail())
    }
}

/// Classified failure returned by every scrape operation.
#[derive(Error, Debug, Clone, Serialize)]
#[error("{detail}")]
pub struct ScrapeError {
    pub kind: ErrorKind,
    pub status: u16,
    pub detail: String,
}

impl ScrapeError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            status: kind.status(),
            detail: kind.detail().to_string(),
        }
    }
}

impl From<AppError> for ScrapeError {
    fn from(err: AppError) -> Self {
        match err {
            // Caller validation passes through with its own message.
            AppError::Validation(message) => Self {
                kind: ErrorKind::InvalidInput,
                status: ErrorKind::InvalidInput.status(),
                detail: message,
            },
            other => Self::new(other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_failures_are_not_found() {
        assert_eq!(
            AppError::UnknownEndpoint("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::MissingPathParam {
                template: "dramas/{id}".into(),
                param: "id".into(),
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::NotFound("dramas/1/2".into()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn extraction_failures_are_server_errors() {
        assert_eq!(
            AppError::MissingField("title").kind(),
            ErrorKind::ServerError
        );
        assert_eq!(
            AppError::malformed("rating", "abc").kind(),
            ErrorKind::ServerError
        );
        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(AppError::from(json).kind(), ErrorKind::ServerError);
    }

    #[test]
    fn scrape_error_hides_internal_detail() {
        let err = ScrapeError::from(AppError::malformed("rating", "secret markup"));
        assert_eq!(err.kind, ErrorKind::ServerError);
        assert_eq!(err.status, 500);
        assert!(!err.detail.contains("secret"));
    }

    #[test]
    fn validation_passes_through() {
        let err = ScrapeError::from(AppError::validation("limit must be between 1 and 1000"));
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.status, 422);
        assert_eq!(err.detail, "limit must be between 1 and 1000");
    }
}
