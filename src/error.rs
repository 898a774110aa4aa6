//! Unified error types for the YouTube Analytics client.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Query validation errors. These are always raised locally, before any
/// request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("no report type supports dimensions [{dimensions}] with filters [{filters}]")]
    UnresolvableReportType { dimensions: String, filters: String },
}

impl QueryError {
    pub(crate) fn request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Names that are not known to the API at all.
    pub(crate) fn invalid(noun: &str, diff: &[&str]) -> Self {
        Self::request(format!("invalid {}(s) provided: {}", noun, diff.join(", ")))
    }

    /// Names the API knows, but the resolved report type does not accept.
    pub(crate) fn unsupported(noun: &str, diff: &[&str]) -> Self {
        Self::request(format!(
            "unsupported {}(s) for selected report type: {}",
            noun,
            diff.join(", ")
        ))
    }

    pub(crate) fn invalid_set(noun: &str, expected: &str, values: &[&str], got: usize) -> Self {
        Self::request(format!(
            "expected {} {}(s) from {}, got {}",
            expected,
            noun,
            values.join(", "),
            got
        ))
    }

    pub(crate) fn invalid_filter_value(key: &str, value: &str) -> Self {
        Self::request(format!("invalid value for filter '{}': '{}'", key, value))
    }

    pub(crate) fn unsupported_filter_value(key: &str, value: &str) -> Self {
        Self::request(format!(
            "unsupported value for filter '{}' for selected report type: '{}'",
            key, value
        ))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token request failed with status {status}: {body}")]
    TokenRequestFailed { status: StatusCode, body: String },

    #[error("Token parse error: {0}")]
    TokenParse(String),

    #[error("No token available")]
    NoToken,

    #[error("Refresh token has expired or been revoked")]
    RefreshTokenExpired,

    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    #[error("Authorisation state mismatch")]
    StateMismatch,

    #[error("Authorisation callback did not contain a code: {0}")]
    MissingCode(String),

    #[error("Invalid scopes: {0}")]
    InvalidScopes(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("API error [{code}]: {message}")]
    Api { code: u16, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// Report export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File already exists and overwrite is disabled: {}", .0.display())]
    FileExists(PathBuf),

    #[error("Invalid export format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_missing_field_display() {
        let error = ConfigError::MissingField("secrets_file".to_string());
        assert_eq!(error.to_string(), "Missing required field: secrets_file");
    }

    #[test]
    fn test_config_error_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(config_err.to_string().contains("IO error"));
    }

    #[test]
    fn test_invalid_request_displays_bare_message() {
        let error = QueryError::request("the start index should be positive");
        assert_eq!(error.to_string(), "the start index should be positive");
    }

    #[test]
    fn test_invalid_set_message() {
        let error = QueryError::invalid_set("dimension", "1", &["day", "month"], 2);
        assert_eq!(
            error.to_string(),
            "expected 1 dimension(s) from day, month, got 2"
        );
    }

    #[test]
    fn test_unresolvable_display() {
        let error = QueryError::UnresolvableReportType {
            dimensions: "day, month".to_string(),
            filters: "".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "no report type supports dimensions [day, month] with filters []"
        );
    }

    #[test]
    fn test_auth_error_token_request_failed_display() {
        let error = AuthError::TokenRequestFailed {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid_grant".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("401"));
        assert!(display.contains("invalid_grant"));
    }

    #[test]
    fn test_api_error_from_query_error() {
        let api_error: ApiError = QueryError::request("bad").into();
        assert_eq!(api_error.to_string(), "Invalid query: bad");
    }

    #[test]
    fn test_api_error_api_display() {
        let error = ApiError::Api {
            code: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(error.to_string(), "API error [403]: Forbidden");
    }

    #[test]
    fn test_api_error_from_auth_error() {
        let api_error: ApiError = AuthError::NoToken.into();
        assert!(api_error.to_string().contains("Authentication error"));
    }

    #[test]
    fn test_export_error_file_exists_display() {
        let error = ExportError::FileExists(PathBuf::from("report.csv"));
        assert!(error.to_string().contains("report.csv"));
    }
}
