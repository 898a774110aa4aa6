//! Configuration management for the YouTube Analytics client.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::auth::Scopes;
use crate::error::ConfigError;

const DEFAULT_API_BASE_URL: &str = "https://youtubeanalytics.googleapis.com/v2";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Client secrets JSON downloaded from the Google Cloud console
    #[serde(default)]
    pub secrets_file: String,

    /// Where OAuth tokens are cached between runs
    #[serde(default = "default_tokens_file")]
    pub tokens_file: String,

    /// Scope names, e.g. "readonly", "monetary_readonly", "openid"
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Port for the loopback authorisation redirect
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,

    /// Base URL of the analytics API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Buffer before token expiration to refresh (seconds)
    #[serde(default = "default_token_buffer")]
    pub token_refresh_buffer_seconds: u64,
}

fn default_tokens_file() -> String {
    "tokens.json".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["readonly".to_string(), "monetary_readonly".to_string()]
}

fn default_redirect_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_token_buffer() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults for everything but the secrets file.
    pub fn for_secrets(secrets_file: impl Into<String>) -> Self {
        Self {
            secrets_file: secrets_file.into(),
            tokens_file: default_tokens_file(),
            scopes: default_scopes(),
            redirect_port: default_redirect_port(),
            api_base_url: default_api_base_url(),
            debug: false,
            timeout_seconds: default_timeout(),
            token_refresh_buffer_seconds: default_token_buffer(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secrets_file.is_empty() {
            return Err(ConfigError::MissingField("secrets_file".into()));
        }
        if self.tokens_file.is_empty() {
            return Err(ConfigError::MissingField("tokens_file".into()));
        }
        if self.redirect_port == 0 {
            return Err(ConfigError::Invalid(
                "redirect_port must be non-zero".into(),
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "Invalid api_base_url '{}'",
                self.api_base_url
            )));
        }

        let scopes = Scopes::from_names(&self.scopes)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        scopes
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Granted scopes. Unknown names are skipped; `validate` rejects them.
    pub fn scopes(&self) -> Scopes {
        self.scopes
            .iter()
            .filter_map(|name| Scopes::from_name(name))
            .fold(Scopes::empty(), |acc, scope| acc | scope)
    }

    fn api_url(&self, resource: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), resource)
    }

    /// Get the reports endpoint URL.
    pub fn reports_url(&self) -> String {
        self.api_url("reports")
    }

    /// Get the groups endpoint URL.
    pub fn groups_url(&self) -> String {
        self.api_url("groups")
    }

    /// Get the group items endpoint URL.
    pub fn group_items_url(&self) -> String {
        self.api_url("groupItems")
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    /// Get token refresh buffer as chrono Duration.
    pub fn token_buffer(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_refresh_buffer_seconds as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(json: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults_applied() {
        let (_dir, path) = write_config(r#"{"secrets_file": "secrets.json"}"#);
        let config = Config::load(&path).unwrap();

        assert_eq!(config.tokens_file, "tokens.json");
        assert_eq!(config.redirect_port, 8080);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.scopes(), Scopes::ALL_READONLY);
        assert!(!config.debug);
    }

    #[test]
    fn test_url_construction() {
        let config = Config::for_secrets("secrets.json");
        assert_eq!(
            config.reports_url(),
            "https://youtubeanalytics.googleapis.com/v2/reports"
        );
        assert_eq!(
            config.groups_url(),
            "https://youtubeanalytics.googleapis.com/v2/groups"
        );

        let config = Config {
            api_base_url: "http://127.0.0.1:9000/v2/".to_string(),
            ..Config::for_secrets("secrets.json")
        };
        assert_eq!(config.group_items_url(), "http://127.0.0.1:9000/v2/groupItems");
    }

    #[test]
    fn test_missing_secrets_file() {
        let (_dir, path) = write_config(r#"{"tokens_file": "t.json"}"#);
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "secrets_file"));
    }

    #[test]
    fn test_invalid_scopes() {
        let config = Config {
            scopes: vec!["openid".to_string()],
            ..Config::for_secrets("secrets.json")
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            scopes: vec!["readonly".to_string(), "lol".to_string()],
            ..Config::for_secrets("secrets.json")
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_redirect_port() {
        let config = Config {
            redirect_port: 0,
            ..Config::for_secrets("secrets.json")
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_durations() {
        let config = Config::for_secrets("secrets.json");
        assert_eq!(config.timeout(), std::time::Duration::from_secs(30));
        assert_eq!(config.token_buffer(), chrono::Duration::seconds(60));
    }
}
