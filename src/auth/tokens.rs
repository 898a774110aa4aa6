//! OAuth tokens and their on-disk form.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::scopes::Scopes;
use crate::error::AuthError;

fn default_expires_in() -> i64 {
    3599
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Body of a token endpoint response. Refresh responses omit
/// `refresh_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Absolute expiry. Token files written elsewhere lack it; those tokens
    /// are treated as expired and refreshed on first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Tokens {
    /// Build tokens from an authorisation-code exchange.
    pub fn from_response(response: TokenResponse) -> Result<Self, AuthError> {
        let refresh_token = response.refresh_token.ok_or_else(|| {
            AuthError::TokenParse("token response did not include a refresh token".to_string())
        })?;
        Ok(Self {
            expires_at: Some(Utc::now() + Duration::seconds(response.expires_in)),
            access_token: response.access_token,
            expires_in: response.expires_in,
            scope: response.scope,
            token_type: response.token_type,
            refresh_token,
            id_token: response.id_token,
        })
    }

    /// Apply a refresh response. A new refresh token replaces the old one
    /// only if the server sent one.
    pub fn update(&mut self, response: TokenResponse) {
        self.expires_at = Some(Utc::now() + Duration::seconds(response.expires_in));
        self.access_token = response.access_token;
        self.expires_in = response.expires_in;
        if !response.scope.is_empty() {
            self.scope = response.scope;
        }
        self.token_type = response.token_type;
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = refresh_token;
        }
        if response.id_token.is_some() {
            self.id_token = response.id_token;
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        debug!("Loading tokens from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(data: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), AuthError> {
        let path = path.as_ref();
        debug!("Saving tokens to {}", path.display());
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// True when the access token expires within `buffer`.
    pub fn is_expired(&self, buffer: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + buffer >= expires_at,
            None => true,
        }
    }

    /// Whether the granted scopes cover everything in `scopes`.
    pub fn are_scoped_for(&self, scopes: Scopes) -> bool {
        let granted: Vec<&str> = self.scope.split_whitespace().collect();
        let sufficient = scopes
            .formatted()
            .split_whitespace()
            .all(|scope| granted.contains(&scope));
        debug!(
            "Stored scopes are {}sufficient",
            if sufficient { "" } else { "in" }
        );
        sufficient
    }
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "a1b2c3d4e5".to_string(),
            expires_in: 3599,
            scope: Scopes::ALL_READONLY.formatted(),
            token_type: "Bearer".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            id_token: None,
        }
    }

    #[test]
    fn test_from_response_requires_refresh_token() {
        assert!(Tokens::from_response(response(None)).is_err());
        let tokens = Tokens::from_response(response(Some("f6g7h8i9j0"))).unwrap();
        assert_eq!(tokens.refresh_token, "f6g7h8i9j0");
        assert!(!tokens.is_expired(Duration::seconds(60)));
    }

    #[test]
    fn test_update_keeps_refresh_token() {
        let mut tokens = Tokens::from_response(response(Some("f6g7h8i9j0"))).unwrap();
        let mut refreshed = response(None);
        refreshed.access_token = "k1l2m3n4o5".to_string();
        tokens.update(refreshed);
        assert_eq!(tokens.access_token, "k1l2m3n4o5");
        assert_eq!(tokens.refresh_token, "f6g7h8i9j0");
    }

    #[test]
    fn test_expiry_with_buffer() {
        let mut tokens = Tokens::from_response(response(Some("r"))).unwrap();
        tokens.expires_at = Some(Utc::now() + Duration::seconds(30));
        assert!(tokens.is_expired(Duration::seconds(60)));
        assert!(!tokens.is_expired(Duration::seconds(5)));

        tokens.expires_at = None;
        assert!(tokens.is_expired(Duration::zero()));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let tokens = Tokens::from_response(response(Some("r"))).unwrap();
        tokens.save_to(&path).unwrap();
        assert_eq!(Tokens::load_from(&path).unwrap(), tokens);
    }

    #[test]
    fn test_load_without_expiry() {
        let tokens = Tokens::from_json(
            r#"{"access_token": "a", "expires_in": 3599, "scope": "",
                "token_type": "Bearer", "refresh_token": "r"}"#,
        )
        .unwrap();
        assert!(tokens.expires_at.is_none());
        assert!(tokens.is_expired(Duration::zero()));
    }

    #[test]
    fn test_scope_check() {
        let tokens = Tokens::from_response(response(Some("r"))).unwrap();
        assert!(tokens.are_scoped_for(Scopes::READONLY));
        assert!(tokens.are_scoped_for(Scopes::ALL_READONLY));
        assert!(!tokens.are_scoped_for(Scopes::ALL));
    }
}
