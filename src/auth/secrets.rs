//! Google client secrets files.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Installed,
    Web,
}

#[derive(Clone, Deserialize)]
struct SecretsResource {
    client_id: String,
    #[serde(default)]
    project_id: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    auth_provider_x509_cert_url: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// The file downloaded from the Google Cloud console, keyed by app type.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum SecretsFile {
    Installed(SecretsResource),
    Web(SecretsResource),
}

/// OAuth client credentials.
#[derive(Clone)]
pub struct Secrets {
    pub app_type: AppType,
    pub client_id: String,
    pub project_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
}

impl Secrets {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        debug!("Loading secrets from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(data: &str) -> Result<Self, AuthError> {
        let (app_type, resource) = match serde_json::from_str(data)? {
            SecretsFile::Installed(resource) => (AppType::Installed, resource),
            SecretsFile::Web(resource) => (AppType::Web, resource),
        };
        Ok(Self {
            app_type,
            client_id: resource.client_id,
            project_id: resource.project_id,
            auth_uri: resource.auth_uri,
            token_uri: resource.token_uri,
            auth_provider_x509_cert_url: resource.auth_provider_x509_cert_url,
            client_secret: resource.client_secret,
            redirect_uris: resource.redirect_uris,
        })
    }

    /// First redirect URI usable by a loopback listener.
    pub fn redirect_uri(&self) -> Result<&str, AuthError> {
        self.redirect_uris
            .iter()
            .map(String::as_str)
            .find(|uri| *uri != "oob" && !uri.contains("urn:ietf:wg:oauth:2.0:oob"))
            .ok_or_else(|| {
                AuthError::InvalidRedirectUri("no loopback redirect URI in secrets".to_string())
            })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("app_type", &self.app_type)
            .field("client_id", &self.client_id)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
