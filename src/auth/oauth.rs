//! OAuth2 authorization-code client for Google APIs.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use rand::RngCore;
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::flow;
use crate::auth::scopes::Scopes;
use crate::auth::secrets::Secrets;
use crate::auth::tokens::{TokenResponse, Tokens};
use crate::client::TokenProvider;
use crate::config::Config;
use crate::error::AuthError;

/// Random URL-safe token for `state` and `nonce`.
pub fn state_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Everything needed to send the user to the consent screen and check
/// the redirect that comes back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub redirect_uri: String,
    pub state: String,
    pub nonce: String,
}

#[derive(Clone)]
pub struct OAuth2Client {
    secrets: Secrets,
    scopes: Scopes,
    tokens_file: PathBuf,
    redirect_port: u16,
    token_buffer: Duration,
    http_client: Client,
    tokens: Arc<RwLock<Option<Tokens>>>,
}

impl OAuth2Client {
    pub fn new(config: &Config, secrets: Secrets) -> Result<Self, AuthError> {
        let scopes = config.scopes();
        scopes.validate()?;

        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            secrets,
            scopes,
            tokens_file: PathBuf::from(&config.tokens_file),
            redirect_port: config.redirect_port,
            token_buffer: config.token_buffer(),
            http_client,
            tokens: Arc::new(RwLock::new(None)),
        })
    }

    pub fn scopes(&self) -> Scopes {
        self.scopes
    }

    /// Build the consent-screen URL for a loopback redirect on `port`.
    pub fn authorization_request(&self, port: u16) -> Result<AuthorizationRequest, AuthError> {
        let base = self.secrets.redirect_uri()?;
        let redirect_uri = if port == 80 {
            base.to_string()
        } else {
            format!("{}:{}", base.trim_end_matches('/'), port)
        };
        let state = state_token();
        let nonce = state_token();
        let scope = self.scopes.formatted();

        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("nonce", nonce.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state.as_str()),
            ("access_type", "offline"),
        ];
        let url = format!("{}?{}", self.secrets.auth_uri, form_encode(&params));

        Ok(AuthorizationRequest {
            url,
            redirect_uri,
            state,
            nonce,
        })
    }

    /// Trade an authorisation code for tokens.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Tokens, AuthError> {
        debug!("Exchanging authorisation code for tokens");
        let body = form_encode(&[
            ("code", code),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ]);
        let response = self.post_token_request(body).await?;
        Tokens::from_response(response)
    }

    /// Refresh an access token in place.
    pub async fn refresh(&self, tokens: &mut Tokens) -> Result<(), AuthError> {
        debug!("Refreshing access token");
        let body = form_encode(&[
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("refresh_token", tokens.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ]);
        let response = match self.post_token_request(body).await {
            Err(AuthError::TokenRequestFailed { status, .. })
                if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED =>
            {
                return Err(AuthError::RefreshTokenExpired);
            }
            other => other?,
        };
        tokens.update(response);
        info!("Access token refreshed");
        Ok(())
    }

    /// Produce usable tokens: saved ones if still valid, refreshed ones if
    /// they can be, otherwise a fresh browser flow. The result is saved
    /// and cached for [`TokenProvider::access_token`].
    pub async fn authorise(&self, force: bool) -> Result<Tokens, AuthError> {
        let saved = if force || !self.tokens_file.is_file() {
            None
        } else {
            Some(Tokens::load_from(&self.tokens_file)?)
        };

        let tokens = match saved {
            Some(tokens) if !tokens.are_scoped_for(self.scopes) => {
                warn!("Saved tokens lack the requested scopes; reauthorising");
                self.run_flow().await?
            }
            Some(tokens) if !tokens.is_expired(self.token_buffer) => tokens,
            Some(mut tokens) => match self.refresh(&mut tokens).await {
                Ok(()) => tokens,
                Err(AuthError::RefreshTokenExpired) => {
                    warn!("Refresh token has expired or been revoked; reauthorising");
                    self.run_flow().await?
                }
                Err(e) => return Err(e),
            },
            None => self.run_flow().await?,
        };

        tokens.save_to(&self.tokens_file)?;
        *self.tokens.write().await = Some(tokens.clone());
        Ok(tokens)
    }

    async fn run_flow(&self) -> Result<Tokens, AuthError> {
        let request = self.authorization_request(self.redirect_port)?;
        let listener = flow::bind(&request.redirect_uri).await?;
        info!(
            "You need to authorise access. Open this URL in your browser:\n{}",
            request.url
        );
        let code = flow::receive_code(listener, &request.state).await?;
        self.exchange_code(&code, &request.redirect_uri).await
    }

    async fn post_token_request(&self, body: String) -> Result<TokenResponse, AuthError> {
        let response = self
            .http_client
            .post(&self.secrets.token_uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Token request failed: {} - {}", status, body);
            return Err(AuthError::TokenRequestFailed { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::TokenParse(format!("Failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for OAuth2Client {
    async fn access_token(&self) -> Result<String, AuthError> {
        {
            let cache = self.tokens.read().await;
            match cache.as_ref() {
                Some(tokens) if !tokens.is_expired(self.token_buffer) => {
                    return Ok(tokens.access_token.clone());
                }
                Some(_) => {}
                None => return Err(AuthError::NoToken),
            }
        }

        let mut cache = self.tokens.write().await;
        let tokens = cache.as_mut().ok_or(AuthError::NoToken)?;
        // Another task may have refreshed while the write lock was pending.
        if tokens.is_expired(self.token_buffer) {
            self.refresh(tokens).await?;
            tokens.save_to(&self.tokens_file)?;
        }
        Ok(tokens.access_token.clone())
    }
}

fn form_encode(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl std::fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("client_id", &self.secrets.client_id)
            .field("scopes", &self.scopes)
            .field("tokens_file", &self.tokens_file)
            .finish()
    }
}
