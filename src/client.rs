//! HTTP transport for the analytics API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::auth::Scopes;
use crate::config::Config;
use crate::error::{ApiError, AuthError};
use crate::groups::{GroupItemList, GroupList};
use crate::query::{GroupItemQuery, GroupQuery, ReportQuery};
use crate::reports::{Registry, Report, ReportKind, ResultTable};

/// Source of bearer tokens for API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed access token, for callers that manage authorisation themselves.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

/// Google API error body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: u16,
    message: String,
}

#[derive(Clone)]
pub struct AnalyticsClient {
    config: Config,
    http_client: Client,
    tokens: Arc<dyn TokenProvider>,
    registry: Arc<Registry>,
    scopes: Scopes,
}

impl AnalyticsClient {
    pub fn new(config: Config, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;
        let scopes = config.scopes();

        Ok(Self {
            config,
            http_client,
            tokens,
            registry: Registry::shared(),
            scopes,
        })
    }

    /// Use a registry other than the standard catalog.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scopes(&self) -> Scopes {
        self.scopes
    }

    /// Validate a query and return the URL it would be sent to.
    pub fn prepare(&self, query: &mut ReportQuery) -> Result<String, ApiError> {
        self.prepare_kind(query).map(|(url, _)| url)
    }

    fn prepare_kind(&self, query: &mut ReportQuery) -> Result<(String, ReportKind), ApiError> {
        let kind = query.validate(&self.registry, self.scopes)?.kind();
        Ok((query.build_url_at(&self.config.reports_url()), kind))
    }

    /// Validate and run a report query.
    pub async fn retrieve_report(&self, mut query: ReportQuery) -> Result<Report, ApiError> {
        let (url, kind) = self.prepare_kind(&mut query)?;
        let table: ResultTable = self.execute_get(&url).await?;
        Ok(Report::new(table, kind))
    }

    pub async fn fetch_groups(&self, query: &GroupQuery) -> Result<GroupList, ApiError> {
        let url = query.build_url_at(&self.config.groups_url());
        self.execute_get(&url).await
    }

    pub async fn fetch_group_items(&self, query: &GroupItemQuery) -> Result<GroupItemList, ApiError> {
        let url = query.build_url_at(&self.config.group_items_url());
        self.execute_get(&url).await
    }

    async fn execute_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let token = self.tokens.access_token().await?;
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            debug!("Error response: {} - {}", status, body);
            Err(parse_error_response(status, &body))
        }
    }
}

fn parse_error_response(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => ApiError::Api {
            code: error.error.code,
            message: error.error.message,
        },
        Err(_) => ApiError::HttpError {
            status,
            body: body.to_string(),
        },
    }
}

impl std::fmt::Debug for AnalyticsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::query::ReportOptions;

    fn client() -> AnalyticsClient {
        let config = Config {
            api_base_url: "http://127.0.0.1:1/v2".to_string(),
            ..Config::for_secrets("secrets.json")
        };
        AnalyticsClient::new(config, Arc::new(StaticToken::new("a1b2c3"))).unwrap()
    }

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken::new("a1b2c3");
        assert_eq!(provider.access_token().await.unwrap(), "a1b2c3");
        assert_eq!(format!("{:?}", provider), "StaticToken(..)");
    }

    #[test]
    fn test_prepare_uses_configured_endpoint() {
        let mut query = ReportQuery::new(ReportOptions {
            dimensions: vec!["day".to_string()],
            metrics: vec!["views".to_string()],
            ..Default::default()
        });
        let url = client().prepare(&mut query).unwrap();
        assert!(url.starts_with("http://127.0.0.1:1/v2/reports?ids=channel==MINE&dimensions=day&"));
        assert!(query.report_type().is_some());
    }

    #[test]
    fn test_custom_registry() {
        let client = client().with_registry(Arc::new(Registry::from_kinds(&[
            ReportKind::TimeBasedActivity,
        ])));
        assert_eq!(client.registry().len(), 1);

        let mut query = ReportQuery::new(ReportOptions {
            metrics: vec!["views".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            client.prepare(&mut query),
            Err(ApiError::Query(QueryError::UnresolvableReportType { .. }))
        ));

        let mut query = ReportQuery::new(ReportOptions {
            dimensions: vec!["day".to_string()],
            metrics: vec!["views".to_string()],
            ..Default::default()
        });
        client.prepare(&mut query).unwrap();
        assert_eq!(
            query.report_type().map(|rtype| rtype.kind()),
            Some(ReportKind::TimeBasedActivity)
        );
    }

    #[tokio::test]
    async fn test_invalid_query_fails_before_request() {
        // Nothing listens on port 1; a request would fail with a transport error.
        let query = ReportQuery::new(ReportOptions {
            currency: "LOL".to_string(),
            ..Default::default()
        });
        let err = client().retrieve_report(query).await.unwrap_err();
        assert!(matches!(err, ApiError::Query(QueryError::InvalidRequest(_))));
    }

    #[test]
    fn test_parse_google_error() {
        let err = parse_error_response(
            StatusCode::FORBIDDEN,
            r#"{"error": {"code": 403, "message": "Forbidden", "errors": []}}"#,
        );
        assert!(matches!(err, ApiError::Api { code: 403, ref message } if message == "Forbidden"));
    }

    #[test]
    fn test_parse_unstructured_error() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(
            err,
            ApiError::HttpError { status, .. } if status == StatusCode::BAD_GATEWAY
        ));
    }
}
