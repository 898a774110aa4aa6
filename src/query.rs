//! Report, group and group item queries.
//!
//! A [`ReportQuery`] is validated locally against the [`Registry`] before
//! its URL is built, so an invalid request never reaches the network.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Local, NaiveDate};
use tracing::{debug, warn};

use crate::auth::Scopes;
use crate::error::QueryError;
use crate::reports::data;
use crate::reports::{Registry, ReportType};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        QueryError::request(format!("expected a date in YYYY-MM-DD format, got '{}'", value))
    })
}

/// Options for a report request. Unset dates default to the 28 days
/// ending today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub dimensions: Vec<String>,
    pub filters: BTreeMap<String, String>,
    pub metrics: Vec<String>,
    pub sort_options: Vec<String>,
    /// 0 for unlimited results
    pub max_results: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub currency: String,
    pub start_index: i64,
    pub include_historical_data: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            filters: BTreeMap::new(),
            metrics: Vec::new(),
            sort_options: Vec::new(),
            max_results: 0,
            start_date: None,
            end_date: None,
            currency: "USD".to_string(),
            start_index: 1,
            include_historical_data: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportQuery {
    dimensions: Vec<String>,
    filters: BTreeMap<String, String>,
    metrics: Vec<String>,
    sort_options: Vec<String>,
    max_results: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    currency: String,
    start_index: i64,
    include_historical_data: bool,
    rtype: Option<ReportType>,
}

impl ReportQuery {
    pub fn new(options: ReportOptions) -> Self {
        let end_date = options
            .end_date
            .unwrap_or_else(|| Local::now().date_naive());
        let start_date = options
            .start_date
            .unwrap_or(end_date - Duration::days(28));

        Self {
            dimensions: options.dimensions,
            filters: options.filters,
            metrics: options.metrics,
            sort_options: options.sort_options,
            max_results: options.max_results,
            start_date,
            end_date,
            currency: options.currency,
            start_index: options.start_index,
            include_historical_data: options.include_historical_data,
            rtype: None,
        }
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn sort_options(&self) -> &[String] {
        &self.sort_options
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// The resolved report type, once validation has run.
    pub fn report_type(&self) -> Option<&ReportType> {
        self.rtype.as_ref()
    }

    /// Check the query, resolve its report type and fill in defaults.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    /// Month reports have their dates moved to the first of the month.
    pub fn validate(
        &mut self,
        registry: &Registry,
        scopes: Scopes,
    ) -> Result<&ReportType, QueryError> {
        debug!("Validating request");

        if self.max_results < 0 {
            return Err(QueryError::request(
                "the max results should be non-negative (0 for unlimited results)",
            ));
        }

        if self.end_date < self.start_date {
            return Err(QueryError::request(
                "the start date should be earlier than the end date",
            ));
        }

        if !data::is_currency(&self.currency) {
            return Err(QueryError::request(format!(
                "expected a valid ISO 4217 currency code, got '{}'",
                self.currency
            )));
        }

        if self.start_index < 1 {
            return Err(QueryError::request("the start index should be positive"));
        }

        if self.dimensions.iter().any(|d| d == "month")
            && (self.start_date.day() != 1 || self.end_date.day() != 1)
        {
            warn!(
                "Correcting start and end dates; if 'month' is passed as a dimension, \
                 these should always be the first day of the month"
            );
            self.start_date = first_of_month(self.start_date);
            self.end_date = first_of_month(self.end_date);
        }
        debug!(
            "Getting data between {} and {}",
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT)
        );

        let rtype = registry.determine(&self.dimensions, &self.filters)?.clone();
        debug!("Report type determined as '{}'", rtype.name());

        if self.metrics.is_empty() {
            self.metrics = data::ALL_METRICS_ORDERED
                .iter()
                .filter(|m| rtype.metrics().contains(m))
                .map(|m| m.to_string())
                .collect();
        }

        if !scopes.contains(Scopes::MONETARY_READONLY) {
            self.metrics.retain(|m| !data::is_revenue_metric(m));
        } else if !scopes.contains(Scopes::READONLY) {
            self.metrics.retain(|m| data::is_revenue_metric(m));
        }
        debug!("Metrics set to: {}", self.metrics.join(", "));

        let unmatched: BTreeSet<&str> = self
            .sort_options
            .iter()
            .map(|o| o.trim_start_matches('-'))
            .filter(|o| !self.metrics.iter().any(|m| m.as_str() == *o))
            .collect();
        if !unmatched.is_empty() {
            return Err(QueryError::request(format!(
                "sort options must be included as metrics: {}",
                unmatched.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        rtype.validate(
            &self.dimensions,
            &self.filters,
            &self.metrics,
            &self.sort_options,
            self.max_results,
            self.start_index,
        )?;

        debug!("Request OK");
        Ok(&*self.rtype.insert(rtype))
    }

    /// Query string against the default reports endpoint.
    pub fn build_url(&self) -> String {
        self.build_url_at("https://youtubeanalytics.googleapis.com/v2/reports")
    }

    /// Full request URL. Parameters are always emitted in the same order.
    pub fn build_url_at(&self, endpoint: &str) -> String {
        let filters = self
            .filters
            .iter()
            .map(|(k, v)| format!("{}=={}", k, encode_list(v)))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}?ids=channel==MINE\
             &dimensions={}\
             &filters={}\
             &metrics={}\
             &sort={}\
             &maxResults={}\
             &startDate={}\
             &endDate={}\
             &currency={}\
             &startIndex={}\
             &includeHistoricalData={}",
            endpoint,
            self.dimensions.join(","),
            filters,
            self.metrics.join(","),
            self.sort_options.join(","),
            self.max_results,
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT),
            self.currency,
            self.start_index,
            self.include_historical_data,
        )
    }
}

/// Percent-encodes each comma-separated item. The separators stay literal.
fn encode_list(value: &str) -> String {
    value
        .split(',')
        .map(|item| urlencoding::encode(item).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Groups owned by the authorised channel, or specific groups by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupQuery {
    pub ids: Vec<String>,
    pub page_token: Option<String>,
}

impl GroupQuery {
    pub fn new(ids: Vec<String>, page_token: Option<String>) -> Self {
        Self { ids, page_token }
    }

    pub fn build_url_at(&self, endpoint: &str) -> String {
        let ids = if self.ids.is_empty() {
            "mine=true".to_string()
        } else {
            format!("id={}", encode_list(&self.ids.join(",")))
        };
        match &self.page_token {
            Some(token) => format!(
                "{}?{}&pageToken={}",
                endpoint,
                ids,
                urlencoding::encode(token)
            ),
            None => format!("{}?{}", endpoint, ids),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupItemQuery {
    pub group_id: String,
}

impl GroupItemQuery {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }

    pub fn build_url_at(&self, endpoint: &str) -> String {
        format!("{}?groupId={}", endpoint, urlencoding::encode(&self.group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportKind;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn validated(options: ReportOptions) -> Result<ReportQuery, QueryError> {
        let mut query = ReportQuery::new(options);
        query.validate(Registry::global(), Scopes::ALL_READONLY)?;
        Ok(query)
    }

    fn message(err: QueryError) -> String {
        err.to_string()
    }

    #[test]
    fn test_default_date_window() {
        let query = ReportQuery::new(ReportOptions::default());
        let today = Local::now().date_naive();
        assert_eq!(query.end_date(), today);
        assert_eq!(query.start_date(), today - Duration::days(28));
        assert!(query.report_type().is_none());
    }

    #[test]
    fn test_month_dates_normalised() {
        let query = validated(ReportOptions {
            dimensions: strings(&["month"]),
            start_date: Some(date(2021, 4, 2)),
            end_date: Some(date(2022, 3, 31)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.start_date(), date(2021, 4, 1));
        assert_eq!(query.end_date(), date(2022, 3, 1));
    }

    #[test]
    fn test_negative_max_results_checked_first() {
        let err = validated(ReportOptions {
            max_results: -1,
            currency: "LOL".to_string(),
            start_index: 0,
            start_date: Some(date(2022, 1, 2)),
            end_date: Some(date(2022, 1, 1)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            message(err),
            "the max results should be non-negative (0 for unlimited results)"
        );
    }

    #[test]
    fn test_end_before_start() {
        let err = validated(ReportOptions {
            start_date: Some(date(2022, 1, 2)),
            end_date: Some(date(2022, 1, 1)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "the start date should be earlier than the end date");
    }

    #[test]
    fn test_date_order_checked_before_currency() {
        let err = validated(ReportOptions {
            currency: "LOL".to_string(),
            start_date: Some(date(2022, 1, 2)),
            end_date: Some(date(2022, 1, 1)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "the start date should be earlier than the end date");
    }

    #[test]
    fn test_currency_checked_before_start_index() {
        let err = validated(ReportOptions {
            currency: "LOL".to_string(),
            start_index: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "expected a valid ISO 4217 currency code, got 'LOL'");
    }

    #[test]
    fn test_start_index_checked_before_month_correction() {
        let mut query = ReportQuery::new(ReportOptions {
            dimensions: strings(&["month"]),
            start_date: Some(date(2021, 4, 2)),
            end_date: Some(date(2022, 3, 31)),
            start_index: 0,
            ..Default::default()
        });
        let err = query
            .validate(Registry::global(), Scopes::ALL_READONLY)
            .unwrap_err();
        assert_eq!(message(err), "the start index should be positive");
        assert_eq!(query.start_date(), date(2021, 4, 2));
        assert_eq!(query.end_date(), date(2022, 3, 31));
    }

    #[test]
    fn test_month_dates_on_first_unchanged() {
        let query = validated(ReportOptions {
            dimensions: strings(&["month"]),
            start_date: Some(date(2021, 4, 1)),
            end_date: Some(date(2022, 3, 1)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.start_date(), date(2021, 4, 1));
        assert_eq!(query.end_date(), date(2022, 3, 1));
    }

    #[test]
    fn test_invalid_currency() {
        let err = validated(ReportOptions {
            currency: "LOL".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "expected a valid ISO 4217 currency code, got 'LOL'");
    }

    #[test]
    fn test_start_index_positive() {
        let err = validated(ReportOptions {
            start_index: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "the start index should be positive");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2022-03-31").unwrap(), date(2022, 3, 31));
        assert!(parse_date("2022-02-30").is_err());
        assert!(parse_date("31/03/2022").is_err());
    }

    #[test]
    fn test_url_parameter_order() {
        // Building does not require validation; this combination has no
        // report type of its own.
        let query = ReportQuery::new(ReportOptions {
            dimensions: strings(&["day", "country"]),
            filters: [("continent".to_string(), "002".to_string())].into(),
            metrics: strings(&["views", "likes"]),
            sort_options: strings(&["-views"]),
            start_date: Some(date(2022, 1, 1)),
            end_date: Some(date(2022, 1, 31)),
            ..Default::default()
        });
        let url = query.build_url();
        assert!(url.contains(
            "dimensions=day,country&filters=continent==002&metrics=views,likes&sort=-views"
        ));
        assert_eq!(
            url,
            "https://youtubeanalytics.googleapis.com/v2/reports?ids=channel==MINE\
             &dimensions=day,country&filters=continent==002&metrics=views,likes\
             &sort=-views&maxResults=0&startDate=2022-01-01&endDate=2022-01-31\
             &currency=USD&startIndex=1&includeHistoricalData=false"
        );
    }

    #[test]
    fn test_url_multiple_filters() {
        let query = validated(ReportOptions {
            dimensions: strings(&["day"]),
            filters: [
                ("country".to_string(), "US".to_string()),
                ("video".to_string(), "dQw4w9WgXcQ".to_string()),
            ]
            .into(),
            metrics: strings(&["views"]),
            start_date: Some(date(2022, 1, 1)),
            end_date: Some(date(2022, 1, 31)),
            include_historical_data: true,
            ..Default::default()
        })
        .unwrap();
        let url = query.build_url_at("http://127.0.0.1/reports");
        assert!(url.starts_with("http://127.0.0.1/reports?ids=channel==MINE&dimensions=day&"));
        assert!(url.contains("&filters=country==US;video==dQw4w9WgXcQ&"));
        assert!(url.ends_with("&includeHistoricalData=true"));
    }

    #[test]
    fn test_filter_values_are_encoded() {
        let query = validated(ReportOptions {
            dimensions: strings(&["day"]),
            filters: [("video".to_string(), "a&b=c,d#e".to_string())].into(),
            metrics: strings(&["views"]),
            ..Default::default()
        })
        .unwrap();
        let url = query.build_url();
        assert!(url.contains("&filters=video==a%26b%3Dc,d%23e&metrics=views&"));
        assert!(!url.contains("&b=c"));
    }

    #[test]
    fn test_default_metrics_in_canonical_order() {
        let query = validated(ReportOptions {
            dimensions: strings(&["day"]),
            ..Default::default()
        })
        .unwrap();
        let rtype = query.report_type().unwrap();
        assert_eq!(rtype.kind(), ReportKind::TimeBasedActivity);

        let expected: Vec<String> = data::ALL_METRICS_ORDERED
            .iter()
            .filter(|m| rtype.metrics().contains(m))
            .map(|m| m.to_string())
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(query.metrics(), expected.as_slice());
    }

    #[test]
    fn test_scopes_filter_revenue_metrics() {
        let options = ReportOptions {
            dimensions: strings(&["day"]),
            ..Default::default()
        };

        let mut query = ReportQuery::new(options.clone());
        query.validate(Registry::global(), Scopes::READONLY).unwrap();
        assert!(!query.metrics().is_empty());
        assert!(query.metrics().iter().all(|m| !data::is_revenue_metric(m)));

        let mut query = ReportQuery::new(options);
        query
            .validate(Registry::global(), Scopes::MONETARY_READONLY)
            .unwrap();
        assert!(!query.metrics().is_empty());
        assert!(query.metrics().iter().all(|m| data::is_revenue_metric(m)));
    }

    #[test]
    fn test_sort_options_must_be_metrics() {
        let err = validated(ReportOptions {
            dimensions: strings(&["day"]),
            metrics: strings(&["views"]),
            sort_options: strings(&["-likes", "views"]),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "sort options must be included as metrics: likes");
    }

    #[test]
    fn test_unresolvable_combination() {
        let err = validated(ReportOptions {
            dimensions: strings(&["lol"]),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, QueryError::UnresolvableReportType { .. }));
    }

    #[test]
    fn test_report_type_validation_runs_last() {
        let err = validated(ReportOptions {
            dimensions: strings(&["day"]),
            metrics: strings(&["lol"]),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(message(err), "invalid metric(s) provided: lol");
    }

    #[test]
    fn test_group_query_urls() {
        let endpoint = "https://youtubeanalytics.googleapis.com/v2/groups";
        assert_eq!(
            GroupQuery::default().build_url_at(endpoint),
            "https://youtubeanalytics.googleapis.com/v2/groups?mine=true"
        );
        assert_eq!(
            GroupQuery::new(strings(&["a", "b"]), Some("next".to_string())).build_url_at(endpoint),
            "https://youtubeanalytics.googleapis.com/v2/groups?id=a,b&pageToken=next"
        );
    }

    #[test]
    fn test_group_item_query_url() {
        assert_eq!(
            GroupItemQuery::new("abc").build_url_at("http://x/groupItems"),
            "http://x/groupItems?groupId=abc"
        );
        assert_eq!(
            GroupItemQuery::new("a&mine=true").build_url_at("http://x/groupItems"),
            "http://x/groupItems?groupId=a%26mine%3Dtrue"
        );
    }
}
