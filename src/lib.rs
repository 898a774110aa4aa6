//! Client for the YouTube Analytics reporting API.
//!
//! Report queries are checked against a fixed catalog of report types
//! before anything is sent. The [`Registry`] resolves which report type a
//! dimension/filter combination belongs to, [`ReportQuery::validate`]
//! applies that type's rules, and [`ReportQuery::build_url`] renders the
//! request. [`AnalyticsClient`] sends it with a token from any
//! [`TokenProvider`], such as [`auth::OAuth2Client`].

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod groups;
pub mod query;
pub mod reports;

pub use auth::{OAuth2Client, Scopes, Secrets, Tokens};
pub use client::{AnalyticsClient, StaticToken, TokenProvider};
pub use config::Config;
pub use error::{ApiError, AuthError, ConfigError, ExportError, QueryError};
pub use groups::{Group, GroupItem, GroupItemList, GroupList};
pub use query::{GroupItemQuery, GroupQuery, ReportOptions, ReportQuery};
pub use reports::{ExportFormat, Registry, Report, ReportKind, ReportType};
