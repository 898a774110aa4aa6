//! Ordered catalog of report types and report-type resolution.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::QueryError;
use crate::reports::types::{ReportKind, ReportType};

static STANDARD: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::standard()));

/// Report types in resolution order. The first type whose dimension and
/// filter rules accept a request wins.
#[derive(Debug, Clone)]
pub struct Registry {
    types: Vec<ReportType>,
}

impl Registry {
    /// Every report type the API supports.
    pub fn standard() -> Self {
        Self::from_kinds(&ReportKind::ALL)
    }

    /// A registry over a subset of kinds, resolved in the given order.
    pub fn from_kinds(kinds: &[ReportKind]) -> Self {
        Self {
            types: kinds.iter().map(|kind| kind.descriptor()).collect(),
        }
    }

    /// Process-wide standard registry, built on first use.
    pub fn global() -> &'static Registry {
        &STANDARD
    }

    /// Shared handle to the standard registry.
    pub fn shared() -> Arc<Registry> {
        Arc::clone(&STANDARD)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportType> {
        self.types.iter()
    }

    pub fn get(&self, kind: ReportKind) -> Option<&ReportType> {
        self.types.iter().find(|rtype| rtype.kind() == kind)
    }

    /// Pick the report type for a dimension/filter combination.
    ///
    /// Matching is structural: dimension names and filter keys must be
    /// accepted by the type and satisfy its set rules. Filter values and
    /// metrics are checked later, against the type this returns.
    pub fn determine(
        &self,
        dimensions: &[String],
        filters: &BTreeMap<String, String>,
    ) -> Result<&ReportType, QueryError> {
        let dims: HashSet<&str> = dimensions.iter().map(String::as_str).collect();
        let keys: HashSet<&str> = filters.keys().map(String::as_str).collect();

        self.types
            .iter()
            .find(|rtype| rtype.dimensions().matches(&dims) && rtype.filters().matches(&keys))
            .ok_or_else(|| QueryError::UnresolvableReportType {
                dimensions: dimensions.join(", "),
                filters: filters
                    .iter()
                    .map(|(k, v)| format!("{}=={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
