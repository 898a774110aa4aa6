//! Feature-set rules.
//!
//! A report type is described by four feature types: dimensions, filters,
//! metrics and sort options. Dimensions and filters are segmented into
//! [`SetRule`]s, each constraining how many names from a group may appear.

use std::collections::{BTreeMap, HashSet};

use crate::error::QueryError;
use crate::reports::data;

/// How many names from a rule's group a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Every name in the group.
    Required,
    ExactlyOne,
    OneOrMore,
    /// Names are accepted but never demanded. Same check as `ZeroOrMore`.
    Optional,
    ZeroOrOne,
    ZeroOrMore,
}

impl Cardinality {
    fn admits(self, present: usize, total: usize) -> bool {
        match self {
            Cardinality::Required => present == total,
            Cardinality::ExactlyOne => present == 1,
            Cardinality::OneOrMore => present > 0,
            Cardinality::ZeroOrOne => present < 2,
            Cardinality::Optional | Cardinality::ZeroOrMore => true,
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            Cardinality::Required => "all",
            Cardinality::ExactlyOne => "1",
            Cardinality::OneOrMore => "at least 1",
            Cardinality::ZeroOrOne => "0 or 1",
            Cardinality::Optional | Cardinality::ZeroOrMore => "any",
        }
    }
}

/// A cardinality constraint over a named group.
///
/// Filter groups may lock a value with `key==value`, e.g. `isCurated==1`.
/// The key part takes part in cardinality checks; the value is enforced by
/// [`Filters::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRule {
    cardinality: Cardinality,
    values: &'static [&'static str],
}

impl SetRule {
    pub const fn new(cardinality: Cardinality, values: &'static [&'static str]) -> Self {
        Self { cardinality, values }
    }

    pub const fn required(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::Required, values)
    }

    pub const fn exactly_one(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::ExactlyOne, values)
    }

    pub const fn one_or_more(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::OneOrMore, values)
    }

    pub const fn optional(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::Optional, values)
    }

    pub const fn zero_or_one(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::ZeroOrOne, values)
    }

    pub const fn zero_or_more(values: &'static [&'static str]) -> Self {
        Self::new(Cardinality::ZeroOrMore, values)
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Raw entries, including any `==value` locks.
    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    /// Entry names with locks stripped.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        let values: &'static [&'static str] = self.values;
        values.iter().map(|entry| split_locked(entry).0)
    }

    /// `(key, value)` pairs for every locked entry.
    pub fn locked(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        let values: &'static [&'static str] = self.values;
        values.iter().filter_map(|entry| entry.split_once("=="))
    }

    fn present(&self, inputs: &HashSet<&str>) -> usize {
        self.keys().filter(|key| inputs.contains(key)).count()
    }

    pub fn is_satisfied_by(&self, inputs: &HashSet<&str>) -> bool {
        self.cardinality
            .admits(self.present(inputs), self.values.len())
    }

    fn check(&self, inputs: &HashSet<&str>, noun: &str) -> Result<(), QueryError> {
        if self.is_satisfied_by(inputs) {
            return Ok(());
        }
        Err(QueryError::invalid_set(
            noun,
            self.cardinality.expectation(),
            self.values,
            self.present(inputs),
        ))
    }
}

fn split_locked(entry: &'static str) -> (&'static str, Option<&'static str>) {
    match entry.split_once("==") {
        Some((key, value)) => (key, Some(value)),
        None => (entry, None),
    }
}

/// Names from `inputs` (first occurrence order, no repeats) failing `keep`.
fn difference<'a, I, F>(inputs: I, keep: F) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .filter(|name| !keep(name) && seen.insert(*name))
        .collect()
}

fn union_of(rules: &[SetRule]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    rules
        .iter()
        .flat_map(SetRule::keys)
        .filter(|key| seen.insert(*key))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    rules: Vec<SetRule>,
}

impl Dimensions {
    pub fn new(rules: Vec<SetRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SetRule] {
        &self.rules
    }

    /// Every dimension this feature type accepts.
    pub fn every(&self) -> Vec<&'static str> {
        union_of(&self.rules)
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.keys().any(|key| key == name))
    }

    /// Structural match: all inputs accepted and every rule satisfied.
    pub fn matches(&self, inputs: &HashSet<&str>) -> bool {
        inputs.iter().all(|name| self.accepts(name))
            && self.rules.iter().all(|rule| rule.is_satisfied_by(inputs))
    }

    pub fn validate(&self, inputs: &[String]) -> Result<(), QueryError> {
        let names = inputs.iter().map(String::as_str);

        let diff = difference(names.clone(), data::is_dimension);
        if !diff.is_empty() {
            return Err(QueryError::invalid("dimension", &diff));
        }

        let diff = difference(names.clone(), |name| self.accepts(name));
        if !diff.is_empty() {
            return Err(QueryError::unsupported("dimension", &diff));
        }

        let set: HashSet<&str> = names.collect();
        for rule in &self.rules {
            rule.check(&set, "dimension")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    rules: Vec<SetRule>,
}

impl Filters {
    pub fn new(rules: Vec<SetRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SetRule] {
        &self.rules
    }

    /// Every filter key this feature type accepts.
    pub fn every_key(&self) -> Vec<&'static str> {
        union_of(&self.rules)
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.keys().any(|k| k == key))
    }

    /// The value a key is pinned to, if any rule locks it.
    pub fn locked_value(&self, key: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .flat_map(SetRule::locked)
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Structural match on keys only; values are checked in `validate`.
    pub fn matches(&self, keys: &HashSet<&str>) -> bool {
        keys.iter().all(|key| self.accepts(key))
            && self.rules.iter().all(|rule| rule.is_satisfied_by(keys))
    }

    pub fn validate(&self, inputs: &BTreeMap<String, String>) -> Result<(), QueryError> {
        let keys = inputs.keys().map(String::as_str);

        let diff = difference(keys.clone(), data::is_filter);
        if !diff.is_empty() {
            return Err(QueryError::invalid("filter", &diff));
        }

        for (key, value) in inputs {
            if !data::is_valid_filter_value(key, value) {
                return Err(QueryError::invalid_filter_value(key, value));
            }
            if let Some(locked) = self.locked_value(key) {
                if value != locked {
                    return Err(QueryError::unsupported_filter_value(key, value));
                }
            }
        }

        let diff = difference(keys.clone(), |key| self.accepts(key));
        if !diff.is_empty() {
            return Err(QueryError::unsupported("filter", &diff));
        }

        let set: HashSet<&str> = keys.collect();
        for rule in &self.rules {
            rule.check(&set, "filter")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    values: &'static [&'static str],
}

impl Metrics {
    pub const fn new(values: &'static [&'static str]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.values.contains(&metric)
    }

    pub fn validate(&self, inputs: &[String]) -> Result<(), QueryError> {
        if inputs.is_empty() {
            return Err(QueryError::request("expected at least 1 metric, got 0"));
        }

        let names = inputs.iter().map(String::as_str);

        let diff = difference(names.clone(), data::is_metric);
        if !diff.is_empty() {
            return Err(QueryError::invalid("metric", &diff));
        }

        let diff = difference(names, |name| self.contains(name));
        if !diff.is_empty() {
            return Err(QueryError::unsupported("metric", &diff));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    values: &'static [&'static str],
    descending_only: bool,
}

impl SortOptions {
    pub const fn new(values: &'static [&'static str]) -> Self {
        Self {
            values,
            descending_only: false,
        }
    }

    pub const fn descending_only(values: &'static [&'static str]) -> Self {
        Self {
            values,
            descending_only: true,
        }
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn is_descending_only(&self) -> bool {
        self.descending_only
    }

    pub fn validate(&self, inputs: &[String]) -> Result<(), QueryError> {
        let raw = inputs.iter().map(|option| option.trim_start_matches('-'));

        let diff = difference(raw.clone(), data::is_metric);
        if !diff.is_empty() {
            return Err(QueryError::invalid("sort option", &diff));
        }

        let diff = difference(raw, |name| self.values.contains(&name));
        if !diff.is_empty() {
            return Err(QueryError::unsupported("sort option", &diff));
        }

        if self.descending_only && inputs.iter().any(|option| !option.starts_with('-')) {
            return Err(QueryError::request(
                "dimensions and filters are incompatible with ascending sort options \
                 (hint: prefix with '-')",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<'a>(names: &[&'a str]) -> HashSet<&'a str> {
        names.iter().copied().collect()
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cardinality_rules() {
        let required = SetRule::required(&["deviceType", "operatingSystem"]);
        assert!(required.is_satisfied_by(&set(&["deviceType", "operatingSystem"])));
        assert!(!required.is_satisfied_by(&set(&["deviceType"])));

        let exactly_one = SetRule::exactly_one(&["day", "month"]);
        assert!(exactly_one.is_satisfied_by(&set(&["day"])));
        assert!(!exactly_one.is_satisfied_by(&set(&[])));
        assert!(!exactly_one.is_satisfied_by(&set(&["day", "month"])));

        let one_or_more = SetRule::one_or_more(&["ageGroup", "gender"]);
        assert!(one_or_more.is_satisfied_by(&set(&["ageGroup", "gender"])));
        assert!(!one_or_more.is_satisfied_by(&set(&["day"])));

        let zero_or_one = SetRule::zero_or_one(&["video", "group"]);
        assert!(zero_or_one.is_satisfied_by(&set(&[])));
        assert!(!zero_or_one.is_satisfied_by(&set(&["video", "group"])));

        assert!(SetRule::zero_or_more(&["a", "b"]).is_satisfied_by(&set(&["a", "b"])));
        assert!(SetRule::optional(&["a"]).is_satisfied_by(&set(&[])));
    }

    #[test]
    fn test_locked_entries_count_by_key() {
        let rule = SetRule::required(&["isCurated==1", "country==US"]);
        assert_eq!(rule.keys().collect::<Vec<_>>(), vec!["isCurated", "country"]);
        assert!(rule.is_satisfied_by(&set(&["isCurated", "country"])));
        assert_eq!(
            rule.locked().collect::<Vec<_>>(),
            vec![("isCurated", "1"), ("country", "US")]
        );
    }

    #[test]
    fn test_dimensions_invalid_before_unsupported() {
        let dims = Dimensions::new(vec![SetRule::exactly_one(&["day", "month"])]);
        let err = dims.validate(&strings(&["day", "lol"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid dimension(s) provided: lol");

        let err = dims.validate(&strings(&["day", "country"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported dimension(s) for selected report type: country"
        );

        let err = dims.validate(&strings(&["day", "month"])).unwrap_err();
        assert_eq!(err.to_string(), "expected 1 dimension(s) from day, month, got 2");
    }

    #[test]
    fn test_dimensions_match_ignores_order_and_duplicates() {
        let dims = Dimensions::new(vec![
            SetRule::required(&["country"]),
            SetRule::optional(&["creatorContentType"]),
        ]);
        assert!(dims.matches(&set(&["country", "creatorContentType"])));
        assert!(dims.validate(&strings(&["country", "country"])).is_ok());
        assert!(!dims.matches(&set(&["creatorContentType"])));
    }

    #[test]
    fn test_filters_value_checks() {
        let filters = Filters::new(vec![
            SetRule::required(&["country==US"]),
            SetRule::zero_or_one(&["video", "group"]),
        ]);

        let err = filters.validate(&map(&[("country", "XX")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for filter 'country': 'XX'");

        let err = filters.validate(&map(&[("country", "GB")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported value for filter 'country' for selected report type: 'GB'"
        );

        let err = filters
            .validate(&map(&[("country", "US"), ("continent", "002")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported filter(s) for selected report type: continent"
        );

        let err = filters.validate(&map(&[("video", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "expected all filter(s) from country==US, got 0");

        assert!(filters
            .validate(&map(&[("country", "US"), ("video", "abc")]))
            .is_ok());
    }

    #[test]
    fn test_filters_unknown_key() {
        let filters = Filters::new(vec![SetRule::zero_or_one(&["video", "group"])]);
        let err = filters.validate(&map(&[("lol", "1")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid filter(s) provided: lol");
    }

    #[test]
    fn test_metrics_validation() {
        let metrics = Metrics::new(data::LOCATION_AND_TRAFFIC_METRICS);
        assert_eq!(
            metrics.validate(&[]).unwrap_err().to_string(),
            "expected at least 1 metric, got 0"
        );
        assert_eq!(
            metrics.validate(&strings(&["lol"])).unwrap_err().to_string(),
            "invalid metric(s) provided: lol"
        );
        assert_eq!(
            metrics.validate(&strings(&["views", "likes"])).unwrap_err().to_string(),
            "unsupported metric(s) for selected report type: likes"
        );
        assert!(metrics.validate(&strings(&["views"])).is_ok());
    }

    #[test]
    fn test_sort_options_descending_only() {
        let options = SortOptions::descending_only(data::LOCATION_AND_TRAFFIC_SORT_OPTIONS);
        assert!(options.validate(&strings(&["-views"])).is_ok());
        let err = options.validate(&strings(&["views"])).unwrap_err();
        assert!(err.to_string().contains("ascending"));

        let err = options.validate(&strings(&["-likes"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported sort option(s) for selected report type: likes"
        );

        let err = options.validate(&strings(&["-lol"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid sort option(s) provided: lol");
    }

    #[test]
    fn test_every_is_ordered_and_unique() {
        let dims = Dimensions::new(vec![
            SetRule::required(&["deviceType"]),
            SetRule::zero_or_more(&["day", "deviceType", "subscribedStatus"]),
        ]);
        assert_eq!(dims.every(), vec!["deviceType", "day", "subscribedStatus"]);
    }
}
