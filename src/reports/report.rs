//! Result tables as returned by the reports endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reports::types::ReportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    String,
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Dimension,
    Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub name: String,
    pub data_type: DataType,
    pub column_type: ColumnType,
}

/// The `resultTable` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultTable {
    pub kind: String,
    pub column_headers: Vec<ColumnHeader>,
    /// Absent when the query matched no data.
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// A result table paired with the report type that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    resource: ResultTable,
    report_type: ReportKind,
}

impl Report {
    pub fn new(resource: ResultTable, report_type: ReportKind) -> Self {
        Self {
            resource,
            report_type,
        }
    }

    pub fn resource(&self) -> &ResultTable {
        &self.resource
    }

    pub fn report_type(&self) -> ReportKind {
        self.report_type
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.resource.rows.len(), self.resource.column_headers.len())
    }

    pub fn columns(&self) -> Vec<&str> {
        self.resource
            .column_headers
            .iter()
            .map(|header| header.name.as_str())
            .collect()
    }

    pub fn dimensions(&self) -> Vec<&str> {
        self.columns_of(ColumnType::Dimension)
    }

    pub fn metrics(&self) -> Vec<&str> {
        self.columns_of(ColumnType::Metric)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.resource.rows
    }

    fn columns_of(&self, column_type: ColumnType) -> Vec<&str> {
        self.resource
            .column_headers
            .iter()
            .filter(|header| header.column_type == column_type)
            .map(|header| header.name.as_str())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_table() -> ResultTable {
        serde_json::from_value(json!({
            "kind": "youtubeAnalytics#resultTable",
            "columnHeaders": [
                {"name": "day", "columnType": "DIMENSION", "dataType": "STRING"},
                {"name": "views", "columnType": "METRIC", "dataType": "INTEGER"},
                {"name": "averageViewPercentage", "columnType": "METRIC", "dataType": "FLOAT"}
            ],
            "rows": [
                ["2022-06-20", 778, 44.5],
                ["2022-06-21", 1167, 38.25]
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_result_table_deserialization() {
        let table = sample_table();
        assert_eq!(table.kind, "youtubeAnalytics#resultTable");
        assert_eq!(table.column_headers[0].column_type, ColumnType::Dimension);
        assert_eq!(table.column_headers[1].data_type, DataType::Integer);
        assert_eq!(table.column_headers[2].data_type, DataType::Float);
        assert_eq!(table.rows[1][1], json!(1167));
    }

    #[test]
    fn test_result_table_without_rows() {
        let table: ResultTable = serde_json::from_value(json!({
            "kind": "youtubeAnalytics#resultTable",
            "columnHeaders": []
        }))
        .unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_report_accessors() {
        let report = Report::new(sample_table(), ReportKind::TimeBasedActivity);
        assert_eq!(report.shape(), (2, 3));
        assert_eq!(report.columns(), vec!["day", "views", "averageViewPercentage"]);
        assert_eq!(report.dimensions(), vec!["day"]);
        assert_eq!(report.metrics(), vec!["views", "averageViewPercentage"]);
        assert_eq!(report.report_type(), ReportKind::TimeBasedActivity);
    }

    #[test]
    fn test_header_serializes_camel_case() {
        let header = ColumnHeader {
            name: "views".to_string(),
            data_type: DataType::Integer,
            column_type: ColumnType::Metric,
        };
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(
            value,
            json!({"name": "views", "dataType": "INTEGER", "columnType": "METRIC"})
        );
    }
}
