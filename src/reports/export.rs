//! Saving reports to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::info;

use crate::error::ExportError;
use crate::reports::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Append `extension` unless the path already carries it, then refuse to
/// clobber an existing file unless `overwrite` is set.
pub fn process_path(
    path: impl AsRef<Path>,
    extension: &str,
    overwrite: bool,
) -> Result<PathBuf, ExportError> {
    let path = path.as_ref();
    let path = if path.extension().and_then(|e| e.to_str()) == Some(extension) {
        path.to_path_buf()
    } else {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(extension);
        path.with_file_name(name)
    };

    if !overwrite && path.is_file() {
        return Err(ExportError::FileExists(path));
    }
    Ok(path)
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Report {
    /// Save the result table as it was received.
    pub fn to_json(
        &self,
        path: impl AsRef<Path>,
        pretty: bool,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        let path = process_path(path, "json", overwrite)?;
        let mut writer = BufWriter::new(File::create(&path)?);
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self.resource())?;
        } else {
            serde_json::to_writer(&mut writer, self.resource())?;
        }
        writer.flush()?;

        info!("Saved report as JSON to {}", path.display());
        Ok(path)
    }

    /// Save as delimited text. A tab delimiter produces a `.tsv` file.
    pub fn to_csv(
        &self,
        path: impl AsRef<Path>,
        delimiter: u8,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        let extension = if delimiter == b'\t' { "tsv" } else { "csv" };
        let path = process_path(path, extension, overwrite)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(&path)?;
        writer.write_record(self.columns())?;
        for row in self.rows() {
            writer.write_record(row.iter().map(render_cell))?;
        }
        writer.flush()?;

        info!(
            "Saved report as {} to {}",
            extension.to_ascii_uppercase(),
            path.display()
        );
        Ok(path)
    }

    pub fn export(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        match format {
            ExportFormat::Json => self.to_json(path, false, overwrite),
            ExportFormat::Csv => self.to_csv(path, b',', overwrite),
            ExportFormat::Tsv => self.to_csv(path, b'\t', overwrite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::report::tests::sample_table;
    use crate::reports::report::ResultTable;
    use crate::reports::types::ReportKind;

    fn sample_report() -> Report {
        Report::new(sample_table(), ReportKind::TimeBasedActivity)
    }

    #[test]
    fn test_process_path_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = process_path(dir.path().join("report"), "csv", false).unwrap();
        assert_eq!(path, dir.path().join("report.csv"));

        let path = process_path(dir.path().join("report.csv"), "csv", false).unwrap();
        assert_eq!(path, dir.path().join("report.csv"));

        let path = process_path(dir.path().join("report.txt"), "json", false).unwrap();
        assert_eq!(path, dir.path().join("report.txt.json"));
    }

    #[test]
    fn test_process_path_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("report.json");
        std::fs::write(&existing, "{}").unwrap();

        let err = process_path(&existing, "json", false).unwrap_err();
        assert!(matches!(err, ExportError::FileExists(p) if p == existing));
        assert!(process_path(&existing, "json", true).is_ok());
    }

    #[test]
    fn test_to_json_round_trips_resource() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let path = report.to_json(dir.path().join("out"), true, false).unwrap();
        assert_eq!(path.extension().unwrap(), "json");

        let text = std::fs::read_to_string(&path).unwrap();
        let table: ResultTable = serde_json::from_str(&text).unwrap();
        assert_eq!(&table, report.resource());
    }

    #[test]
    fn test_to_csv_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_report().to_csv(dir.path().join("out"), b',', false).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "day,views,averageViewPercentage\n2022-06-20,778,44.5\n2022-06-21,1167,38.25\n"
        );
    }

    #[test]
    fn test_tab_delimiter_saves_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_report()
            .export(dir.path().join("out"), ExportFormat::Tsv, false)
            .unwrap();
        assert_eq!(path, dir.path().join("out.tsv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("day\tviews\taverageViewPercentage\n"));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }
}
