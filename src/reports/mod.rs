//! Report types, their rules and the resources they produce.

pub mod data;
pub mod export;
pub mod features;
pub mod registry;
pub mod report;
pub mod types;

pub use export::ExportFormat;
pub use features::{Cardinality, Dimensions, Filters, Metrics, SetRule, SortOptions};
pub use registry::Registry;
pub use report::{ColumnHeader, ColumnType, DataType, Report, ResultTable};
pub use types::{ReportKind, ReportType};
