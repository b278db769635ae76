//! Core domain types, spreadsheet loading, metrics and report dispatch
//! for transaction reports.

pub mod advice;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod render;
pub mod storage;
pub mod table;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use advice::RecommendationRule;
pub use config::{ReportConfig, ReportLabels, StorageConfig};
pub use dispatch::{ReportDispatcher, ReportSummary};
pub use error::{Error, Result};
pub use loader::TableLoader;
pub use metrics::MetricsCalculator;
pub use render::{format_currency, format_percent, ReportContent, ReportRenderer};
pub use storage::{sanitize_filename, ReportStore, UploadedFile};
pub use table::{Cell, RawTable};
pub use types::{Metrics, NumericColumn, Recommendation, ReportArtifact, ReportFormat, TransactionRecord};
