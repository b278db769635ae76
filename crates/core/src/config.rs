//! Report and storage settings.

use crate::advice::DEFAULT_REFUND_RATE_THRESHOLD;
use crate::loader::DEFAULT_HEADER_ROW;
use std::path::PathBuf;

/// Fixed wording used in the rendered documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub total_income: String,
    pub actual_income: String,
    pub refund_amount: String,
    pub refund_rate: String,
    /// Title of the second slide.
    pub advice_heading: String,
    /// Bold heading above the PDF recommendation.
    pub conclusions_heading: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            total_income: "Total Income".to_string(),
            actual_income: "Actual Income".to_string(),
            refund_amount: "Refund Amount".to_string(),
            refund_rate: "Refund Rate".to_string(),
            advice_heading: "Advice & Analysis".to_string(),
            conclusions_heading: "Conclusions & Recommendations".to_string(),
        }
    }
}

/// Settings for loading the sheet and wording the report.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Title of the slide deck.
    pub title: String,
    /// Title printed at the top of the PDF.
    pub pdf_title: String,
    /// Symbol placed before every amount.
    pub currency_symbol: String,
    /// Refund rate above which the high-refund advice is given.
    pub refund_rate_threshold: f64,
    /// Sheet to read; the first sheet when `None`.
    pub sheet: Option<String>,
    /// Index of the label row among non-blank rows.
    pub header_row: usize,
    pub labels: ReportLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Business Analysis Report".to_string(),
            pdf_title: "Business Analysis Report (PDF)".to_string(),
            currency_symbol: "\u{a5}".to_string(),
            refund_rate_threshold: DEFAULT_REFUND_RATE_THRESHOLD,
            sheet: None,
            header_row: DEFAULT_HEADER_ROW,
            labels: ReportLabels::default(),
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_pdf_title(mut self, title: impl Into<String>) -> Self {
        self.pdf_title = title.into();
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_refund_rate_threshold(mut self, threshold: f64) -> Self {
        self.refund_rate_threshold = threshold;
        self
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }
}

/// Where uploads are staged and reports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl StorageConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            report_dir: report_dir.into(),
        }
    }
}
