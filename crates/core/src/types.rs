//! Domain types for transaction data and generated reports.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One of the four money columns a transaction sheet must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    GrossIncome,
    PlatformFee,
    MarketingFee,
    Refund,
}

impl NumericColumn {
    /// All required columns, in the order they are checked.
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::GrossIncome,
        NumericColumn::PlatformFee,
        NumericColumn::MarketingFee,
        NumericColumn::Refund,
    ];

    /// The exact header label this column is found under.
    pub fn header(self) -> &'static str {
        match self {
            Self::GrossIncome => "Total Income (currency)",
            Self::PlatformFee => "Platform Technical Service Fee (currency)",
            Self::MarketingFee => "Merchant Marketing Fee (currency)",
            Self::Refund => "Post-Consumption Refund (currency)",
        }
    }
}

/// The numeric part of one transaction row after coercion.
///
/// A `None` field means the cell was blank or not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub gross_income: Option<f64>,
    pub platform_fee: Option<f64>,
    pub marketing_fee: Option<f64>,
    pub refund: Option<f64>,
}

impl TransactionRecord {
    /// Get the coerced value for a column.
    pub fn get(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::GrossIncome => self.gross_income,
            NumericColumn::PlatformFee => self.platform_fee,
            NumericColumn::MarketingFee => self.marketing_fee,
            NumericColumn::Refund => self.refund,
        }
    }

    /// Set the coerced value for a column.
    pub fn set(&mut self, column: NumericColumn, value: Option<f64>) {
        match column {
            NumericColumn::GrossIncome => self.gross_income = value,
            NumericColumn::PlatformFee => self.platform_fee = value,
            NumericColumn::MarketingFee => self.marketing_fee = value,
            NumericColumn::Refund => self.refund = value,
        }
    }
}

/// Aggregate figures for one report.
///
/// Fields are private so the derived values always agree with the sums they
/// came from; build one with [`Metrics::from_totals`] or
/// [`crate::MetricsCalculator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    total_income: f64,
    refund: f64,
    platform_fee: f64,
    marketing: f64,
    actual_income: f64,
    refund_rate: f64,
}

impl Metrics {
    /// Derive metrics from the four column sums.
    pub fn from_totals(total_income: f64, refund: f64, platform_fee: f64, marketing: f64) -> Self {
        let actual_income = total_income - refund - platform_fee - marketing;
        let refund_rate = if total_income != 0.0 {
            refund / total_income
        } else {
            0.0
        };

        Self {
            total_income,
            refund,
            platform_fee,
            marketing,
            actual_income,
            // A NaN total or refund would otherwise leak into the advice rule.
            refund_rate: if refund_rate.is_finite() { refund_rate } else { 0.0 },
        }
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn refund(&self) -> f64 {
        self.refund
    }

    pub fn platform_fee(&self) -> f64 {
        self.platform_fee
    }

    pub fn marketing(&self) -> f64 {
        self.marketing
    }

    /// Income left after refunds, platform fees and marketing.
    pub fn actual_income(&self) -> f64 {
        self.actual_income
    }

    /// Refund as a fraction of total income (0.15 = 15%).
    pub fn refund_rate(&self) -> f64 {
        self.refund_rate
    }
}

/// Advisory text chosen from the refund rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Whether the refund rate crossed the advisory threshold.
    pub high_refund_rate: bool,

    /// The text shown in the report.
    pub text: String,
}

impl Recommendation {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// The document format of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// PowerPoint slide deck (.pptx).
    SlideDeck,
    /// Single-page PDF document.
    Pdf,
}

impl ReportFormat {
    /// Map a requested format tag to a format.
    ///
    /// Only `"pdf"` selects PDF; every other tag, including an empty one,
    /// falls back to the slide deck.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "pdf" {
            Self::Pdf
        } else {
            Self::SlideDeck
        }
    }

    /// File extension for artifacts of this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::SlideDeck => "pptx",
            Self::Pdf => "pdf",
        }
    }
}

/// A report written to the reports directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportArtifact {
    /// 32 lowercase hex characters, unique per artifact.
    pub id: String,

    /// Format of the document.
    pub format: ReportFormat,

    /// Where the document was written.
    pub path: PathBuf,
}

impl ReportArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the artifact, as offered for download.
    pub fn file_name(&self) -> String {
        format!("report_{}.{}", self.id, self.format.extension())
    }
}
