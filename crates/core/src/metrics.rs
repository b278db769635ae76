//! Aggregation of transaction records into report metrics.

use crate::types::{Metrics, NumericColumn, TransactionRecord};

/// Sums the money columns and derives the report figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Sum one column over all records, skipping missing values.
    ///
    /// A column with no numeric values sums to 0.
    pub fn column_sum(&self, records: &[TransactionRecord], column: NumericColumn) -> f64 {
        records.iter().filter_map(|r| r.get(column)).sum()
    }

    /// Compute the metrics for a set of records.
    pub fn compute(&self, records: &[TransactionRecord]) -> Metrics {
        let total_income = self.column_sum(records, NumericColumn::GrossIncome);
        let refund = self.column_sum(records, NumericColumn::Refund);
        let platform_fee = self.column_sum(records, NumericColumn::PlatformFee);
        let marketing = self.column_sum(records, NumericColumn::MarketingFee);

        let metrics = Metrics::from_totals(total_income, refund, platform_fee, marketing);
        log::debug!(
            "Computed metrics over {} rows: income={} refund={} actual={} rate={}",
            records.len(),
            metrics.total_income(),
            metrics.refund(),
            metrics.actual_income(),
            metrics.refund_rate()
        );
        metrics
    }
}
