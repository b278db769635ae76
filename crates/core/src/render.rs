//! Renderer seam and the text every report format shares.

use crate::config::ReportConfig;
use crate::types::{Metrics, Recommendation, ReportFormat};
use crate::Result;

/// Format an amount with a currency symbol and two decimals.
pub fn format_currency(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

/// Format a fraction as a percentage with two decimals (0.2 -> "20.00%").
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Everything a renderer needs, already worded and formatted.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub metrics: Metrics,
    pub recommendation: Recommendation,
    pub title: String,
    pub pdf_title: String,
    pub total_income_line: String,
    pub actual_income_line: String,
    pub refund_rate_line: String,
    /// Refund amount with the rate in parentheses.
    pub refund_line: String,
    pub advice_heading: String,
    pub conclusions_heading: String,
}

impl ReportContent {
    pub fn new(metrics: Metrics, recommendation: Recommendation, config: &ReportConfig) -> Self {
        let labels = &config.labels;
        let money = |amount| format_currency(&config.currency_symbol, amount);
        let rate = format_percent(metrics.refund_rate());

        Self {
            title: config.title.clone(),
            pdf_title: config.pdf_title.clone(),
            total_income_line: format!("{}: {}", labels.total_income, money(metrics.total_income())),
            actual_income_line: format!("{}: {}", labels.actual_income, money(metrics.actual_income())),
            refund_rate_line: format!("{}: {}", labels.refund_rate, rate),
            refund_line: format!(
                "{}: {} ({}: {})",
                labels.refund_amount,
                money(metrics.refund()),
                labels.refund_rate,
                rate
            ),
            advice_heading: labels.advice_heading.clone(),
            conclusions_heading: labels.conclusions_heading.clone(),
            metrics,
            recommendation,
        }
    }

    /// Body of the title slide.
    pub fn summary_lines(&self) -> Vec<&str> {
        vec![self.total_income_line.as_str(), self.actual_income_line.as_str()]
    }

    /// Body of the advice slide.
    pub fn advice_lines(&self) -> Vec<&str> {
        vec![self.refund_rate_line.as_str(), self.recommendation.as_str()]
    }
}

/// A document encoder for one report format.
pub trait ReportRenderer {
    /// The format this renderer produces.
    fn format(&self) -> ReportFormat;

    /// Encode the report as a complete document.
    fn render(&self, content: &ReportContent) -> Result<Vec<u8>>;
}
