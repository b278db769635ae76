//! Slide-deck rendering of a report.

use crate::package::{PresentationPackage, SlideSpec};
use report_core::{ReportContent, ReportFormat, ReportRenderer, Result};

/// Renders a report as a two-slide deck: a title slide with the income
/// figures, then an advice slide with the refund rate and recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxRenderer;

impl PptxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Lay the report out as slides without serializing them.
    pub fn build(&self, content: &ReportContent) -> PresentationPackage {
        let mut deck = PresentationPackage::new();
        deck.add_slide(SlideSpec::title_slide(&content.title, &content.summary_lines()));
        deck.add_slide(SlideSpec::content_slide(
            &content.advice_heading,
            &content.advice_lines(),
        ));
        deck
    }
}

impl ReportRenderer for PptxRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::SlideDeck
    }

    fn render(&self, content: &ReportContent) -> Result<Vec<u8>> {
        self.build(content).to_bytes()
    }
}
