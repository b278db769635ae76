//! Report dispatch: load, compute, advise, render, store.

use crate::advice::RecommendationRule;
use crate::config::ReportConfig;
use crate::loader::TableLoader;
use crate::metrics::MetricsCalculator;
use crate::render::{ReportContent, ReportRenderer};
use crate::storage::{ReportStore, UploadedFile};
use crate::types::{Metrics, Recommendation, ReportArtifact, ReportFormat};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Metrics and advice for a sheet, without a rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub metrics: Metrics,
    pub recommendation: Recommendation,
}

impl ReportSummary {
    /// Load a sheet and compute its metrics and advice.
    pub fn from_path(source: &Path, config: &ReportConfig) -> Result<Self> {
        let table = TableLoader::new()
            .with_sheet(config.sheet.clone())
            .with_header_row(config.header_row)
            .load(source)?;
        let records = table.records()?;

        let metrics = MetricsCalculator::new().compute(&records);
        let recommendation = RecommendationRule::new()
            .with_threshold(config.refund_rate_threshold)
            .recommend(metrics.refund_rate());

        Ok(Self {
            rows: records.len(),
            metrics,
            recommendation,
        })
    }
}

/// Runs the whole report pipeline for one request.
///
/// Holds no per-request state; every call loads and computes afresh.
pub struct ReportDispatcher {
    store: ReportStore,
    config: ReportConfig,
    slide_renderer: Box<dyn ReportRenderer>,
    pdf_renderer: Box<dyn ReportRenderer>,
}

impl ReportDispatcher {
    pub fn new(
        store: ReportStore,
        config: ReportConfig,
        slide_renderer: impl ReportRenderer + 'static,
        pdf_renderer: impl ReportRenderer + 'static,
    ) -> Self {
        Self {
            store,
            config,
            slide_renderer: Box::new(slide_renderer),
            pdf_renderer: Box::new(pdf_renderer),
        }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Handle an upload and a requested format tag.
    ///
    /// A missing upload, or one without a name or content, yields
    /// [`Error::UploadFailed`] and writes nothing.
    pub fn dispatch(&self, upload: Option<&UploadedFile>, format: &str) -> Result<ReportArtifact> {
        let upload = match upload {
            Some(upload) if !upload.is_empty() => upload,
            Some(_) => return Err(Error::UploadFailed("uploaded file is empty".to_string())),
            None => return Err(Error::UploadFailed("no file was supplied".to_string())),
        };

        let source = self.store.stage_upload(upload)?;
        self.generate(&source, ReportFormat::from_tag(format))
    }

    /// Generate a report from a sheet already on disk.
    pub fn generate(&self, source: &Path, format: ReportFormat) -> Result<ReportArtifact> {
        let summary = self.summarize(source)?;
        let content = ReportContent::new(summary.metrics, summary.recommendation, &self.config);

        let renderer = self.renderer(format);
        log::debug!("Rendering {:?} report for {}", renderer.format(), source.display());
        let bytes = renderer.render(&content)?;

        self.store.write_report(format, &bytes)
    }

    /// Metrics and advice for a sheet already on disk.
    pub fn summarize(&self, source: &Path) -> Result<ReportSummary> {
        ReportSummary::from_path(source, &self.config)
    }

    fn renderer(&self, format: ReportFormat) -> &dyn ReportRenderer {
        match format {
            ReportFormat::SlideDeck => self.slide_renderer.as_ref(),
            ReportFormat::Pdf => self.pdf_renderer.as_ref(),
        }
    }
}
