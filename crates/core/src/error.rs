//! Error types for report generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading transactions or producing a report.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The workbook could not be opened or a sheet could not be read.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// The sheet has no row at the configured header position.
    #[error("Spreadsheet has no header row at row {0}")]
    MissingHeader(usize),

    /// A required numeric column is absent from the header.
    #[error("Required column is missing: {0}")]
    MissingColumn(String),

    /// No file was supplied, or the supplied file was empty.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// A renderer could not produce its document.
    #[error("Render error: {0}")]
    RenderError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// PDF object model error.
    #[error("PDF error: {0}")]
    PdfError(String),
}

impl Error {
    /// Whether this error means the caller never supplied usable input.
    pub fn is_upload_failure(&self) -> bool {
        matches!(self, Error::UploadFailed(_))
    }
}
