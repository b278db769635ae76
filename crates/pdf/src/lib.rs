//! PDF renderer for transaction reports.
//!
//! Writes a single A4 page using the standard Helvetica fonts, so no font
//! files need to be embedded.

pub mod fonts;
pub mod renderer;

pub use fonts::StandardFont;
pub use renderer::PdfRenderer;
