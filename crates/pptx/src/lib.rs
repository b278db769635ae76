//! PPTX (Office Open XML) renderer for transaction reports.
//!
//! Builds .pptx files, which are ZIP archives containing XML documents.

pub mod package;
pub mod renderer;

#[cfg(test)]
mod readback;

pub use package::{PresentationPackage, SlideLayout, SlideSpec};
pub use renderer::PptxRenderer;
