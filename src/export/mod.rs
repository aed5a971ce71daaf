pub mod raster;
pub mod render;

pub use raster::{fit_to_page, PlacedImage, PreviewCapture, RasterRenderer};
pub use render::{QuotationRenderer, VectorRenderer};

use crate::models::NewQuotation;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already in progress")]
    InProgress,
    #[error("Failed to render quotation: {0}")]
    Render(String),
    #[error("Failed to assemble PDF: {0}")]
    Pdf(String),
}

/// A finished export, ready to be written wherever the caller wants it.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Runs a renderer behind a re-entrancy guard: a second export cannot
/// start while one is in progress, and the guard is released on every
/// path, including failures.
pub struct Exporter<R> {
    renderer: R,
    in_progress: AtomicBool,
}

impl<R: QuotationRenderer> Exporter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    pub fn export(&self, quotation: &NewQuotation) -> Result<ExportedPdf, ExportError> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            return Err(ExportError::InProgress);
        }

        let result = self.renderer.render(quotation).map(|bytes| ExportedPdf {
            filename: export_filename(&quotation.quotation_number),
            bytes,
        });

        self.in_progress.store(false, Ordering::SeqCst);
        result
    }
}

/// Download name for an export, derived from the business key.
pub fn export_filename(quotation_number: &str) -> String {
    format!("Quotation-{}.pdf", sanitize_filename(quotation_number))
}

fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == ' ';
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        "quotation".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::QuotationDraft;

    struct FailingRenderer;

    impl QuotationRenderer for FailingRenderer {
        fn render(&self, _quotation: &NewQuotation) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Render("capture lost".to_string()))
        }
    }

    fn snapshot() -> NewQuotation {
        QuotationDraft::new().to_new_quotation()
    }

    #[test]
    fn export_filename_uses_the_quotation_number() {
        assert_eq!(export_filename("Quote-1234"), "Quotation-Quote-1234.pdf");
    }

    #[test]
    fn export_filename_sanitizes_hostile_characters() {
        assert_eq!(export_filename("Quote/12:34"), "Quotation-Quote_12_34.pdf");
        assert_eq!(export_filename("///"), "Quotation-quotation.pdf");
    }

    #[test]
    fn a_second_export_is_rejected_while_one_is_in_progress() {
        let exporter = Exporter::new(VectorRenderer::new());
        exporter.in_progress.store(true, Ordering::SeqCst);

        let err = exporter.export(&snapshot()).unwrap_err();
        assert!(matches!(err, ExportError::InProgress));

        // The rejected attempt must not clear the running export's guard.
        assert!(exporter.is_in_progress());
    }

    #[test]
    fn guard_is_cleared_after_a_failed_export() {
        let exporter = Exporter::new(FailingRenderer);

        let err = exporter.export(&snapshot()).unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
        assert!(!exporter.is_in_progress());
    }

    #[test]
    fn guard_is_cleared_after_a_successful_export() {
        let exporter = Exporter::new(VectorRenderer::new());

        let pdf = exporter.export(&snapshot()).unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert!(!exporter.is_in_progress());
    }
}
