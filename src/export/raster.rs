use crate::export::render::save_document;
use crate::export::{ExportError, QuotationRenderer};
use crate::models::NewQuotation;
use printpdf::image_crate::DynamicImage;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const EMBED_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// Source of the rendered preview raster. Implementations range from a
/// headless browser screenshot to a test stub; the renderer does not care.
pub trait PreviewCapture {
    fn capture(&self, quotation: &NewQuotation) -> Result<DynamicImage, ExportError>;
}

/// Capture-and-embed backend: takes a raster image of the preview and
/// packages it as a single A4 page, scaled to fit and centered.
pub struct RasterRenderer<C> {
    capture: C,
}

impl<C> RasterRenderer<C> {
    pub fn new(capture: C) -> Self {
        Self { capture }
    }
}

impl<C: PreviewCapture> QuotationRenderer for RasterRenderer<C> {
    fn render(&self, quotation: &NewQuotation) -> Result<Vec<u8>, ExportError> {
        let image = self.capture.capture(quotation)?;
        embed_on_page(&image)
    }
}

/// Where an image of the given pixel size lands on the page: largest size
/// that fits while preserving aspect ratio, centered on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    pub width_mm: f32,
    pub height_mm: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

pub fn fit_to_page(width_px: u32, height_px: u32) -> PlacedImage {
    let image_ratio = width_px as f32 / height_px as f32;
    let page_ratio = PAGE_WIDTH_MM / PAGE_HEIGHT_MM;

    let (width_mm, height_mm) = if image_ratio > page_ratio {
        // Wider than the page: fit to width
        (PAGE_WIDTH_MM, PAGE_WIDTH_MM / image_ratio)
    } else {
        // Taller than the page: fit to height
        (PAGE_HEIGHT_MM * image_ratio, PAGE_HEIGHT_MM)
    };

    PlacedImage {
        width_mm,
        height_mm,
        x_mm: (PAGE_WIDTH_MM - width_mm) / 2.0,
        y_mm: (PAGE_HEIGHT_MM - height_mm) / 2.0,
    }
}

fn embed_on_page(image: &DynamicImage) -> Result<Vec<u8>, ExportError> {
    let (width_px, height_px) = (image.width(), image.height());
    if width_px == 0 || height_px == 0 {
        return Err(ExportError::Render("preview image is empty".to_string()));
    }

    let (doc, page, layer) = PdfDocument::new(
        "Quotation",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let placed = fit_to_page(width_px, height_px);
    let natural_width_mm = width_px as f32 * MM_PER_INCH / EMBED_DPI;
    let natural_height_mm = height_px as f32 * MM_PER_INCH / EMBED_DPI;

    let pdf_image = Image::from_dynamic_image(image);
    pdf_image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(placed.x_mm)),
            translate_y: Some(Mm(placed.y_mm)),
            scale_x: Some(placed.width_mm / natural_width_mm),
            scale_y: Some(placed.height_mm / natural_height_mm),
            dpi: Some(EMBED_DPI),
            ..ImageTransform::default()
        },
    );

    save_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::QuotationDraft;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn wide_images_fit_to_page_width_and_center_vertically() {
        let placed = fit_to_page(2000, 1000);
        assert_close(placed.width_mm, 210.0);
        assert_close(placed.height_mm, 105.0);
        assert_close(placed.x_mm, 0.0);
        assert_close(placed.y_mm, 96.0);
    }

    #[test]
    fn tall_images_fit_to_page_height_and_center_horizontally() {
        let placed = fit_to_page(1000, 3000);
        assert_close(placed.height_mm, 297.0);
        assert_close(placed.width_mm, 99.0);
        assert_close(placed.y_mm, 0.0);
        assert_close(placed.x_mm, (210.0 - 99.0) / 2.0);
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        for (w, h) in [(800, 600), (600, 800), (1920, 1080), (500, 500)] {
            let placed = fit_to_page(w, h);
            let image_ratio = w as f32 / h as f32;
            let placed_ratio = placed.width_mm / placed.height_mm;
            assert!((image_ratio - placed_ratio).abs() < 1e-3);
            assert!(placed.width_mm <= 210.0 + 1e-3);
            assert!(placed.height_mm <= 297.0 + 1e-3);
        }
    }

    struct SolidCapture;

    impl PreviewCapture for SolidCapture {
        fn capture(&self, _quotation: &NewQuotation) -> Result<DynamicImage, ExportError> {
            Ok(DynamicImage::new_rgb8(600, 850))
        }
    }

    #[test]
    fn raster_renderer_embeds_the_capture_into_a_pdf() {
        let renderer = RasterRenderer::new(SolidCapture);
        let bytes = renderer
            .render(&QuotationDraft::new().to_new_quotation())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    struct EmptyCapture;

    impl PreviewCapture for EmptyCapture {
        fn capture(&self, _quotation: &NewQuotation) -> Result<DynamicImage, ExportError> {
            Ok(DynamicImage::new_rgb8(0, 0))
        }
    }

    #[test]
    fn empty_captures_are_rejected() {
        let renderer = RasterRenderer::new(EmptyCapture);
        let err = renderer
            .render(&QuotationDraft::new().to_new_quotation())
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
    }
}
