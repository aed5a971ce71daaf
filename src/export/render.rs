use crate::export::ExportError;
use crate::models::NewQuotation;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

/// Pure function from quotation state to PDF bytes. The backend is
/// swappable without touching the data model.
pub trait QuotationRenderer {
    fn render(&self, quotation: &NewQuotation) -> Result<Vec<u8>, ExportError>;
}

/// Default backend: typesets the quotation document directly on a single
/// A4 page with the builtin Helvetica faces.
#[derive(Debug, Default)]
pub struct VectorRenderer;

impl VectorRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl QuotationRenderer for VectorRenderer {
    fn render(&self, quotation: &NewQuotation) -> Result<Vec<u8>, ExportError> {
        let (doc, page, layer) = PdfDocument::new("Quotation", Mm(210.0), Mm(297.0), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        let mut y: f32 = 285.0;

        // Header: company letterhead (left)
        let company = &quotation.company_info;
        push_line(&layer, &font_bold, &company.name, 16.0, 15.0, y);
        y -= 7.0;
        push_line(&layer, &font, &company.address, 10.0, 15.0, y);
        y -= 5.0;
        push_line(&layer, &font, &format!("Phone: {}", company.phone), 10.0, 15.0, y);
        y -= 5.0;
        push_line(&layer, &font, &format!("Email: {}", company.email), 10.0, 15.0, y);
        y -= 5.0;
        push_line(&layer, &font, &company.pvt, 10.0, 15.0, y);

        // Header: title and key (right)
        push_line(&layer, &font_bold, "QUOTATION", 24.0, 140.0, 285.0);
        push_line(&layer, &font_bold, &quotation.quotation_number, 12.0, 140.0, 277.0);
        push_line(&layer, &font, &format!("Date: {}", quotation.date), 10.0, 140.0, 271.0);

        y = 258.0;
        divider(&layer, y);

        // Client block
        y -= 10.0;
        push_line(&layer, &font_bold, "Quoted To:", 12.0, 15.0, y);
        y -= 7.0;
        push_line(&layer, &font, &quotation.client_info.name, 10.0, 15.0, y);
        for detail in [
            &quotation.client_info.address,
            &quotation.client_info.phone,
            &quotation.client_info.email,
        ] {
            if !detail.trim().is_empty() {
                y -= 5.0;
                push_line(&layer, &font, detail, 10.0, 15.0, y);
            }
        }

        y -= 12.0;

        // Items table
        let x_desc = 15.0;
        let x_qty = 120.0;
        let x_price = 145.0;
        let x_total = 175.0;

        push_line(&layer, &font_bold, "Description", 10.0, x_desc, y);
        push_line(&layer, &font_bold, "Qty", 10.0, x_qty, y);
        push_line(&layer, &font_bold, "Price", 10.0, x_price, y);
        push_line(&layer, &font_bold, "Total", 10.0, x_total, y);

        y -= 3.5;
        divider(&layer, y);
        y -= 7.0;

        for (idx, item) in quotation.items.iter().enumerate() {
            if y < 45.0 {
                return Err(ExportError::Render(
                    "too many items to fit on a single page".to_string(),
                ));
            }

            let description = format!("{}. {}", idx + 1, item.description);
            push_line(&layer, &font, &description, 10.0, x_desc, y);
            push_line(&layer, &font, &format_quantity(item.quantity), 10.0, x_qty, y);
            push_line(&layer, &font, &format_money(item.price), 10.0, x_price, y);
            push_line(&layer, &font_bold, &format_money(item.total), 10.0, x_total, y);

            y -= 6.0;
        }

        y -= 4.0;
        divider(&layer, y);

        // Totals
        y -= 10.0;
        push_line(&layer, &font, "Subtotal:", 11.0, 145.0, y);
        push_line(&layer, &font_bold, &format_money(quotation.subtotal), 11.0, 175.0, y);

        y -= 7.0;
        push_line(&layer, &font_bold, "GRAND TOTAL:", 13.0, 145.0, y);
        push_line(&layer, &font_bold, &format_money(quotation.grand_total), 13.0, 180.0, y);

        push_line(&layer, &font, "Thank you for your business.", 9.0, 15.0, 12.0);

        save_document(doc)
    }
}

pub(crate) fn save_document(doc: PdfDocumentReference) -> Result<Vec<u8>, ExportError> {
    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(15.0), Mm(y)), false),
            (Point::new(Mm(195.0), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Thousands-separated money value with two decimals.
pub(crate) fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut out = String::new();
    let chars: Vec<char> = int_part.chars().collect();
    let mut count = 0;
    for i in (0..chars.len()).rev() {
        if count == 3 && chars[i] != '-' {
            out.push(',');
            count = 0;
        }
        out.push(chars[i]);
        count += 1;
    }
    let int_with_sep: String = out.chars().rev().collect();
    format!("{}.{}", int_with_sep, dec_part)
}

/// Quantities print as whole numbers when they are whole.
fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
