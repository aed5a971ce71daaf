//! End-to-end flow: edit a draft, snapshot it for persistence, export it.

use quotation_maker::editor::{ClientField, DraftEdit, QuotationDraft};
use quotation_maker::export::{Exporter, VectorRenderer};

fn edited_draft() -> QuotationDraft {
    QuotationDraft::new()
        .apply(DraftEdit::Client {
            field: ClientField::Name,
            value: "Acme Ltd".to_string(),
        })
        .apply(DraftEdit::Client {
            field: ClientField::Email,
            value: "accounts@acme.example".to_string(),
        })
        .apply(DraftEdit::ItemDescription {
            index: 0,
            value: "Cement bags".to_string(),
        })
        .apply(DraftEdit::ItemQuantity { index: 0, value: 3.0 })
        .apply(DraftEdit::ItemPrice { index: 0, value: 1500.0 })
        .apply(DraftEdit::AddItem)
        .apply(DraftEdit::ItemDescription {
            index: 1,
            value: "Delivery".to_string(),
        })
        .apply(DraftEdit::ItemQuantity { index: 1, value: 1.0 })
        .apply(DraftEdit::ItemPrice { index: 1, value: 2000.0 })
}

#[test]
fn edited_draft_snapshots_with_consistent_totals() {
    let draft = edited_draft();
    assert!(draft.validate().is_ok());

    let snapshot = draft.to_new_quotation();
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[0].total, 4500.0);
    assert_eq!(snapshot.items[1].total, 2000.0);
    assert_eq!(snapshot.subtotal, 6500.0);
    assert_eq!(snapshot.grand_total, snapshot.subtotal);

    // Wire shape stays camelCase end to end.
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["quotationNumber"], snapshot.quotation_number);
    assert_eq!(json["clientInfo"]["email"], "accounts@acme.example");
    assert_eq!(json["grandTotal"], 6500.0);
}

#[test]
fn edited_draft_exports_as_a_named_pdf() {
    let draft = edited_draft();
    let snapshot = draft.to_new_quotation();

    let exporter = Exporter::new(VectorRenderer::new());
    let pdf = exporter.export(&snapshot).unwrap();

    assert_eq!(
        pdf.filename,
        format!("Quotation-{}.pdf", snapshot.quotation_number)
    );
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert!(!exporter.is_in_progress());
}

#[test]
fn a_fresh_draft_after_save_gets_a_new_number_and_blank_items() {
    let before = edited_draft();
    // The editor replaces the draft wholesale after a successful save.
    let after = QuotationDraft::new();

    assert_eq!(after.items.len(), 1);
    assert!(after.items[0].description.is_empty());
    assert!(after.client_info.name.is_empty());
    assert!(after.quotation_number.starts_with("Quote-"));
    // Company letterhead is the fixed record either way.
    assert_eq!(after.company_info, before.company_info);
}
