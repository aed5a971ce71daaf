use crate::models::{ClientInfo, CompanyInfo, LineItem, NewQuotation};
use chrono::Local;
use thiserror::Error;
use uuid::Uuid;

/// Validation failures reported when the user tries to save. Nothing is
/// checked on a per-edit basis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please enter client name")]
    MissingClientName,
    #[error("Please add at least one item description")]
    MissingItemDescription,
}

/// Client fields the editor can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Address,
    Phone,
    Email,
}

/// A single edit applied to the draft. Quantity and price writes
/// recompute the affected item's total in the same step.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Client { field: ClientField, value: String },
    ItemDescription { index: usize, value: String },
    ItemQuantity { index: usize, value: f64 },
    ItemPrice { index: usize, value: f64 },
    AddItem,
    RemoveItem { index: usize },
}

/// The in-memory, unsaved quotation. An immutable value: every edit goes
/// through [`QuotationDraft::apply`], which returns the replacement draft.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDraft {
    pub quotation_number: String,
    pub date: String,
    pub company_info: CompanyInfo,
    pub client_info: ClientInfo,
    pub items: Vec<LineItem>,
}

impl QuotationDraft {
    /// Fresh blank draft: generated number, today's date, one blank item.
    pub fn new() -> Self {
        Self {
            quotation_number: generate_quotation_number(),
            date: current_quotation_date(),
            company_info: CompanyInfo::default(),
            client_info: ClientInfo::default(),
            items: vec![LineItem::blank()],
        }
    }

    /// Apply one edit and return the next draft value. Out-of-range item
    /// indexes are ignored; removing the last remaining item is a no-op.
    pub fn apply(mut self, edit: DraftEdit) -> Self {
        match edit {
            DraftEdit::Client { field, value } => match field {
                ClientField::Name => self.client_info.name = value,
                ClientField::Address => self.client_info.address = value,
                ClientField::Phone => self.client_info.phone = value,
                ClientField::Email => self.client_info.email = value,
            },
            DraftEdit::ItemDescription { index, value } => {
                if let Some(item) = self.items.get_mut(index) {
                    item.description = value;
                }
            }
            DraftEdit::ItemQuantity { index, value } => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = value;
                    item.total = item.quantity * item.price;
                }
            }
            DraftEdit::ItemPrice { index, value } => {
                if let Some(item) = self.items.get_mut(index) {
                    item.price = value;
                    item.total = item.quantity * item.price;
                }
            }
            DraftEdit::AddItem => self.items.push(LineItem::blank()),
            DraftEdit::RemoveItem { index } => {
                if self.items.len() > 1 && index < self.items.len() {
                    self.items.remove(index);
                }
            }
        }
        self
    }

    /// Sum of current item totals. Computed on read, never stored.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|item| item.total).sum()
    }

    /// Save preconditions: non-blank client name and at least one item
    /// with a non-blank description.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.client_info.name.trim().is_empty() {
            return Err(DraftError::MissingClientName);
        }
        if !self.items.iter().any(|item| !item.description.trim().is_empty()) {
            return Err(DraftError::MissingItemDescription);
        }
        Ok(())
    }

    /// Snapshot for persistence or export, with the derived totals filled
    /// in. The grand total equals the subtotal; no tax or discount exists.
    pub fn to_new_quotation(&self) -> NewQuotation {
        let subtotal = self.subtotal();
        NewQuotation {
            quotation_number: self.quotation_number.clone(),
            date: self.date.clone(),
            company_info: self.company_info.clone(),
            client_info: self.client_info.clone(),
            items: self.items.clone(),
            subtotal,
            grand_total: subtotal,
        }
    }
}

impl Default for QuotationDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Pseudo-random business key in the `Quote-<n>` form. Collisions are
/// possible and rejected at save time by the persistence service.
pub fn generate_quotation_number() -> String {
    let n = Uuid::new_v4().as_u128() % 10_000;
    format!("Quote-{}", n)
}

/// Quotation date, fixed at draft creation.
pub fn current_quotation_date() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}
