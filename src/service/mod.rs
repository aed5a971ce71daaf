pub mod quotation;

pub use quotation::{DatabaseStatus, QuotationError, QuotationService};
