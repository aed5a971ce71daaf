pub mod quotation;

pub use quotation::{ClientInfo, CompanyInfo, LineItem, NewQuotation, Quotation, QuotationPatch};
