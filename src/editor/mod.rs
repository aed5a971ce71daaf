pub mod draft;
pub mod save;

pub use draft::{ClientField, DraftEdit, DraftError, QuotationDraft};
pub use save::{save_draft, ApiClient, ApiClientError, SaveError};
