use crate::db::queries;
use crate::models::{NewQuotation, Quotation, QuotationPatch};
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("Quotation number already exists. Please generate a new one.")]
    DuplicateNumber,
    #[error("Quotation not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Database connectivity as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

impl DatabaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseStatus::Connected => "Connected",
            DatabaseStatus::Disconnected => "Disconnected",
        }
    }
}

/// CRUD service over the `quotations` table. Stateless apart from the
/// connection pool; one instance is shared across all requests.
pub struct QuotationService {
    pool: PgPool,
}

impl QuotationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new quotation. The business key is checked before the
    /// insert; the read-then-write pair is not atomic, so the UNIQUE
    /// constraint catches the losing side of a concurrent create.
    pub async fn create(&self, input: NewQuotation) -> Result<Quotation, QuotationError> {
        if queries::quotation_number_exists(&self.pool, &input.quotation_number).await? {
            return Err(QuotationError::DuplicateNumber);
        }

        let quotation = input.into_quotation(Uuid::new_v4(), Utc::now());
        queries::insert_quotation(&self.pool, &quotation)
            .await
            .map_err(map_unique_violation)?;

        tracing::info!(
            "Quotation {} saved for client {}",
            quotation.quotation_number,
            quotation.client_info.name
        );
        Ok(quotation)
    }

    pub async fn list(&self) -> Result<Vec<Quotation>, QuotationError> {
        Ok(queries::list_quotations(&self.pool).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Quotation, QuotationError> {
        queries::get_quotation(&self.pool, id)
            .await?
            .ok_or(QuotationError::NotFound)
    }

    pub async fn get_by_number(&self, quotation_number: &str) -> Result<Quotation, QuotationError> {
        queries::get_by_number(&self.pool, quotation_number)
            .await?
            .ok_or(QuotationError::NotFound)
    }

    /// Partial update: merge the patch onto the stored record and write it
    /// back in full.
    pub async fn update(
        &self,
        id: Uuid,
        patch: QuotationPatch,
    ) -> Result<Quotation, QuotationError> {
        let mut existing = self.get(id).await?;
        patch.apply_to(&mut existing);

        let updated = queries::update_quotation(&self.pool, &existing)
            .await
            .map_err(map_unique_violation)?;
        if !updated {
            return Err(QuotationError::NotFound);
        }
        Ok(existing)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), QuotationError> {
        let deleted = queries::delete_quotation(&self.pool, id).await?;
        if !deleted {
            return Err(QuotationError::NotFound);
        }
        Ok(())
    }

    pub async fn search(&self, client_name: &str) -> Result<Vec<Quotation>, QuotationError> {
        Ok(queries::search_by_client(&self.pool, client_name).await?)
    }

    pub async fn database_status(&self) -> DatabaseStatus {
        match queries::ping(&self.pool).await {
            Ok(()) => DatabaseStatus::Connected,
            Err(e) => {
                tracing::warn!("database ping failed: {}", e);
                DatabaseStatus::Disconnected
            }
        }
    }
}

/// A duplicate business key that slipped past the existence check still
/// surfaces as a conflict, not a 500.
fn map_unique_violation(e: sqlx::Error) -> QuotationError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return QuotationError::DuplicateNumber;
        }
    }
    QuotationError::Database(e)
}
