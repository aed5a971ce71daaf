use crate::models::{ClientInfo, CompanyInfo, LineItem, Quotation};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Row shape for the `quotations` table. The nested document parts live in
/// JSONB columns so the table stays a single-collection store.
#[derive(Debug, FromRow)]
struct QuotationRow {
    id: Uuid,
    quotation_number: String,
    quote_date: String,
    company_info: Json<CompanyInfo>,
    client_info: Json<ClientInfo>,
    items: Json<Vec<LineItem>>,
    subtotal: f64,
    grand_total: f64,
    created_at: DateTime<Utc>,
}

impl From<QuotationRow> for Quotation {
    fn from(row: QuotationRow) -> Self {
        Quotation {
            id: row.id,
            quotation_number: row.quotation_number,
            date: row.quote_date,
            company_info: row.company_info.0,
            client_info: row.client_info.0,
            items: row.items.0,
            subtotal: row.subtotal,
            grand_total: row.grand_total,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, quotation_number, quote_date, company_info, client_info,
           items, subtotal, grand_total, created_at
    FROM quotations
"#;

/// Bootstrap the schema on startup. The UNIQUE constraint on the business
/// key backstops the application-level duplicate check.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quotations (
            id UUID PRIMARY KEY,
            quotation_number TEXT NOT NULL UNIQUE,
            quote_date TEXT NOT NULL,
            company_info JSONB NOT NULL,
            client_info JSONB NOT NULL,
            items JSONB NOT NULL,
            subtotal DOUBLE PRECISION NOT NULL,
            grand_total DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_quotations_created_at ON quotations (created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a business key is already taken.
pub async fn quotation_number_exists(
    pool: &PgPool,
    quotation_number: &str,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM quotations WHERE quotation_number = $1")
            .bind(quotation_number)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Insert a fully-assembled record.
pub async fn insert_quotation(pool: &PgPool, quotation: &Quotation) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO quotations (
            id, quotation_number, quote_date, company_info, client_info,
            items, subtotal, grand_total, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(quotation.id)
    .bind(&quotation.quotation_number)
    .bind(&quotation.date)
    .bind(Json(&quotation.company_info))
    .bind(Json(&quotation.client_info))
    .bind(Json(&quotation.items))
    .bind(quotation.subtotal)
    .bind(quotation.grand_total)
    .bind(quotation.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// All records, newest first.
pub async fn list_quotations(pool: &PgPool) -> Result<Vec<Quotation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, QuotationRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Quotation::from).collect())
}

/// Fetch by storage id.
pub async fn get_quotation(pool: &PgPool, id: Uuid) -> Result<Option<Quotation>, sqlx::Error> {
    let row = sqlx::query_as::<_, QuotationRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Quotation::from))
}

/// Fetch by business key.
pub async fn get_by_number(
    pool: &PgPool,
    quotation_number: &str,
) -> Result<Option<Quotation>, sqlx::Error> {
    let row = sqlx::query_as::<_, QuotationRow>(&format!(
        "{SELECT_COLUMNS} WHERE quotation_number = $1"
    ))
    .bind(quotation_number)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Quotation::from))
}

/// Overwrite the mutable columns of an existing record. Returns false when
/// no row matched the id.
pub async fn update_quotation(pool: &PgPool, quotation: &Quotation) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE quotations
        SET quotation_number = $2,
            quote_date = $3,
            company_info = $4,
            client_info = $5,
            items = $6,
            subtotal = $7,
            grand_total = $8
        WHERE id = $1
        "#,
    )
    .bind(quotation.id)
    .bind(&quotation.quotation_number)
    .bind(&quotation.date)
    .bind(Json(&quotation.company_info))
    .bind(Json(&quotation.client_info))
    .bind(Json(&quotation.items))
    .bind(quotation.subtotal)
    .bind(quotation.grand_total)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete by storage id. Returns false when no row matched.
pub async fn delete_quotation(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Case-insensitive substring search on the client name, newest first.
pub async fn search_by_client(
    pool: &PgPool,
    client_name: &str,
) -> Result<Vec<Quotation>, sqlx::Error> {
    let pattern = format!("%{client_name}%");
    let rows = sqlx::query_as::<_, QuotationRow>(&format!(
        "{SELECT_COLUMNS} WHERE client_info->>'name' ILIKE $1 ORDER BY created_at DESC"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Quotation::from).collect())
}

/// Connectivity probe for the health endpoint.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
