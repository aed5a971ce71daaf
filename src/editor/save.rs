use crate::api::ApiResponse;
use crate::editor::draft::{DraftError, QuotationDraft};
use crate::models::{NewQuotation, Quotation};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Fixed client-side request timeout on every call to the persistence
/// service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures talking to the persistence service. Connectivity problems are
/// kept distinct from server-reported ones so the editor can tell the user
/// whether the draft ever left the machine.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Cannot connect to server. Make sure the database and server are running.")]
    Connection,
    #[error("{0}")]
    Conflict(String),
    #[error("Quotation not found")]
    NotFound,
    #[error("Server error: {0}")]
    Server(String),
}

/// Outcome of the save action. The draft is only cleared by the caller on
/// `Ok`; every error leaves it untouched for retry.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
}

/// Thin REST client for the quotation service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiClientError::Server(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST the full draft payload. A 400 means the business key is
    /// already taken.
    pub async fn create_quotation(
        &self,
        payload: &NewQuotation,
    ) -> Result<Quotation, ApiClientError> {
        let url = format!("{}/api/quotations", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let envelope: ApiResponse<Quotation> =
            response.json().await.map_err(map_transport_error)?;

        match status {
            StatusCode::CREATED | StatusCode::OK => envelope
                .data
                .ok_or_else(|| ApiClientError::Server("response carried no quotation".to_string())),
            StatusCode::BAD_REQUEST => Err(ApiClientError::Conflict(envelope_message(envelope))),
            _ => Err(ApiClientError::Server(envelope_message(envelope))),
        }
    }

    /// All persisted quotations, newest first.
    pub async fn list_quotations(&self) -> Result<Vec<Quotation>, ApiClientError> {
        let url = format!("{}/api/quotations", self.base_url);
        self.fetch_many(&url).await
    }

    /// Fetch one record by its business key.
    pub async fn get_by_number(&self, quotation_number: &str) -> Result<Quotation, ApiClientError> {
        let url = format!("{}/api/quotations/number/{}", self.base_url, quotation_number);
        let response = self.http.get(&url).send().await.map_err(map_transport_error)?;

        let status = response.status();
        let envelope: ApiResponse<Quotation> =
            response.json().await.map_err(map_transport_error)?;

        match status {
            StatusCode::OK => envelope
                .data
                .ok_or_else(|| ApiClientError::Server("response carried no quotation".to_string())),
            StatusCode::NOT_FOUND => Err(ApiClientError::NotFound),
            _ => Err(ApiClientError::Server(envelope_message(envelope))),
        }
    }

    /// Case-insensitive substring search by client name.
    pub async fn search_quotations(
        &self,
        client_name: &str,
    ) -> Result<Vec<Quotation>, ApiClientError> {
        let url = format!("{}/api/quotations/search/{}", self.base_url, client_name);
        self.fetch_many(&url).await
    }

    async fn fetch_many(&self, url: &str) -> Result<Vec<Quotation>, ApiClientError> {
        let response = self.http.get(url).send().await.map_err(map_transport_error)?;

        let status = response.status();
        let envelope: ApiResponse<Vec<Quotation>> =
            response.json().await.map_err(map_transport_error)?;

        if status == StatusCode::OK {
            Ok(envelope.data.unwrap_or_default())
        } else {
            Err(ApiClientError::Server(envelope_message(envelope)))
        }
    }
}

/// Save the current draft: validate locally first (a violation never
/// reaches the network), then send the snapshot with computed totals. On
/// success the caller replaces the draft with a fresh blank one.
pub async fn save_draft(
    client: &ApiClient,
    draft: &QuotationDraft,
) -> Result<Quotation, SaveError> {
    draft.validate()?;
    let payload = draft.to_new_quotation();
    Ok(client.create_quotation(&payload).await?)
}

fn map_transport_error(e: reqwest::Error) -> ApiClientError {
    if e.is_timeout() || e.is_connect() {
        ApiClientError::Connection
    } else {
        ApiClientError::Server(e.to_string())
    }
}

fn envelope_message<T>(envelope: ApiResponse<T>) -> String {
    envelope
        .message
        .or(envelope.error)
        .unwrap_or_else(|| "request failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::draft::{ClientField, DraftEdit};

    // Nothing listens on this port; a request against it fails at connect
    // time, so reaching the Connection variant proves a send was attempted
    // and reaching Validation proves it was not.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

    fn valid_draft() -> QuotationDraft {
        QuotationDraft::new()
            .apply(DraftEdit::Client {
                field: ClientField::Name,
                value: "Acme Ltd".to_string(),
            })
            .apply(DraftEdit::ItemDescription {
                index: 0,
                value: "Cement bags".to_string(),
            })
    }

    #[tokio::test]
    async fn save_with_blank_client_name_fails_locally() {
        let client = ApiClient::new(DEAD_ENDPOINT).unwrap();
        let draft = QuotationDraft::new();

        let err = save_draft(&client, &draft).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::Validation(DraftError::MissingClientName)
        ));
    }

    #[tokio::test]
    async fn save_without_item_description_fails_locally() {
        let client = ApiClient::new(DEAD_ENDPOINT).unwrap();
        let draft = QuotationDraft::new().apply(DraftEdit::Client {
            field: ClientField::Name,
            value: "Acme Ltd".to_string(),
        });

        let err = save_draft(&client, &draft).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::Validation(DraftError::MissingItemDescription)
        ));
    }

    #[tokio::test]
    async fn unreachable_server_reports_a_connection_error() {
        let client = ApiClient::new(DEAD_ENDPOINT).unwrap();
        let err = save_draft(&client, &valid_draft()).await.unwrap_err();
        assert!(matches!(err, SaveError::Api(ApiClientError::Connection)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
