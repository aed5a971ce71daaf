use crate::models::{NewQuotation, QuotationPatch};
use crate::service::{QuotationError, QuotationService};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Uniform response envelope. Absent fields are left off the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            error: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn ok_with_count(data: T, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::ok(data)
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
        }
    }

    pub fn fail_with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::fail(message)
        }
    }
}

/// Health check body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub database: String,
}

/// Map a service failure to the envelope + status contract:
/// conflict -> 400, missing -> 404, anything else -> 500 with the failure
/// context as the message.
fn error_response(e: QuotationError, context: &str) -> Response {
    match e {
        QuotationError::DuplicateNumber => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::fail(e.to_string())),
        )
            .into_response(),
        QuotationError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::fail("Quotation not found")),
        )
            .into_response(),
        QuotationError::Database(db) => {
            tracing::error!("{}: {}", context, db);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::fail_with_error(context, db.to_string())),
            )
                .into_response()
        }
    }
}

fn invalid_id_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::fail("Invalid quotation id")),
    )
        .into_response()
}

/// POST /api/quotations
pub async fn create_quotation(
    State(service): State<Arc<QuotationService>>,
    Json(payload): Json<NewQuotation>,
) -> Response {
    match service.create(payload).await {
        Ok(quotation) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(
                "Quotation saved successfully",
                quotation,
            )),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to save quotation"),
    }
}

/// GET /api/quotations
pub async fn list_quotations(State(service): State<Arc<QuotationService>>) -> Response {
    match service.list().await {
        Ok(quotations) => {
            let count = quotations.len();
            (StatusCode::OK, Json(ApiResponse::ok_with_count(quotations, count))).into_response()
        }
        Err(e) => error_response(e, "Failed to fetch quotations"),
    }
}

/// GET /api/quotations/:id
pub async fn get_quotation(
    State(service): State<Arc<QuotationService>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id_response();
    };
    match service.get(id).await {
        Ok(quotation) => (StatusCode::OK, Json(ApiResponse::ok(quotation))).into_response(),
        Err(e) => error_response(e, "Failed to fetch quotation"),
    }
}

/// GET /api/quotations/number/:quotation_number
pub async fn get_by_number(
    State(service): State<Arc<QuotationService>>,
    Path(quotation_number): Path<String>,
) -> Response {
    match service.get_by_number(&quotation_number).await {
        Ok(quotation) => (StatusCode::OK, Json(ApiResponse::ok(quotation))).into_response(),
        Err(e) => error_response(e, "Failed to fetch quotation"),
    }
}

/// PUT /api/quotations/:id
pub async fn update_quotation(
    State(service): State<Arc<QuotationService>>,
    Path(id): Path<String>,
    Json(patch): Json<QuotationPatch>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id_response();
    };
    match service.update(id, patch).await {
        Ok(quotation) => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(
                "Quotation updated successfully",
                quotation,
            )),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to update quotation"),
    }
}

/// DELETE /api/quotations/:id
pub async fn delete_quotation(
    State(service): State<Arc<QuotationService>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id_response();
    };
    match service.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::message_only("Quotation deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to delete quotation"),
    }
}

/// GET /api/quotations/search/:client_name
pub async fn search_quotations(
    State(service): State<Arc<QuotationService>>,
    Path(client_name): Path<String>,
) -> Response {
    match service.search(&client_name).await {
        Ok(quotations) => {
            let count = quotations.len();
            (StatusCode::OK, Json(ApiResponse::ok_with_count(quotations, count))).into_response()
        }
        Err(e) => error_response(e, "Failed to search quotations"),
    }
}

/// GET /api/health
pub async fn health_check(State(service): State<Arc<QuotationService>>) -> Response {
    let status = service.database_status().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            success: true,
            message: "Server is running".to_string(),
            database: status.as_str().to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_fields() {
        let body = serde_json::to_value(ApiResponse::<()>::message_only(
            "Quotation deleted successfully",
        ))
        .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Quotation deleted successfully");
        assert!(body.get("data").is_none());
        assert!(body.get("count").is_none());
        assert!(body.get("error").is_none());
    }

    #[test]
    fn envelope_carries_count_for_list_responses() {
        let body =
            serde_json::to_value(ApiResponse::ok_with_count(vec!["a", "b"], 2)).unwrap();
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][1], "b");
    }

    #[test]
    fn failure_envelope_round_trips() {
        let json = r#"{"success":false,"message":"Failed to save quotation","error":"boom"}"#;
        let parsed: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message.as_deref(), Some("Failed to save quotation"));
        assert_eq!(parsed.error.as_deref(), Some("boom"));
        assert!(parsed.data.is_none());
    }
}
