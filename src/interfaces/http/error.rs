use crate::error::PaymentError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error body of the wire contract: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PaymentError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PaymentError::SaleNotFound(_) => {
                (StatusCode::NOT_FOUND, "Vente introuvable".to_string())
            }
            PaymentError::Provider(_) => (
                StatusCode::BAD_GATEWAY,
                "payment provider unavailable".to_string(),
            ),
            PaymentError::Store(_) | PaymentError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
