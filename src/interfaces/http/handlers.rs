use super::AppState;
use crate::application::checkout::CheckoutOrder;
use crate::domain::settlement::Disposition;
use crate::error::PaymentError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// `POST /api/pay` request. Field names are the storefront's wire contract.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    #[serde(rename = "livre")]
    pub book: String,
    #[serde(rename = "auteurId")]
    pub author_id: String,
    #[serde(rename = "montant")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PayResponse {
    pub payment_url: String,
}

/// Provider callback payload. The provider may deliver the transaction id as
/// a JSON number; it is normalized to a string, which is how sales are keyed.
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub status: String,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PayRequest>,
) -> Result<Json<PayResponse>, PaymentError> {
    let payment_url = state
        .checkout
        .create_checkout(CheckoutOrder {
            book: request.book,
            author_id: request.author_id,
            amount: request.amount,
        })
        .await?;

    Ok(Json(PayResponse { payment_url }))
}

/// Acknowledges with a bare 200 on both a fresh settlement and a duplicate
/// delivery, so the provider stops redelivering either way.
pub async fn provider_callback(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallbackRequest>,
) -> Result<StatusCode, PaymentError> {
    let disposition = Disposition::from_provider_status(&request.status);
    state.settlement.settle(&request.id, disposition).await?;
    Ok(StatusCode::OK)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
