use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use librepay::application::checkout::CheckoutService;
use librepay::application::settlement::SettlementEngine;
use librepay::domain::ports::{MintRequest, MintedTransaction, PaymentProvider};
use librepay::error::{PaymentError, Result};
use librepay::infrastructure::in_memory::InMemoryStore;
use librepay::interfaces::http::{self, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const CALLBACK_URL: &str = "https://shop.test/api/fedapay/callback";

/// Provider stub minting predictable transactions, or failing on demand.
pub struct StubProvider {
    pub mint_id: &'static str,
    pub fail: bool,
}

impl Default for StubProvider {
    fn default() -> Self {
        Self {
            mint_id: "tx1",
            fail: false,
        }
    }
}

#[async_trait]
impl PaymentProvider for StubProvider {
    async fn create_transaction(&self, _mint: MintRequest) -> Result<MintedTransaction> {
        if self.fail {
            return Err(PaymentError::Provider("provider down".to_string()));
        }
        Ok(MintedTransaction {
            id: self.mint_id.to_string(),
            payment_url: format!("https://pay.test/{}", self.mint_id),
        })
    }
}

/// Builds the full router over an in-memory store, returning the store so
/// tests can inspect persisted state directly.
pub fn test_app(provider: StubProvider) -> (Router, InMemoryStore) {
    let store = InMemoryStore::new();
    let state = AppState {
        checkout: CheckoutService::new(Box::new(provider), Box::new(store.clone()), CALLBACK_URL),
        settlement: SettlementEngine::new(Box::new(store.clone()), Box::new(store.clone())),
    };
    (http::router(Arc::new(state)), store)
}

/// Fires one request at the router and returns the status plus the decoded
/// JSON body (`Value::Null` for an empty body).
pub async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}
