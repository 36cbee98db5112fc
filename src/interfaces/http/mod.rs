//! Inbound HTTP surface: the router, the shared state, and the wire-contract
//! DTOs.

pub mod error;
pub mod handlers;

use crate::application::checkout::CheckoutService;
use crate::application::settlement::SettlementEngine;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub checkout: CheckoutService,
    pub settlement: SettlementEngine,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/pay", post(handlers::create_payment))
        .route("/api/fedapay/callback", post(handlers::provider_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
