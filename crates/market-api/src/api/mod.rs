//! HTTP API for the marketplace.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::auth::TokenService;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use market_store::MarketStore;
use otp_ledger::OtpLedger;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Users and advertisements
    pub store: MarketStore,
    /// Pending verification codes
    pub otp: OtpLedger,
    /// Bearer-token signing
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: MarketStore, otp: OtpLedger, tokens: TokenService) -> Self {
        Self {
            store,
            otp,
            tokens: Arc::new(tokens),
        }
    }
}

/// Create the API router with the default rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(60))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Authentication
        .route("/otp-login", post(handlers::request_otp))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/google-login", post(handlers::google_login))
        // Advertisements; POST is guarded by the AuthUser extractor
        .route(
            "/advertisements",
            get(handlers::list_advertisements).post(handlers::create_advertisement),
        )
        .route("/advertisements/:id", get(handlers::get_advertisement))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit.clone(),
            rate_limit_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
