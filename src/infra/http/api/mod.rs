pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::application::market::MarketService;
use crate::application::queries::QueryService;
use crate::cache::Clock;

/// Shared state for the data endpoints.
///
/// Constructed once at startup; everything inside is behind an `Arc`, so
/// handlers see the same result store for the process lifetime.
#[derive(Clone)]
pub struct ApiState {
    pub queries: Arc<QueryService>,
    pub market: Arc<MarketService>,
    pub clock: Arc<dyn Clock>,
    pub upstream_configured: bool,
}

pub fn build_api_router() -> Router<ApiState> {
    Router::new()
        .route("/api/depositors", get(handlers::depositors))
        .route("/api/deposits", get(handlers::deposits))
        .route("/api/market", get(handlers::market))
        .route("/api/health", get(handlers::health))
}
